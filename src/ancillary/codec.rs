use super::{AncillaryError, AncillaryRecord, CustomProperties, CustomProperty};
use crate::form::{Configuration, FieldValue};
use crate::schema::catalog::{MANDATORY_ANCILLARY_KEYS, OPTIONAL_ANCILLARY_KEYS};
use crate::schema::FieldKey;

/// Builds the record: mandatory keys, then non-empty optional keys, then the
/// custom properties in order. A custom label equal to an earlier key
/// overwrites that value.
///
/// Empty values are never written, so a decoded record never has to tell
/// "absent" from "present but empty".
pub fn assemble<'a, M, O>(mandatory: M, optional: O, custom: &CustomProperties) -> AncillaryRecord
where
    M: IntoIterator<Item = (FieldKey, &'a str)>,
    O: IntoIterator<Item = (FieldKey, &'a str)>,
{
    let mut record = AncillaryRecord::new();
    for (key, value) in mandatory.into_iter().chain(optional) {
        if !value.trim().is_empty() {
            record.insert(key.as_str(), value);
        }
    }
    for property in custom.iter().filter(|property| !property.is_blank()) {
        record.insert(property.label.as_str(), property.value.as_str());
    }
    record
}

pub fn encode<'a, M, O>(mandatory: M, optional: O, custom: &CustomProperties) -> String
where
    M: IntoIterator<Item = (FieldKey, &'a str)>,
    O: IntoIterator<Item = (FieldKey, &'a str)>,
{
    let record = assemble(mandatory, optional, custom);
    serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string())
}

/// Encodes the named ancillary fields held in `fields`. The mandatory group
/// only participates for KPI-variant libraries.
pub fn encode_fields(
    kpi_variant: bool,
    fields: &Configuration,
    custom: &CustomProperties,
) -> String {
    let named = |keys: &'static [FieldKey]| {
        keys.iter()
            .filter_map(|key| fields.text(*key).map(|value| (*key, value)))
            .collect::<Vec<_>>()
    };
    let mandatory = if kpi_variant {
        named(&MANDATORY_ANCILLARY_KEYS[..])
    } else {
        Vec::new()
    };
    encode(mandatory, named(&OPTIONAL_ANCILLARY_KEYS[..]), custom)
}

pub fn decode(raw: &str) -> Result<AncillaryRecord, AncillaryError> {
    serde_json::from_str(raw).map_err(|source| AncillaryError::Decode { source })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitAncillary {
    /// Values for the named mandatory/optional ancillary fields.
    pub named: Configuration,
    pub custom: CustomProperties,
    /// Custom entries beyond the list capacity.
    pub dropped: Vec<CustomProperty>,
}

/// Routes decoded keys back to the named fields; everything else becomes a
/// custom property.
pub fn split(record: &AncillaryRecord) -> SplitAncillary {
    let mut out = SplitAncillary::default();
    for (key, value) in record.iter() {
        let named = FieldKey::parse(key).ok().filter(|field| {
            MANDATORY_ANCILLARY_KEYS.contains(field) || OPTIONAL_ANCILLARY_KEYS.contains(field)
        });
        match named {
            Some(field) => out.named.set(field, FieldValue::text(value)),
            None => {
                let property = CustomProperty::new(key, value);
                if out.custom.add(property.clone()).is_err() {
                    out.dropped.push(property);
                }
            }
        }
    }
    out
}
