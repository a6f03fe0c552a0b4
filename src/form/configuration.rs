use super::FieldValue;
use crate::schema::tokens::is_kpi_library_name;
use crate::schema::{fields_for, FieldKey, PayoutLibrary, WizardStep, ANCILLARY_DATA_KEY};
use std::collections::BTreeMap;

/// The record accumulated across both steps. Empty values are never stored,
/// so "set" always means "non-empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).and_then(FieldValue::as_text)
    }

    pub fn is_set(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Stores `value`, or unsets `key` when the value is empty.
    pub fn set(&mut self, key: FieldKey, value: FieldValue) {
        if value.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<FieldValue> {
        self.values.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }

    /// Replaces the fields of `step` with the submitted `draft`: fields left
    /// blank in the draft become unset. The ancillary key is left alone; it
    /// is owned by the encoder.
    pub fn merge_step(&mut self, step: WizardStep, draft: &Configuration) {
        for field in fields_for(step) {
            if field.key == ANCILLARY_DATA_KEY {
                continue;
            }
            match draft.get(field.key) {
                Some(value) => self.set(field.key, value.clone()),
                None => {
                    self.values.remove(&field.key);
                }
            }
        }
    }

    /// Copy holding only the fields that belong to `step`.
    pub fn restricted_to(&self, step: WizardStep) -> Configuration {
        Configuration {
            values: self
                .values
                .iter()
                .filter(|(key, _)| key.step() == step)
                .map(|(key, value)| (*key, value.clone()))
                .collect(),
        }
    }

    pub fn payout_library(&self) -> Option<PayoutLibrary> {
        self.text(FieldKey::Fpl)
            .and_then(|name| PayoutLibrary::parse(name).ok())
    }

    pub fn is_kpi_variant(&self) -> bool {
        self.text(FieldKey::Fpl).is_some_and(is_kpi_library_name)
    }

    pub fn ancillary_data(&self) -> Option<&str> {
        self.text(ANCILLARY_DATA_KEY)
    }

    pub fn clear_ancillary_data(&mut self) -> bool {
        self.values.remove(&ANCILLARY_DATA_KEY).is_some()
    }
}

impl FromIterator<(FieldKey, FieldValue)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (FieldKey, FieldValue)>>(iter: I) -> Self {
        let mut configuration = Configuration::default();
        for (key, value) in iter {
            configuration.set(key, value);
        }
        configuration
    }
}
