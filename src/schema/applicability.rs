use super::catalog::fields_for;
use super::tokens::{collateral_options, PayoutLibrary};
use super::{FieldDefinition, FieldGroup, FieldKey, FieldOptions, WizardStep};
use crate::form::Configuration;

/// Fields of `step` that apply to the current answers, in display order.
///
/// Pure in the configuration's payout library selection: recompute on every
/// evaluation instead of caching the result.
pub fn applicable_fields(
    step: WizardStep,
    configuration: &Configuration,
) -> Vec<&'static FieldDefinition> {
    fields_for(step)
        .iter()
        .filter(|field| is_applicable(field.key, configuration))
        .collect()
}

pub fn is_applicable(key: FieldKey, configuration: &Configuration) -> bool {
    let library = configuration
        .text(FieldKey::Fpl)
        .and_then(|name| PayoutLibrary::parse(name).ok());
    let kpi = configuration.is_kpi_variant();
    match key {
        FieldKey::UpperBound => library.is_some_and(PayoutLibrary::uses_upper_bound),
        FieldKey::BasePercentage => library.is_some_and(PayoutLibrary::uses_base_percentage),
        FieldKey::CustomAncillaryData => !kpi,
        other => match other.definition().group {
            FieldGroup::MandatoryAncillaryData | FieldGroup::OptionalAncillaryData => kpi,
            _ => true,
        },
    }
}

/// Selectable choices for `field` on the connected network. `None` renders
/// the field as free text.
pub fn field_options(
    field: &FieldDefinition,
    chain_id: Option<u64>,
) -> Option<Vec<&'static str>> {
    match field.options {
        FieldOptions::None => None,
        FieldOptions::Fixed(options) => Some(options.to_vec()),
        FieldOptions::CollateralTokens => collateral_options(chain_id),
    }
}
