use lsp_launch::form::{Configuration, FieldValue};
use lsp_launch::schema::tokens::ALL_PAYOUT_LIBRARIES;
use lsp_launch::schema::{
    applicable_fields, fields_for, FieldKey, PayoutLibrary, WizardStep, ALL_FIELD_KEYS,
};

fn names(step: WizardStep, configuration: &Configuration) -> Vec<&'static str> {
    applicable_fields(step, configuration)
        .iter()
        .map(|field| field.name())
        .collect()
}

fn with_library(library: PayoutLibrary) -> Configuration {
    let mut configuration = Configuration::new();
    configuration.set(FieldKey::Fpl, FieldValue::text(library.as_str()));
    configuration
}

#[test]
fn step_catalogs_cover_every_field_once_in_display_order() {
    let mut keys: Vec<FieldKey> = fields_for(WizardStep::Step1)
        .iter()
        .chain(fields_for(WizardStep::Step2).iter())
        .map(|field| field.key)
        .collect();
    let declared = keys.clone();
    keys.sort();
    assert_eq!(keys, declared);
    assert_eq!(declared, ALL_FIELD_KEYS.to_vec());

    assert_eq!(
        fields_for(WizardStep::Step1)
            .iter()
            .map(|field| field.name())
            .take(3)
            .collect::<Vec<_>>(),
        vec!["pairName", "expirationTimestamp", "collateralPerPair"]
    );
}

#[test]
fn upper_bound_applies_only_to_range_style_libraries() {
    for library in ALL_PAYOUT_LIBRARIES {
        let shown = names(WizardStep::Step2, &with_library(library)).contains(&"upperBound");
        let expected = matches!(
            library,
            PayoutLibrary::RangeBond | PayoutLibrary::Linear | PayoutLibrary::KpiOptionLinear
        );
        assert_eq!(shown, expected, "{}", library.as_str());
    }
}

#[test]
fn kpi_and_free_text_ancillary_groups_are_mutually_exclusive() {
    let kpi = names(
        WizardStep::Step2,
        &with_library(PayoutLibrary::KpiOptionBinary),
    );
    assert!(kpi.contains(&"Metric"));
    assert!(kpi.contains(&"Fallback"));
    assert!(!kpi.contains(&"customAncillaryData"));

    let plain = names(WizardStep::Step2, &with_library(PayoutLibrary::CoveredCall));
    assert!(plain.contains(&"customAncillaryData"));
    assert!(!plain.contains(&"Metric"));
    assert!(!plain.contains(&"Fallback"));
}

#[test]
fn base_percentage_is_success_token_only() {
    assert!(
        names(WizardStep::Step2, &with_library(PayoutLibrary::SuccessToken))
            .contains(&"basePercentage")
    );
    assert!(
        !names(
            WizardStep::Step2,
            &with_library(PayoutLibrary::SimpleSuccessToken)
        )
        .contains(&"basePercentage")
    );
}

