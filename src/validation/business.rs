use super::FieldError;
use crate::form::{Configuration, FieldValue};
use crate::schema::{FieldKey, RuleContext, KPI_PRICE_IDENTIFIER};

pub const KPI_PRICE_IDENTIFIER_MESSAGE: &str =
    "Binary and Linear KPI options only support General_KPI";

pub const INVALID_DATE_MESSAGE: &str = "Invalid date";

/// Expiration must fall strictly after the end of the current day.
pub fn after_end_of_today(value: &FieldValue, context: &RuleContext) -> Result<(), String> {
    match value {
        FieldValue::Timestamp(at) if *at > context.end_of_today => Ok(()),
        _ => Err(INVALID_DATE_MESSAGE.to_string()),
    }
}

/// KPI-variant libraries are priced through the KPI sentinel identifier only.
/// The error is attached to the price identifier even though the payout
/// library triggers it.
pub fn check_kpi_price_identifier(configuration: &Configuration) -> Result<(), FieldError> {
    if !configuration.is_kpi_variant() {
        return Ok(());
    }
    if configuration.text(FieldKey::PriceIdentifier) == Some(KPI_PRICE_IDENTIFIER) {
        return Ok(());
    }
    Err(FieldError::new(
        FieldKey::PriceIdentifier,
        KPI_PRICE_IDENTIFIER_MESSAGE,
    ))
}
