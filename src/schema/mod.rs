//! Static field catalogs for the two launch steps.
//!
//! Definitions are immutable and ordered; applicability against the current
//! configuration lives in [`applicability`].

pub mod applicability;
pub mod catalog;
pub mod tokens;

use crate::form::FieldValue;
use chrono::{DateTime, Utc};

pub use applicability::{applicable_fields, field_options, is_applicable};
pub use catalog::{definition, fields_for};
pub use tokens::{PayoutLibrary, KPI_PRICE_IDENTIFIER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Step1,
    Step2,
}

impl WizardStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Step1 => "step1",
            Self::Step2 => "step2",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "step1" | "1" | "lsp" => Ok(Self::Step1),
            "step2" | "2" | "fpl" => Ok(Self::Step2),
            other => Err(format!("unknown step `{other}`; expected step1 or step2")),
        }
    }
}

/// Every field name either step can carry. Variant order is display order,
/// so ordered maps keyed by `FieldKey` iterate the way the form renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    PairName,
    ExpirationTimestamp,
    CollateralPerPair,
    PriceIdentifier,
    LongSynthName,
    LongSynthSymbol,
    ShortSynthName,
    ShortSynthSymbol,
    CollateralToken,
    Fpl,
    ProposerReward,
    OptimisticOracleLivenessTime,
    OptimisticOracleProposerBond,
    EnableEarlyExpiration,
    BasePercentage,
    LowerBound,
    UpperBound,
    Metric,
    Endpoint,
    Method,
    Key,
    Interval,
    CustomAncillaryData,
    Fallback,
    Aggregation,
    Rounding,
    Scaling,
    Unresolved,
    GasPrice,
}

pub const ALL_FIELD_KEYS: [FieldKey; 29] = [
    FieldKey::PairName,
    FieldKey::ExpirationTimestamp,
    FieldKey::CollateralPerPair,
    FieldKey::PriceIdentifier,
    FieldKey::LongSynthName,
    FieldKey::LongSynthSymbol,
    FieldKey::ShortSynthName,
    FieldKey::ShortSynthSymbol,
    FieldKey::CollateralToken,
    FieldKey::Fpl,
    FieldKey::ProposerReward,
    FieldKey::OptimisticOracleLivenessTime,
    FieldKey::OptimisticOracleProposerBond,
    FieldKey::EnableEarlyExpiration,
    FieldKey::BasePercentage,
    FieldKey::LowerBound,
    FieldKey::UpperBound,
    FieldKey::Metric,
    FieldKey::Endpoint,
    FieldKey::Method,
    FieldKey::Key,
    FieldKey::Interval,
    FieldKey::CustomAncillaryData,
    FieldKey::Fallback,
    FieldKey::Aggregation,
    FieldKey::Rounding,
    FieldKey::Scaling,
    FieldKey::Unresolved,
    FieldKey::GasPrice,
];

/// Holds the encoded ancillary string once Step 2 is submitted.
pub const ANCILLARY_DATA_KEY: FieldKey = FieldKey::CustomAncillaryData;

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PairName => "pairName",
            Self::ExpirationTimestamp => "expirationTimestamp",
            Self::CollateralPerPair => "collateralPerPair",
            Self::PriceIdentifier => "priceIdentifier",
            Self::LongSynthName => "longSynthName",
            Self::LongSynthSymbol => "longSynthSymbol",
            Self::ShortSynthName => "shortSynthName",
            Self::ShortSynthSymbol => "shortSynthSymbol",
            Self::CollateralToken => "collateralToken",
            Self::Fpl => "fpl",
            Self::ProposerReward => "proposerReward",
            Self::OptimisticOracleLivenessTime => "optimisticOracleLivenessTime",
            Self::OptimisticOracleProposerBond => "optimisticOracleProposerBond",
            Self::EnableEarlyExpiration => "enableEarlyExpiration",
            Self::BasePercentage => "basePercentage",
            Self::LowerBound => "lowerBound",
            Self::UpperBound => "upperBound",
            Self::Metric => "Metric",
            Self::Endpoint => "Endpoint",
            Self::Method => "Method",
            Self::Key => "Key",
            Self::Interval => "Interval",
            Self::CustomAncillaryData => "customAncillaryData",
            Self::Fallback => "Fallback",
            Self::Aggregation => "Aggregation",
            Self::Rounding => "Rounding",
            Self::Scaling => "Scaling",
            Self::Unresolved => "Unresolved",
            Self::GasPrice => "gasPrice",
        }
    }

    /// Exact, case-sensitive match on the camel-case wire name.
    pub fn parse(raw: &str) -> Result<Self, String> {
        ALL_FIELD_KEYS
            .iter()
            .copied()
            .find(|key| key.as_str() == raw)
            .ok_or_else(|| format!("unknown field `{raw}`"))
    }

    pub fn step(self) -> WizardStep {
        if self <= Self::EnableEarlyExpiration {
            WizardStep::Step1
        } else {
            WizardStep::Step2
        }
    }

    pub fn definition(self) -> &'static FieldDefinition {
        catalog::definition(self)
    }

    /// Human label, e.g. `pairName` -> "Pair name".
    pub fn label(self) -> String {
        if self == Self::Fpl {
            return "Financial product".to_string();
        }
        camel_to_sentence_case(self.as_str())
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn camel_to_sentence_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for (idx, ch) in raw.chars().enumerate() {
        if idx == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_ascii_uppercase() {
            out.push(' ');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Number,
    Boolean,
    Timestamp,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }
}

/// Inputs a custom predicate may consult besides the value itself.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub end_of_today: DateTime<Utc>,
    pub chain_id: Option<u64>,
}

pub type CustomPredicate = fn(&FieldValue, &RuleContext) -> Result<(), String>;

#[derive(Clone, Copy)]
pub struct FieldRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub max_length: Option<usize>,
    pub custom: Option<CustomPredicate>,
}

impl FieldRules {
    pub const NONE: Self = Self {
        required: false,
        min: None,
        max: None,
        max_length: None,
        custom: None,
    };

    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::NONE
        }
    }

    pub const fn optional() -> Self {
        Self::NONE
    }

    pub const fn min(self, min: f64) -> Self {
        Self {
            min: Some(min),
            ..self
        }
    }

    pub const fn max(self, max: f64) -> Self {
        Self {
            max: Some(max),
            ..self
        }
    }

    pub const fn max_length(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    pub const fn custom(self, predicate: CustomPredicate) -> Self {
        Self {
            custom: Some(predicate),
            ..self
        }
    }
}

impl std::fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("max_length", &self.max_length)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOptions {
    None,
    Fixed(&'static [&'static str]),
    /// Resolved per network, see [`tokens::collateral_options`].
    CollateralTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    MandatoryParameters,
    OptionalParameters,
    PayoutParameters,
    MandatoryAncillaryData,
    OptionalAncillaryData,
    GasPrice,
}

impl FieldGroup {
    pub fn title(self) -> &'static str {
        match self {
            Self::MandatoryParameters => "Mandatory Parameters",
            Self::OptionalParameters => "Optional Parameters",
            Self::PayoutParameters => "FPL parameters",
            Self::MandatoryAncillaryData => "Mandatory Ancillary Data Parameters",
            Self::OptionalAncillaryData => "Optional Ancillary Data Parameters",
            Self::GasPrice => "Gas Price",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub description: &'static str,
    pub value_type: ValueType,
    pub rules: FieldRules,
    pub options: FieldOptions,
    pub group: FieldGroup,
}

impl FieldDefinition {
    pub fn name(&self) -> &'static str {
        self.key.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_round_trip_through_wire_names() {
        for key in ALL_FIELD_KEYS {
            assert_eq!(FieldKey::parse(key.as_str()), Ok(key));
        }
        assert!(FieldKey::parse("metric").is_err());
        assert!(FieldKey::parse("Custom").is_err());
    }

    #[test]
    fn field_key_step_splits_at_early_expiration() {
        assert_eq!(FieldKey::EnableEarlyExpiration.step(), WizardStep::Step1);
        assert_eq!(FieldKey::BasePercentage.step(), WizardStep::Step2);
        assert_eq!(FieldKey::GasPrice.step(), WizardStep::Step2);
    }

    #[test]
    fn labels_use_sentence_case() {
        assert_eq!(FieldKey::PairName.label(), "Pair name");
        assert_eq!(
            FieldKey::OptimisticOracleLivenessTime.label(),
            "Optimistic oracle liveness time"
        );
        assert_eq!(FieldKey::Metric.label(), "Metric");
        assert_eq!(FieldKey::Fpl.label(), "Financial product");
    }
}
