use super::tokens::{PAYOUT_LIBRARY_NAMES, PRICE_IDENTIFIERS};
use super::{
    FieldDefinition, FieldGroup, FieldKey, FieldOptions, FieldRules, ValueType, WizardStep,
};
use crate::validation::after_end_of_today;

const fn field(
    key: FieldKey,
    description: &'static str,
    value_type: ValueType,
    rules: FieldRules,
    group: FieldGroup,
) -> FieldDefinition {
    FieldDefinition {
        key,
        description,
        value_type,
        rules,
        options: FieldOptions::None,
        group,
    }
}

const fn with_options(definition: FieldDefinition, options: FieldOptions) -> FieldDefinition {
    FieldDefinition {
        options,
        ..definition
    }
}

pub const STEP1_FIELDS: [FieldDefinition; 14] = [
    field(
        FieldKey::PairName,
        "The desired name of the token pair.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryParameters,
    ),
    field(
        FieldKey::ExpirationTimestamp,
        "Timestamp at which the pair expires and the payout is computed.",
        ValueType::Timestamp,
        FieldRules::required().custom(after_end_of_today),
        FieldGroup::MandatoryParameters,
    ),
    field(
        FieldKey::CollateralPerPair,
        "The amount of collateral required to mint each long and short pair. If 1 $UMA was used as collateral to mint, the minter would receive 4 long and 4 short tokens.",
        ValueType::Number,
        FieldRules::required().min(0.0),
        FieldGroup::MandatoryParameters,
    ),
    with_options(
        field(
            FieldKey::PriceIdentifier,
            "The approved price identifier to be used.",
            ValueType::Text,
            FieldRules::required(),
            FieldGroup::MandatoryParameters,
        ),
        FieldOptions::Fixed(&PRICE_IDENTIFIERS),
    ),
    field(
        FieldKey::LongSynthName,
        "The full-length name of the long token.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryParameters,
    ),
    field(
        FieldKey::LongSynthSymbol,
        "The ticker name of the long token.",
        ValueType::Text,
        FieldRules::required().max_length(14),
        FieldGroup::MandatoryParameters,
    ),
    field(
        FieldKey::ShortSynthName,
        "The full-length name of the short token.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryParameters,
    ),
    field(
        FieldKey::ShortSynthSymbol,
        "The ticker name of the short token or ticker symbol.",
        ValueType::Text,
        FieldRules::required().max_length(14),
        FieldGroup::MandatoryParameters,
    ),
    with_options(
        field(
            FieldKey::CollateralToken,
            "Approved collateral currency to be used.",
            ValueType::Text,
            FieldRules::required(),
            FieldGroup::MandatoryParameters,
        ),
        FieldOptions::CollateralTokens,
    ),
    with_options(
        field(
            FieldKey::Fpl,
            "Financial library used to calculate the payout at expiry.",
            ValueType::Text,
            FieldRules::required(),
            FieldGroup::MandatoryParameters,
        ),
        FieldOptions::Fixed(&PAYOUT_LIBRARY_NAMES),
    ),
    field(
        FieldKey::ProposerReward,
        "Proposal reward to be forwarded to the created contract to be used to incentivize price proposals.",
        ValueType::Number,
        FieldRules::optional().min(0.0),
        FieldGroup::OptionalParameters,
    ),
    field(
        FieldKey::OptimisticOracleLivenessTime,
        "Custom liveness window for disputing optimistic oracle price proposals in seconds. A longer liveness time provides more security, while a shorter one provides faster settlement. By default, this is set to 7200 seconds.",
        ValueType::Number,
        FieldRules::optional().min(0.0),
        FieldGroup::OptionalParameters,
    ),
    field(
        FieldKey::OptimisticOracleProposerBond,
        "Additional bond a proposer must post with the optimistic oracle. A higher bond makes incorrect disputes and proposals more costly.",
        ValueType::Number,
        FieldRules::optional().min(0.0),
        FieldGroup::OptionalParameters,
    ),
    field(
        FieldKey::EnableEarlyExpiration,
        "Enable early expiration of the LSP.",
        ValueType::Boolean,
        FieldRules::optional(),
        FieldGroup::OptionalParameters,
    ),
];

pub const STEP2_FIELDS: [FieldDefinition; 15] = [
    field(
        FieldKey::BasePercentage,
        "Percentage of collateral per pair used as the floor.",
        ValueType::Number,
        FieldRules::required().min(0.0),
        FieldGroup::PayoutParameters,
    ),
    field(
        FieldKey::LowerBound,
        "Below the lower bound each range token is worth the number of collateral that is set using collateral per pair.",
        ValueType::Number,
        FieldRules::required().min(0.0),
        FieldGroup::PayoutParameters,
    ),
    field(
        FieldKey::UpperBound,
        "Above the upper bound, holders of the long token are entitled to a fixed, minimum number of collateral.",
        ValueType::Number,
        FieldRules::required().min(0.0),
        FieldGroup::PayoutParameters,
    ),
    field(
        FieldKey::Metric,
        "Short description reflecting the metric and units to be measured.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryAncillaryData,
    ),
    field(
        FieldKey::Endpoint,
        "Link to data endpoint that should return the Metric at request timestamp.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryAncillaryData,
    ),
    field(
        FieldKey::Method,
        "Link to a descriptive source covering the objective and methodology for calculating a particular metric.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryAncillaryData,
    ),
    field(
        FieldKey::Key,
        "Which key value from the Endpoint response should be used by voters for further processing of the price request.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryAncillaryData,
    ),
    field(
        FieldKey::Interval,
        "This describes how request timestamps for pricing queries should be rounded and what is the granularity of historical data update frequency.",
        ValueType::Text,
        FieldRules::required(),
        FieldGroup::MandatoryAncillaryData,
    ),
    field(
        FieldKey::CustomAncillaryData,
        "Custom ancillary data to be passed along with the price request.",
        ValueType::Text,
        FieldRules::optional(),
        FieldGroup::OptionalAncillaryData,
    ),
    field(
        FieldKey::Fallback,
        "In the event of the end-point not working or reporting false outcomes, a fallback ensures that UMA token holders can arrive at the proper result.",
        ValueType::Text,
        FieldRules::optional(),
        FieldGroup::OptionalAncillaryData,
    ),
    field(
        FieldKey::Aggregation,
        "In case any time series data processing is required this describes processing method used (e.g. calculating TWAP, finding peak value, etc.) and also sets the start timestamp for such aggregation.",
        ValueType::Text,
        FieldRules::optional(),
        FieldGroup::OptionalAncillaryData,
    ),
    field(
        FieldKey::Rounding,
        "This is integer number defining how many digits should be left to the right of decimal delimiter after rounding.",
        ValueType::Text,
        FieldRules::optional(),
        FieldGroup::OptionalAncillaryData,
    ),
    field(
        FieldKey::Scaling,
        "This is integer number defining power of 10 scaling to be applied after rounding.",
        ValueType::Text,
        FieldRules::optional(),
        FieldGroup::OptionalAncillaryData,
    ),
    field(
        FieldKey::Unresolved,
        "This is numeric value that voters should return for unresolvable price request (defaults to zero if omitted).",
        ValueType::Text,
        FieldRules::optional(),
        FieldGroup::OptionalAncillaryData,
    ),
    field(
        FieldKey::GasPrice,
        "Gas price to use in GWEI.",
        ValueType::Number,
        FieldRules::required().min(1.0).max(1000.0),
        FieldGroup::GasPrice,
    ),
];

/// Mandatory ancillary group, required only for KPI-variant libraries.
pub const MANDATORY_ANCILLARY_KEYS: [FieldKey; 5] = [
    FieldKey::Metric,
    FieldKey::Endpoint,
    FieldKey::Method,
    FieldKey::Key,
    FieldKey::Interval,
];

pub const OPTIONAL_ANCILLARY_KEYS: [FieldKey; 5] = [
    FieldKey::Fallback,
    FieldKey::Aggregation,
    FieldKey::Rounding,
    FieldKey::Scaling,
    FieldKey::Unresolved,
];

pub fn fields_for(step: WizardStep) -> &'static [FieldDefinition] {
    match step {
        WizardStep::Step1 => &STEP1_FIELDS,
        WizardStep::Step2 => &STEP2_FIELDS,
    }
}

pub fn definition(key: FieldKey) -> &'static FieldDefinition {
    let fields = fields_for(key.step());
    let index = fields
        .iter()
        .position(|field| field.key == key)
        .unwrap_or_default();
    &fields[index]
}
