use super::{FieldError, FieldErrors};
use crate::form::{Configuration, FieldValue};
use crate::schema::{
    applicable_fields, field_options, FieldDefinition, RuleContext, ValueType, WizardStep,
};

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Checks one value against its field's declared rules.
pub fn validate(
    field: &FieldDefinition,
    value: Option<&FieldValue>,
    context: &RuleContext,
) -> Result<(), String> {
    let rules = field.rules;
    let value = match value.filter(|value| !value.is_empty()) {
        Some(value) => value,
        None if rules.required => return Err(REQUIRED_MESSAGE.to_string()),
        None => return Ok(()),
    };

    check_type(field.value_type, value)?;

    if let Some(number) = value.as_f64().filter(|_| field.value_type == ValueType::Number) {
        if let Some(min) = rules.min.filter(|min| number < *min) {
            return Err(format!("Must be at least {min}"));
        }
        if let Some(max) = rules.max.filter(|max| number > *max) {
            return Err(format!("Must be at most {max}"));
        }
    }

    if let (Some(limit), Some(raw)) = (rules.max_length, value.as_text()) {
        if raw.chars().count() > limit {
            return Err(format!("Must be at most {limit} characters"));
        }
    }

    if let (Some(options), Some(raw)) = (field_options(field, context.chain_id), value.as_text()) {
        let raw = raw.trim();
        if !options.iter().any(|option| *option == raw) {
            return Err(format!("`{raw}` is not one of the available options"));
        }
    }

    match rules.custom {
        Some(predicate) => predicate(value, context),
        None => Ok(()),
    }
}

fn check_type(value_type: ValueType, value: &FieldValue) -> Result<(), String> {
    let matches = match (value_type, value) {
        (ValueType::Number, FieldValue::Number(_) | FieldValue::Text(_)) => {
            value.as_f64().is_some_and(f64::is_finite)
        }
        (ValueType::Text, FieldValue::Text(_) | FieldValue::Number(_)) => true,
        (ValueType::Boolean, FieldValue::Flag(_)) => true,
        (ValueType::Timestamp, FieldValue::Timestamp(_)) => true,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(format!("Must be a {}", value_type.as_str()))
    }
}

/// Validates `fields` against the values held in `values`.
pub fn validate_fields<'a, I>(
    fields: I,
    values: &Configuration,
    context: &RuleContext,
) -> FieldErrors
where
    I: IntoIterator<Item = &'a FieldDefinition>,
{
    let mut errors = FieldErrors::default();
    for field in fields {
        if let Err(message) = validate(field, values.get(field.key), context) {
            errors.push(FieldError::new(field.key, message));
        }
    }
    errors
}

/// Validates every field of `step` applicable under `scope`, reading values
/// from `values`. Step 2 applicability depends on Step 1 answers, so the two
/// can differ.
pub fn validate_step(
    step: WizardStep,
    scope: &Configuration,
    values: &Configuration,
    context: &RuleContext,
) -> FieldErrors {
    validate_fields(applicable_fields(step, scope), values, context)
}
