//! Per-field rules and the cross-field business rules of the launch form.
//!
//! Everything here is pure: inputs are borrowed and nothing is mutated.

pub mod business;
pub mod rules;

use crate::schema::FieldKey;

pub use business::{
    after_end_of_today, check_kpi_price_identifier, INVALID_DATE_MESSAGE,
    KPI_PRICE_IDENTIFIER_MESSAGE,
};
pub use rules::{validate, validate_fields, validate_step, REQUIRED_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: String,
}

impl FieldError {
    pub fn new(field: FieldKey, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field-scoped failures in field display order, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        if self.get(error.field).is_none() {
            self.0.push(error);
            self.0.sort_by_key(|entry| entry.field);
        }
    }

    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<FieldKey> {
        self.0.iter().map(|entry| entry.field).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}
