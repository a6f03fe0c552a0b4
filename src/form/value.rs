use crate::schema::ValueType;
use chrono::{DateTime, TimeZone, Utc};

/// A single answer, tagged with the semantic type of its field.
///
/// Numbers keep the literal text that was entered so that a link round trip
/// reproduces them exactly; they are parsed only when validated.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(String),
    Flag(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }

    pub fn number(raw: impl Into<String>) -> Self {
        Self::Number(raw.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(raw) | Self::Number(raw) => raw.trim().is_empty(),
            Self::Flag(_) | Self::Timestamp(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(raw) | Self::Number(raw) => Some(raw.as_str()),
            Self::Flag(_) | Self::Timestamp(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(raw) | Self::Text(raw) => raw.trim().parse::<f64>().ok(),
            Self::Flag(_) | Self::Timestamp(_) => None,
        }
    }

    /// Link form: timestamps as integer seconds, everything else literal.
    pub fn canonical_text(&self) -> String {
        match self {
            Self::Text(raw) | Self::Number(raw) => raw.clone(),
            Self::Flag(value) => value.to_string(),
            Self::Timestamp(at) => at.timestamp().to_string(),
        }
    }

    /// Inverse of [`FieldValue::canonical_text`].
    pub fn parse_canonical(value_type: ValueType, raw: &str) -> Result<Self, String> {
        match value_type {
            ValueType::Text => Ok(Self::text(raw)),
            ValueType::Number => Ok(Self::number(raw)),
            ValueType::Boolean => match raw.trim() {
                "true" => Ok(Self::Flag(true)),
                "false" => Ok(Self::Flag(false)),
                other => Err(format!("expected `true` or `false`, got `{other}`")),
            },
            ValueType::Timestamp => parse_epoch_seconds(raw).map(Self::Timestamp),
        }
    }

    /// Operator input: accepts the canonical form plus RFC 3339 timestamps
    /// and the usual yes/no spellings for flags.
    pub fn parse_input(value_type: ValueType, raw: &str) -> Result<Self, String> {
        match value_type {
            ValueType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Self::Flag(true)),
                "false" | "no" | "off" | "0" => Ok(Self::Flag(false)),
                other => Err(format!("expected a yes/no value, got `{other}`")),
            },
            ValueType::Timestamp => {
                let trimmed = raw.trim();
                if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
                    return Ok(Self::Timestamp(at.with_timezone(&Utc)));
                }
                parse_epoch_seconds(trimmed)
                    .map(Self::Timestamp)
                    .map_err(|_| format!("expected RFC 3339 or epoch seconds, got `{trimmed}`"))
            }
            ValueType::Text | ValueType::Number => Self::parse_canonical(value_type, raw),
        }
    }
}

fn parse_epoch_seconds(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    let secs = trimmed
        .parse::<i64>()
        .map_err(|_| format!("expected integer seconds, got `{trimmed}`"))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| format!("timestamp `{secs}` is out of range"))
}
