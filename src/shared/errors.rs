#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("launch rejected: {reason}")]
    Rejected { reason: String },
    #[error("launch relay request to {endpoint} failed: {reason}")]
    Relay { endpoint: String, reason: String },
    #[error("launch relay at {endpoint} returned an unreadable response: {reason}")]
    RelayResponse { endpoint: String, reason: String },
    #[error("no launch relay is configured")]
    RelayNotConfigured,
}

impl LaunchError {
    /// Raw reason text surfaced as notification detail.
    pub fn reason(&self) -> String {
        match self {
            Self::Rejected { reason } => reason.clone(),
            Self::Relay { reason, .. } | Self::RelayResponse { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("action `{action}` is not available in state `{state}`")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("custom properties are limited to {limit} entries")]
    CustomPropertyLimit { limit: usize },
    #[error("custom property index {index} is out of range (len {len})")]
    CustomPropertyIndex { index: usize, len: usize },
    #[error("field `{field}` does not belong to the current step")]
    ForeignField { field: String },
    #[error("unknown field `{field}`")]
    UnknownField { field: String },
    #[error("invalid value for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("custom properties are only available for KPI option payout libraries")]
    CustomPropertiesUnavailable,
}
