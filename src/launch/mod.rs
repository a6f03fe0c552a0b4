//! The external launch collaborator and the notices its outcome produces.

pub mod relay;

use crate::form::Configuration;
use crate::link::to_query;
use crate::shared::LaunchError;
use std::collections::BTreeMap;

pub use relay::RelayLauncher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Simulate,
    Deploy,
}

impl LaunchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simulate => "simulate",
            Self::Deploy => "deploy",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().trim_start_matches("--").to_ascii_lowercase().as_str() {
            "simulate" => Ok(Self::Simulate),
            "deploy" => Ok(Self::Deploy),
            other => Err(format!("launch mode must be simulate or deploy, got `{other}`")),
        }
    }
}

impl std::fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub mode: LaunchMode,
    /// Fully merged configuration, encoded ancillary value included.
    pub configuration: Configuration,
}

impl LaunchRequest {
    /// Wire fields in canonical text form, keyed by field name.
    pub fn fields(&self) -> BTreeMap<&'static str, String> {
        to_query(&self.configuration).into_iter().collect()
    }
}

/// Creates (or dry-runs) the pair on chain and returns its address.
pub trait Launcher: Send + Sync {
    fn launch(&self, request: &LaunchRequest) -> Result<String, LaunchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Success,
    Error,
}

/// What the operator is told after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchNotice {
    pub variant: NoticeVariant,
    pub message: String,
    pub details: Option<String>,
}

pub const LAUNCH_FAILED_MESSAGE: &str = "An error has occurred";

impl LaunchNotice {
    pub fn success(address: &str) -> Self {
        Self {
            variant: NoticeVariant::Success,
            message: format!("LSP address: {address}"),
            details: None,
        }
    }

    pub fn failure(error: &LaunchError) -> Self {
        Self {
            variant: NoticeVariant::Error,
            message: LAUNCH_FAILED_MESSAGE.to_string(),
            details: Some(error.reason()),
        }
    }
}

impl std::fmt::Display for LaunchNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {details}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
