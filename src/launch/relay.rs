use super::{LaunchRequest, Launcher};
use crate::config::RelayConfig;
use crate::shared::LaunchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct RelayRequestBody<'a> {
    mode: &'a str,
    configuration: BTreeMap<&'static str, String>,
}

#[derive(Debug, Default, Deserialize)]
struct RelayResponseBody {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Forwards launch requests as JSON to an HTTP relay that owns the wallet
/// and RPC connection.
#[derive(Debug, Clone)]
pub struct RelayLauncher {
    relay: Option<RelayConfig>,
}

impl RelayLauncher {
    pub fn new(relay: Option<RelayConfig>) -> Self {
        Self { relay }
    }

    fn agent(relay: &RelayConfig) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(relay.timeout_secs))
            .build()
    }
}

impl Launcher for RelayLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<String, LaunchError> {
        let relay = self.relay.as_ref().ok_or(LaunchError::RelayNotConfigured)?;
        let endpoint = relay.endpoint.clone();
        let body = RelayRequestBody {
            mode: request.mode.as_str(),
            configuration: request.fields(),
        };
        let payload = serde_json::to_value(&body).map_err(|e| LaunchError::Relay {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        let response = match Self::agent(relay).post(&endpoint).send_json(payload) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let reason = response
                    .into_json::<RelayResponseBody>()
                    .ok()
                    .and_then(|body| body.error)
                    .unwrap_or_else(|| format!("relay responded with status {code}"));
                return Err(LaunchError::Rejected { reason });
            }
            Err(err) => {
                return Err(LaunchError::Relay {
                    endpoint,
                    reason: err.to_string(),
                })
            }
        };

        let body = response
            .into_json::<RelayResponseBody>()
            .map_err(|e| LaunchError::RelayResponse {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        match (body.address, body.error) {
            (_, Some(reason)) => Err(LaunchError::Rejected { reason }),
            (Some(address), None) if !address.trim().is_empty() => Ok(address),
            _ => Err(LaunchError::RelayResponse {
                endpoint,
                reason: "response carried neither address nor error".to_string(),
            }),
        }
    }
}
