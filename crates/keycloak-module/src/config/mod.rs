//! Configuration management for the get_token module
//!
//! Module defaults can be set per control node without touching playbooks,
//! either in `keycloak-token.toml` or through `KEYCLOAK_TOKEN_*` variables.
//! Task arguments always take precedence over these values.

use keycloak_common::ConfigLoader;
use keycloak_sdk::params::{DEFAULT_CLIENT_ID, DEFAULT_HTTP_AGENT, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults applied to task arguments that were not supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleDefaults {
    /// OpenID Connect client used to authenticate
    pub client_id: String,

    /// Verify TLS certificates
    pub validate_certs: bool,

    /// Request timeout in seconds
    pub connection_timeout: u64,

    /// User-Agent header value
    pub http_agent: String,
}

impl Default for ModuleDefaults {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            validate_certs: true,
            connection_timeout: DEFAULT_TIMEOUT_SECS,
            http_agent: DEFAULT_HTTP_AGENT.to_string(),
        }
    }
}

impl ModuleDefaults {
    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

impl ConfigLoader for ModuleDefaults {
    const DEFAULT_FILE: &'static str = "keycloak-token.toml";
    const ENV_PREFIX: &'static str = "KEYCLOAK_TOKEN_";
}
