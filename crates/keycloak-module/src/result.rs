//! Result objects in the shape Ansible expects on a module's stdout

use crate::error::ModuleError;
use keycloak_sdk::{KeycloakError, TokenResult};
use serde::Serialize;

/// Successful module run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSuccess {
    /// Fetching a token never changes the managed system
    pub changed: bool,
    /// The access token, under the key existing playbooks already read
    pub token: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Scopes granted with the token
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl ModuleSuccess {
    pub fn new(token: TokenResult, client_secret: Option<String>) -> Self {
        let scope = token.scopes();
        Self {
            changed: false,
            token: token.access_token.clone(),
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            refresh_token: token.refresh_token,
            scope,
            client_secret,
        }
    }
}

/// Failed module run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleFailure {
    pub changed: bool,
    pub failed: bool,
    pub msg: String,
    /// HTTP status returned by Keycloak
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Raw error body returned by Keycloak
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ModuleFailure {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: msg.into(),
            status: None,
            body: None,
        }
    }
}

impl From<&ModuleError> for ModuleFailure {
    fn from(err: &ModuleError) -> Self {
        match err {
            ModuleError::Keycloak(inner) => {
                let detail = inner.to_error_result();
                let msg = match inner {
                    KeycloakError::Validation(_) => detail.message,
                    _ => format!("Could not obtain data from Keycloak: {}", detail.message),
                };
                Self {
                    status: detail.http_status,
                    body: detail.body,
                    ..Self::new(msg)
                }
            }
            other => Self::new(other.to_string()),
        }
    }
}

/// Either outcome, serialized without a tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModuleResult {
    Success(ModuleSuccess),
    Failure(ModuleFailure),
}

impl ModuleResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, ModuleResult::Failure(_))
    }
}

impl From<Result<ModuleSuccess, ModuleError>> for ModuleResult {
    fn from(result: Result<ModuleSuccess, ModuleError>) -> Self {
        match result {
            Ok(success) => ModuleResult::Success(success),
            Err(err) => ModuleResult::Failure(ModuleFailure::from(&err)),
        }
    }
}
