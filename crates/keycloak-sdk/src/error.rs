//! Error types for the Keycloak SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for Keycloak operations
pub type Result<T> = std::result::Result<T, KeycloakError>;

/// Everything that can go wrong while talking to Keycloak
#[derive(Debug, Error)]
pub enum KeycloakError {
    /// Parameters were rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// DNS, TLS, connect or timeout failure
    #[error("Could not obtain a response from {url}: {message}")]
    Connection {
        url: String,
        message: String,
        timed_out: bool,
    },

    /// Keycloak answered with a non-success status
    #[error("{url} returned HTTP {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// The response body was not the JSON we expected
    #[error("{message}")]
    Parse { url: String, message: String },

    /// The HTTP client itself could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl KeycloakError {
    pub(crate) fn connection(url: &str, err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let message = if timed_out {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        KeycloakError::Connection {
            url: url.to_string(),
            message,
            timed_out,
        }
    }

    /// HTTP status carried by the error, if Keycloak answered at all
    pub fn http_status(&self) -> Option<u16> {
        match self {
            KeycloakError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, KeycloakError::Connection { timed_out: true, .. })
    }

    /// Flatten into the caller-facing failure record
    pub fn to_error_result(&self) -> ErrorResult {
        let body = match self {
            KeycloakError::Http { body, .. } => body.clone(),
            _ => None,
        };
        ErrorResult {
            http_status: self.http_status(),
            message: self.to_string(),
            body,
        }
    }
}

/// Failure record handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Status code when Keycloak answered; absent for local or network failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl From<&KeycloakError> for ErrorResult {
    fn from(err: &KeycloakError) -> Self {
        err.to_error_result()
    }
}

/// Standard OAuth2 error body, e.g. `{"error": "invalid_grant", "error_description": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorBody {
    pub error: Option<String>,
    pub error_description: Option<String>,
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,
}

impl OAuthErrorBody {
    /// Human-readable summary, if the body carried one
    pub fn summary(&self) -> Option<String> {
        match (&self.error, &self.error_description, &self.error_message) {
            (Some(code), Some(desc), _) => Some(format!("{code}: {desc}")),
            (Some(code), None, _) => Some(code.clone()),
            (None, Some(desc), _) => Some(desc.clone()),
            (None, None, Some(msg)) => Some(msg.clone()),
            (None, None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_result_keeps_status_and_body() {
        let err = KeycloakError::Http {
            url: "https://kc/realms/master/protocol/openid-connect/token".into(),
            status: 401,
            message: "invalid_client: Invalid client credentials".into(),
            body: Some("{\"error\":\"invalid_client\"}".into()),
        };
        let result = err.to_error_result();
        assert_eq!(result.http_status, Some(401));
        assert!(result.message.contains("HTTP 401"));
        assert_eq!(result.body.as_deref(), Some("{\"error\":\"invalid_client\"}"));
    }

    #[test]
    fn test_validation_error_has_no_status() {
        let err = KeycloakError::Validation("missing credentials".into());
        let result = ErrorResult::from(&err);
        assert_eq!(result.http_status, None);
        assert_eq!(result.message, "missing credentials");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_oauth_error_summary() {
        let body: OAuthErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid user credentials"}"#,
        )
        .unwrap();
        assert_eq!(
            body.summary().as_deref(),
            Some("invalid_grant: Invalid user credentials")
        );

        let admin: OAuthErrorBody =
            serde_json::from_str(r#"{"errorMessage":"Client not found"}"#).unwrap();
        assert_eq!(admin.summary().as_deref(), Some("Client not found"));

        let empty: OAuthErrorBody = serde_json::from_str("{}").unwrap();
        assert!(empty.summary().is_none());
    }
}
