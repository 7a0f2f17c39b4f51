//! Type definitions for the Keycloak SDK

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token issued by the OpenID Connect token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResult {
    /// Access token for API requests
    pub access_token: String,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    /// Refresh token, when the grant issues one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The full decoded response body
    #[serde(skip)]
    pub raw: Map<String, Value>,
}

impl TokenResult {
    /// Build a token result from a decoded token endpoint body
    ///
    /// Only `access_token` is mandatory. `token_type` falls back to `Bearer`
    /// and `expires_in` to 0 when Keycloak leaves them out.
    pub fn from_body(body: Value) -> Result<Self, String> {
        let raw = match body {
            Value::Object(map) => map,
            other => {
                return Err(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                ))
            }
        };

        let access_token = raw
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| "missing access_token in response".to_string())?
            .to_string();

        let token_type = raw
            .get("token_type")
            .and_then(Value::as_str)
            .unwrap_or("Bearer")
            .to_string();

        let expires_in = match raw.get("expires_in") {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_i64()
                .ok_or_else(|| format!("expires_in is not an integer: {value}"))?,
        };

        let refresh_token = raw
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            access_token,
            token_type,
            expires_in,
            refresh_token,
            raw,
        })
    }

    /// Granted scopes, split from the space-delimited `scope` field
    pub fn scopes(&self) -> Vec<String> {
        self.raw
            .get("scope")
            .and_then(Value::as_str)
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }
}

/// Body of `GET /admin/realms/{realm}/clients/{id}/client-secret`
#[derive(Debug, Deserialize)]
pub(crate) struct ClientSecretResponse {
    pub value: Option<String>,
}

/// Entry of `GET /admin/realms/{realm}/clients?clientId=...`
#[derive(Debug, Deserialize)]
pub(crate) struct ClientRepresentation {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
