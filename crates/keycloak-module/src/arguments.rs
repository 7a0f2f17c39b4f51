//! Task arguments as Ansible writes them to the module's argument file
//!
//! Binary modules receive the raw task arguments, so the type coercion
//! Ansible normally performs for Python modules happens here: booleans may
//! arrive as `"yes"`/`"no"` and integers as numeric strings.

use crate::config::ModuleDefaults;
use crate::error::{ModuleError, Result};
use keycloak_sdk::{ClientSecretLookup, ConnectionParams};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::time::Duration;

/// Arguments accepted by the `get_token` module
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleArgs {
    /// URL to the Keycloak instance
    #[serde(alias = "url")]
    pub auth_keycloak_url: Option<String>,

    /// Realm to authenticate against
    pub auth_realm: Option<String>,

    /// OpenID Connect client to authenticate with
    pub auth_client_id: Option<String>,

    /// Client secret for the `client_credentials` grant
    pub auth_client_secret: Option<String>,

    #[serde(alias = "username")]
    pub auth_username: Option<String>,

    #[serde(alias = "password")]
    pub auth_password: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub validate_certs: Option<bool>,

    /// Timeout in seconds
    #[serde(default, deserialize_with = "lenient_u64")]
    pub connection_timeout: Option<u64>,

    pub http_agent: Option<String>,

    /// Public ID of a client whose secret should be returned
    pub client_id: Option<String>,

    /// Internal UUID of a client whose secret should be returned
    pub id: Option<String>,

    /// Realm of the client whose secret is looked up, defaults to `auth_realm`
    pub realm: Option<String>,
}

impl ModuleArgs {
    /// Parse the JSON argument file, dropping Ansible's internal keys
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ModuleError::arguments(format!("Module arguments are not valid JSON: {e}")))?;

        let Value::Object(map) = value else {
            return Err(ModuleError::arguments(
                "Module arguments must be a JSON object",
            ));
        };

        let user_args: Map<String, Value> = map
            .into_iter()
            .filter(|(key, _)| !key.starts_with("_ansible_"))
            .collect();

        serde_json::from_value(Value::Object(user_args))
            .map_err(|e| ModuleError::arguments(format!("Unsupported parameters: {e}")))
    }

    /// Connection parameters, with unset options taken from `defaults`
    pub fn connection_params(&self, defaults: &ModuleDefaults) -> Result<ConnectionParams> {
        let base_url = required(&self.auth_keycloak_url, "auth_keycloak_url")?;
        let realm = required(&self.auth_realm, "auth_realm")?;

        let timeout = self
            .connection_timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| defaults.connection_timeout());

        Ok(ConnectionParams {
            base_url: base_url.to_string(),
            realm: realm.to_string(),
            client_id: self
                .auth_client_id
                .clone()
                .unwrap_or_else(|| defaults.client_id.clone()),
            client_secret: self.auth_client_secret.clone(),
            username: self.auth_username.clone(),
            password: self.auth_password.clone(),
            validate_certs: self.validate_certs.unwrap_or(defaults.validate_certs),
            timeout,
            http_agent: self
                .http_agent
                .clone()
                .unwrap_or_else(|| defaults.http_agent.clone()),
        })
    }

    /// Secret lookup requested by the task, if any
    pub fn secret_lookup(&self) -> Option<ClientSecretLookup> {
        if self.client_id.is_none() && self.id.is_none() {
            return None;
        }
        let realm = self
            .realm
            .clone()
            .or_else(|| self.auth_realm.clone())
            .unwrap_or_default();
        Some(ClientSecretLookup {
            realm,
            client_id: self.client_id.clone(),
            id: self.id.clone(),
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ModuleError::arguments(format!("missing required arguments: {name}")))
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(1) => Ok(Some(true)),
            Some(0) => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("{n} is not a valid boolean"))),
        },
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "t" | "on" | "1" => Ok(Some(true)),
            "no" | "n" | "false" | "f" | "off" | "0" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("'{s}' is not a valid boolean"))),
        },
        Some(other) => Err(D::Error::custom(format!("{other} is not a valid boolean"))),
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{n} is not a valid non-negative integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{s}' is not a valid non-negative integer"))),
        Some(other) => Err(D::Error::custom(format!(
            "{other} is not a valid non-negative integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_aliases_and_internal_keys() {
        let args = ModuleArgs::parse(
            r#"{
                "url": "https://auth.example.com/auth",
                "auth_realm": "master",
                "username": "admin",
                "password": "pw",
                "_ansible_check_mode": false,
                "_ansible_no_log": true,
                "_ansible_module_name": "pytoccaz.keycloak.get_token"
            }"#,
        )
        .unwrap();

        assert_eq!(
            args.auth_keycloak_url.as_deref(),
            Some("https://auth.example.com/auth")
        );
        assert_eq!(args.auth_username.as_deref(), Some("admin"));
        assert_eq!(args.auth_password.as_deref(), Some("pw"));
        assert!(args.secret_lookup().is_none());
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let err = ModuleArgs::parse(r#"{"auth_keycloak_url": "https://kc", "colour": "blue"}"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("Unsupported parameters"));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ModuleArgs::parse("[1, 2]").is_err());
        assert!(ModuleArgs::parse("not json").is_err());
    }

    #[test]
    fn test_ansible_style_coercion() {
        let args = ModuleArgs::parse(
            r#"{"validate_certs": "no", "connection_timeout": "25"}"#,
        )
        .unwrap();
        assert_eq!(args.validate_certs, Some(false));
        assert_eq!(args.connection_timeout, Some(25));

        let args = ModuleArgs::parse(r#"{"validate_certs": "True", "connection_timeout": 5}"#)
            .unwrap();
        assert_eq!(args.validate_certs, Some(true));
        assert_eq!(args.connection_timeout, Some(5));

        assert!(ModuleArgs::parse(r#"{"validate_certs": "maybe"}"#).is_err());
        assert!(ModuleArgs::parse(r#"{"connection_timeout": -3}"#).is_err());
    }

    #[test]
    fn test_defaults_fill_unset_options() {
        let args = ModuleArgs::parse(
            r#"{"auth_keycloak_url": "https://kc", "auth_realm": "master", "auth_client_secret": "s"}"#,
        )
        .unwrap();
        let defaults = ModuleDefaults {
            client_id: "automation".into(),
            validate_certs: false,
            connection_timeout: 4,
            http_agent: "ops".into(),
        };

        let params = args.connection_params(&defaults).unwrap();
        assert_eq!(params.client_id, "automation");
        assert!(!params.validate_certs);
        assert_eq!(params.timeout, Duration::from_secs(4));
        assert_eq!(params.http_agent, "ops");
        assert_eq!(params.client_secret.as_deref(), Some("s"));
    }

    #[test]
    fn test_task_arguments_override_defaults() {
        let args = ModuleArgs::parse(
            r#"{"url": "https://kc", "auth_realm": "master", "auth_client_id": "cli",
                "validate_certs": true, "connection_timeout": 30, "http_agent": "me"}"#,
        )
        .unwrap();
        let defaults = ModuleDefaults {
            validate_certs: false,
            ..ModuleDefaults::default()
        };

        let params = args.connection_params(&defaults).unwrap();
        assert_eq!(params.client_id, "cli");
        assert!(params.validate_certs);
        assert_eq!(params.timeout, Duration::from_secs(30));
        assert_eq!(params.http_agent, "me");
    }

    #[test]
    fn test_required_arguments() {
        let args = ModuleArgs::parse(r#"{"auth_realm": "master"}"#).unwrap();
        let err = args.connection_params(&ModuleDefaults::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing required arguments: auth_keycloak_url");

        let args = ModuleArgs::parse(r#"{"url": "https://kc"}"#).unwrap();
        let err = args.connection_params(&ModuleDefaults::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing required arguments: auth_realm");
    }

    #[test]
    fn test_secret_lookup_realm_falls_back_to_auth_realm() {
        let args = ModuleArgs::parse(
            r#"{"url": "https://kc", "auth_realm": "master", "client_id": "billing"}"#,
        )
        .unwrap();
        let lookup = args.secret_lookup().unwrap();
        assert_eq!(lookup.realm, "master");
        assert_eq!(lookup.client_id.as_deref(), Some("billing"));

        let args = ModuleArgs::parse(
            r#"{"url": "https://kc", "auth_realm": "master", "realm": "apps", "id": "0c2b"}"#,
        )
        .unwrap();
        let lookup = args.secret_lookup().unwrap();
        assert_eq!(lookup.realm, "apps");
        assert_eq!(lookup.id.as_deref(), Some("0c2b"));
    }
}
