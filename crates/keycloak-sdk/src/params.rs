//! Connection parameters and credential validation
//!
//! `ConnectionParams` is what a caller hands in. It is checked with
//! [`ConnectionParams::grant`] before any request leaves the process, which
//! turns the optional credential fields into exactly one [`Grant`].

use crate::error::{KeycloakError, Result};
use std::fmt;
use std::time::Duration;

/// Client used when none is configured, matching a stock Keycloak install
pub const DEFAULT_CLIENT_ID: &str = "admin-cli";

/// Default User-Agent header value
pub const DEFAULT_HTTP_AGENT: &str = "Ansible";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Parameters describing how to reach Keycloak and whom to authenticate as
#[derive(Clone)]
pub struct ConnectionParams {
    /// Keycloak base URL, e.g. `https://auth.example.com/auth`
    pub base_url: String,
    /// Realm holding the client and user
    pub realm: String,
    /// OpenID Connect client ID
    pub client_id: String,
    /// Secret for the `client_credentials` grant
    pub client_secret: Option<String>,
    /// Username for the `password` grant
    pub username: Option<String>,
    /// Password for the `password` grant
    pub password: Option<String>,
    /// Verify the server's TLS certificate
    pub validate_certs: bool,
    /// Upper bound on the whole request
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub http_agent: String,
}

impl ConnectionParams {
    /// Create parameters with defaults for everything but the location
    pub fn new(base_url: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            realm: realm.into(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: None,
            username: None,
            password: None,
            validate_certs: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http_agent: DEFAULT_HTTP_AGENT.to_string(),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Authenticate with the `client_credentials` grant
    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Authenticate with the `password` grant
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn validate_certs(mut self, validate: bool) -> Self {
        self.validate_certs = validate;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn http_agent(mut self, agent: impl Into<String>) -> Self {
        self.http_agent = agent.into();
        self
    }

    /// Base URL without trailing slashes, after checking its scheme
    pub fn normalized_base_url(&self) -> Result<&str> {
        let lower = self.base_url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(KeycloakError::Validation(format!(
                "auth_url '{}' should either start with 'http' or 'https'.",
                self.base_url
            )));
        }
        Ok(self.base_url.trim_end_matches('/'))
    }

    /// Check the location fields shared by every request
    pub fn validate_location(&self) -> Result<()> {
        self.normalized_base_url()?;
        if self.realm.trim().is_empty() {
            return Err(KeycloakError::Validation("realm must not be empty".into()));
        }
        if self.client_id.trim().is_empty() {
            return Err(KeycloakError::Validation(
                "client_id must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the credential fields into a single grant
    ///
    /// Supplying a client secret together with user credentials is rejected
    /// rather than silently preferring one of them.
    pub fn grant(&self) -> Result<Grant> {
        self.validate_location()?;

        let secret = non_empty(&self.client_secret);
        let username = non_empty(&self.username);
        let password = non_empty(&self.password);

        match (secret, username, password) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(KeycloakError::Validation(
                "client_secret and username/password are mutually exclusive".into(),
            )),
            (Some(secret), None, None) => Ok(Grant::ClientCredentials {
                client_secret: secret.to_string(),
            }),
            (None, Some(username), Some(password)) => Ok(Grant::Password {
                username: username.to_string(),
                password: password.to_string(),
            }),
            (None, Some(_), None) | (None, None, Some(_)) => Err(KeycloakError::Validation(
                "username and password must be supplied together".into(),
            )),
            (None, None, None) => Err(KeycloakError::Validation(
                "either client_secret or username and password are required".into(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("base_url", &self.base_url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("validate_certs", &self.validate_certs)
            .field("timeout", &self.timeout)
            .field("http_agent", &self.http_agent)
            .finish()
    }
}

/// OAuth2 grant derived from validated parameters
#[derive(Clone, PartialEq, Eq)]
pub enum Grant {
    ClientCredentials { client_secret: String },
    Password { username: String, password: String },
}

impl Grant {
    /// Value of the `grant_type` form field
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::ClientCredentials { .. } => "client_credentials",
            Grant::Password { .. } => "password",
        }
    }

    /// Form body for the token endpoint
    pub fn form<'a>(&'a self, client_id: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![("grant_type", self.grant_type()), ("client_id", client_id)];
        match self {
            Grant::ClientCredentials { client_secret } => {
                form.push(("client_secret", client_secret.as_str()));
            }
            Grant::Password { username, password } => {
                form.push(("username", username.as_str()));
                form.push(("password", password.as_str()));
            }
        }
        form
    }
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::ClientCredentials { .. } => f.write_str("ClientCredentials"),
            Grant::Password { username, .. } => {
                f.debug_struct("Password").field("username", username).finish()
            }
        }
    }
}

/// Identifies the client whose secret should be read through the admin API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecretLookup {
    /// Realm the client lives in
    pub realm: String,
    /// Public client ID, used to find the internal id when `id` is absent
    pub client_id: Option<String>,
    /// Internal client UUID
    pub id: Option<String>,
}

impl ClientSecretLookup {
    pub fn by_client_id(realm: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            client_id: Some(client_id.into()),
            id: None,
        }
    }

    pub fn by_id(realm: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            client_id: None,
            id: Some(id.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.realm.trim().is_empty() {
            return Err(KeycloakError::Validation("realm must not be empty".into()));
        }
        if non_empty(&self.id).is_none() && non_empty(&self.client_id).is_none() {
            return Err(KeycloakError::Validation(
                "one of client_id or id is required to look up a client secret".into(),
            ));
        }
        Ok(())
    }
}
