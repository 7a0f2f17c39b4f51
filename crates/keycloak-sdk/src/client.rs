//! HTTP client for Keycloak's token endpoint and admin API
//!
//! Each call issues exactly one request (two for a secret lookup by public
//! client ID) with no retries and no caching.
//!
//! # Usage
//!
//! ```rust,no_run
//! use keycloak_sdk::{ConnectionParams, KeycloakClient};
//!
//! # async fn example() -> keycloak_sdk::Result<()> {
//! let params = ConnectionParams::new("https://auth.example.com/auth", "master")
//!     .with_user("admin", "password");
//!
//! let client = KeycloakClient::new(&params)?;
//! let token = client.get_token(&params).await?;
//! println!("{} expires in {}s", token.token_type, token.expires_in);
//! # Ok(())
//! # }
//! ```

use crate::{
    error::{KeycloakError, OAuthErrorBody, Result},
    params::{ClientSecretLookup, ConnectionParams, Grant},
    types::{ClientRepresentation, ClientSecretResponse, TokenResult},
};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Client bound to one Keycloak server
#[derive(Debug)]
pub struct KeycloakClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl KeycloakClient {
    /// Build a client from the connection settings in `params`
    ///
    /// Only the location, TLS, timeout and agent settings are used here;
    /// credentials are read per call.
    pub fn new(params: &ConnectionParams) -> Result<Self> {
        let base_url = params.normalized_base_url()?.to_string();

        if !params.validate_certs {
            warn!(base_url = %base_url, "TLS certificate validation is disabled");
        }

        let http_client = reqwest::Client::builder()
            .timeout(params.timeout)
            .connect_timeout(params.timeout)
            .user_agent(params.http_agent.as_str())
            .danger_accept_invalid_certs(!params.validate_certs)
            .build()
            .map_err(KeycloakError::HttpClient)?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/realms/{realm}/protocol/openid-connect/token`
    pub fn token_url(&self, realm: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url,
            urlencoding::encode(realm)
        )
    }

    fn admin_clients_url(&self, realm: &str) -> String {
        format!(
            "{}/admin/realms/{}/clients",
            self.base_url,
            urlencoding::encode(realm)
        )
    }

    fn client_secret_url(&self, realm: &str, id: &str) -> String {
        format!(
            "{}/{}/client-secret",
            self.admin_clients_url(realm),
            urlencoding::encode(id)
        )
    }

    // ===== Token endpoint =====

    /// Request an access token using the grant implied by `params`
    ///
    /// Parameters are validated before anything is sent.
    pub async fn get_token(&self, params: &ConnectionParams) -> Result<TokenResult> {
        let grant = params.grant()?;
        self.request_token(&params.realm, &params.client_id, &grant)
            .await
    }

    /// Request an access token with an already validated grant
    pub async fn request_token(
        &self,
        realm: &str,
        client_id: &str,
        grant: &Grant,
    ) -> Result<TokenResult> {
        let url = self.token_url(realm);
        debug!(
            url = %url,
            client_id = client_id,
            grant_type = grant.grant_type(),
            "Requesting access token"
        );

        let response = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .form(&grant.form(client_id))
            .send()
            .await
            .map_err(|e| KeycloakError::connection(&url, e))?;

        let body: serde_json::Value = self.handle_response(&url, response).await?;
        let token = TokenResult::from_body(body).map_err(|reason| KeycloakError::Parse {
            url: url.clone(),
            message: format!("Could not obtain access token from {url}: {reason}"),
        })?;

        info!(
            realm = realm,
            client_id = client_id,
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "Access token obtained"
        );
        Ok(token)
    }

    // ===== Admin API =====

    /// Read a client's secret through the admin API
    ///
    /// When the lookup carries only the public client ID, the internal id is
    /// resolved first.
    pub async fn get_client_secret(
        &self,
        lookup: &ClientSecretLookup,
        admin_token: &str,
    ) -> Result<String> {
        lookup.validate()?;

        let id = match lookup.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let client_id = lookup.client_id.as_deref().unwrap_or_default();
                self.find_client_uuid(&lookup.realm, client_id, admin_token)
                    .await?
            }
        };

        let url = self.client_secret_url(&lookup.realm, &id);
        debug!(url = %url, "Fetching client secret");

        let request = self.http_client.get(&url).bearer_auth(admin_token);
        let response: ClientSecretResponse = self.send_json(&url, request).await?;

        let secret = response
            .value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| KeycloakError::Parse {
                url: url.clone(),
                message: format!("API response from {url} has no client secret value"),
            })?;

        info!(realm = %lookup.realm, "Client secret retrieved");
        Ok(secret)
    }

    /// Resolve a public client ID to Keycloak's internal client UUID
    pub async fn find_client_uuid(
        &self,
        realm: &str,
        client_id: &str,
        admin_token: &str,
    ) -> Result<String> {
        let url = self.admin_clients_url(realm);
        debug!(url = %url, client_id = client_id, "Resolving client id");

        let request = self
            .http_client
            .get(&url)
            .query(&[("clientId", client_id)])
            .bearer_auth(admin_token);
        let clients: Vec<ClientRepresentation> = self.send_json(&url, request).await?;

        clients
            .into_iter()
            .find(|c| c.client_id.as_deref().map_or(true, |cid| cid == client_id))
            .map(|c| c.id)
            .ok_or_else(|| KeycloakError::Http {
                url: url.clone(),
                status: StatusCode::NOT_FOUND.as_u16(),
                message: format!("client '{client_id}' not found in realm '{realm}'"),
                body: None,
            })
    }

    // ===== Private Helper Methods =====

    async fn send_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| KeycloakError::connection(url, e))?;
        self.handle_response(url, response).await
    }

    /// Decode a success body, or turn anything else into an error
    async fn handle_response<T: DeserializeOwned>(&self, url: &str, response: Response) -> Result<T> {
        let status = response.status();
        if status != StatusCode::OK {
            return self.handle_error_response(url, response).await;
        }

        let text = response
            .text()
            .await
            .map_err(|e| KeycloakError::connection(url, e))?;

        serde_json::from_str(&text).map_err(|e| KeycloakError::Parse {
            url: url.to_string(),
            message: format!(
                "API returned invalid JSON when trying to obtain data from {url}: {e}"
            ),
        })
    }

    async fn handle_error_response<T>(&self, url: &str, response: Response) -> Result<T> {
        let status = response.status();
        // A body that cannot be read still leaves the status to report.
        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                debug!(
                    url = %url,
                    status = status.as_u16(),
                    error = %e,
                    "Failed to read error response body"
                );
                String::new()
            }
        };

        let summary = serde_json::from_str::<OAuthErrorBody>(&error_text)
            .ok()
            .and_then(|body| body.summary());

        let message = match summary {
            Some(summary) => summary,
            None if !error_text.trim().is_empty() => error_text.trim().to_string(),
            None => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        debug!(url = %url, status = status.as_u16(), "Keycloak returned an error");

        Err(KeycloakError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            message,
            body: (!error_text.is_empty()).then_some(error_text),
        })
    }
}

/// Request a token, validating `params` before any client is built
pub async fn get_token(params: &ConnectionParams) -> Result<TokenResult> {
    let grant = params.grant()?;
    let client = KeycloakClient::new(params)?;
    client
        .request_token(&params.realm, &params.client_id, &grant)
        .await
}

/// Read the secret of the client named by `params.client_id` in `params.realm`
pub async fn get_client_secret(params: &ConnectionParams, admin_token: &str) -> Result<String> {
    params.validate_location()?;
    let client = KeycloakClient::new(params)?;
    let lookup = ClientSecretLookup::by_client_id(&params.realm, &params.client_id);
    client.get_client_secret(&lookup, admin_token).await
}
