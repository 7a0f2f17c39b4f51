//! # Keycloak SDK
//!
//! Obtains access tokens from a Keycloak realm's OpenID Connect token
//! endpoint and reads client secrets through the admin REST API.
//!
//! Two grants are supported, chosen from the credentials supplied:
//! - `client_credentials` when a client secret is given
//! - `password` when a username and password are given
//!
//! Supplying both, or neither, is a validation error raised before any
//! request is made.

pub mod client;
pub mod error;
pub mod params;
pub mod types;

pub use client::{get_client_secret, get_token, KeycloakClient};
pub use error::{ErrorResult, KeycloakError, Result};
pub use params::{ClientSecretLookup, ConnectionParams, Grant};
pub use types::TokenResult;
