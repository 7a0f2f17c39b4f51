//! # get_token
//!
//! Ansible binary module retrieving an authentication token from Keycloak.
//!
//! The module:
//! - reads the task arguments from the JSON file Ansible passes as its only argument
//! - fills unset options from `keycloak-token.toml` and `KEYCLOAK_TOKEN_*` variables
//! - requests a token with the `client_credentials` or `password` grant
//! - optionally reads a client secret through the admin API with that token
//! - prints one JSON result on stdout, never reporting `changed`

pub mod arguments;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod result;

pub use cli::*;
pub use error::*;
