//! Error types for the get_token module

use keycloak_sdk::KeycloakError;
use thiserror::Error;

/// Module error type with minimal variants
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Configuration file or environment issues
    #[error("Configuration error: {0}")]
    Config(#[from] keycloak_common::ConfigurationError),

    /// The argument file Ansible handed us could not be read
    #[error("Failed to read module arguments from {path}: {source}")]
    ArgsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Task arguments are malformed, unsupported or missing
    #[error("{0}")]
    Arguments(String),

    /// Keycloak communication or validation errors
    #[error(transparent)]
    Keycloak(#[from] KeycloakError),
}

impl ModuleError {
    pub fn arguments(message: impl Into<String>) -> Self {
        ModuleError::Arguments(message.into())
    }
}

/// Result type alias for module operations
pub type Result<T> = std::result::Result<T, ModuleError>;
