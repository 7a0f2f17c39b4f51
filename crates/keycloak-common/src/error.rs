//! Configuration error type shared by every crate that loads settings

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration sources could not be merged or extracted
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}
