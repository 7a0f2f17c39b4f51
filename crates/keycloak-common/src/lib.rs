//! Shared plumbing for the Keycloak token workspace
//!
//! Binaries in this workspace use the same logging setup and the same
//! layered configuration loader, both kept here.

pub mod config;
pub mod error;
pub mod logging;

pub use config::ConfigLoader;
pub use error::ConfigurationError;
