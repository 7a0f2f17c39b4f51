//! Layered configuration loading
//!
//! Settings are resolved in this order, later sources winning:
//! 1. Serialized defaults of the configuration type
//! 2. A TOML file (explicit path, or the type's default file if present)
//! 3. Environment variables with the type's prefix, `__` separating nesting

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

/// Configuration types loadable from defaults, a TOML file and the environment
pub trait ConfigLoader: Serialize + DeserializeOwned + Default {
    /// File consulted when no explicit path is given
    const DEFAULT_FILE: &'static str;

    /// Prefix of the environment variables overriding file values
    const ENV_PREFIX: &'static str;

    /// Load configuration, reading `path` if given or the default file if it exists
    fn load(path: Option<PathBuf>) -> Result<Self, ConfigurationError> {
        match path {
            Some(p) => Self::load_from_file(&p),
            None => {
                let mut figment = Figment::from(Serialized::defaults(Self::default()));
                let default_path = PathBuf::from(Self::DEFAULT_FILE);
                if default_path.exists() {
                    figment = figment.merge(Toml::file(default_path));
                }
                extract(figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__")))
            }
        }
    }

    /// Load configuration from an explicit file, which must exist
    fn load_from_file(path: &Path) -> Result<Self, ConfigurationError> {
        if !path.exists() {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"));

        extract(figment)
    }
}

fn extract<T: DeserializeOwned>(figment: Figment) -> Result<T, ConfigurationError> {
    figment.extract().map_err(|e| ConfigurationError::ParseError {
        details: e.to_string(),
    })
}
