//! Configuration module for materials-search
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use thiserror::Error;

/// Invalid provider or city configuration, detected at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("provider '{name}' uses unknown implementation '{provider}'")]
    UnknownProviderType { name: String, provider: String },
    #[error("city '{city}' references unknown provider '{provider}'")]
    UnknownCityProvider { city: String, provider: String },
    #[error("city '{0}' has no providers")]
    EmptyCity(String),
}
