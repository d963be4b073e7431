//! Runtime error types

use autoproxy_engine::SynthesisError;
use autoproxy_sdk::InvokeError;
use thiserror::Error;

/// Result type for registrar operations
pub type RegistrarResult<T> = Result<T, RegistrarError>;

/// Errors that can occur while loading proxy configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An enable flag that is not a recognizable boolean
    #[error("Invalid value for {name}: {value:?}")]
    InvalidFlag { name: String, value: String },
}

/// Errors raised by the bean registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Bean already registered: {0}")]
    DuplicateBean(String),

    #[error("No bean named {0}")]
    UnknownBean(String),

    /// No delegate is available for an injection point
    #[error("Cannot inject {bean}.{field}: no delegate for {type_name}")]
    UnresolvedDependency {
        bean: String,
        field: String,
        type_name: String,
    },

    #[error("Injection failed: {0}")]
    Invoke(#[from] InvokeError),
}

/// Errors for a single remote interface during registration
#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Registration failed: {0}")]
    Registry(#[from] RegistryError),
}
