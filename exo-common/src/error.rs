//! Common error types for ExO

use thiserror::Error;

/// Common result type for ExO operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the ExO crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
