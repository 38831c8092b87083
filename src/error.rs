use thiserror::Error;

/// Unified error type for verlog operations
#[derive(Error, Debug)]
pub enum VerlogError {
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in verlog
pub type Result<T> = std::result::Result<T, VerlogError>;

impl VerlogError {
    /// Create an invalid version error for the offending input
    pub fn invalid_version(input: impl Into<String>) -> Self {
        VerlogError::InvalidVersion(input.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VerlogError::Config(msg.into())
    }

    /// Returns true if this error came from semver validation.
    pub fn is_invalid_version(&self) -> bool {
        matches!(self, VerlogError::InvalidVersion(_))
    }
}
