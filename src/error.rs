//! Custom error types for douglas
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the douglas application
#[derive(Error, Debug)]
pub enum DouglasError {
    /// App file does not exist in the apps directory
    #[error("App '{0}' not found.\n\n  → Run 'douglas apps' to see available apps.")]
    AppNotFound(String),

    /// App exists but declares no database
    #[error("App '{0}' has no database configured.\n\n  → Add a [database] table with at least one model to its app file.")]
    NoDatabase(String),

    /// Model or app name unusable as a storage identifier
    #[error("Invalid identifier '{0}'.\n\n  → Use letters, digits and underscores only, starting with a letter or underscore.")]
    InvalidIdentifier(String),

    /// Configuration error (missing or ambiguous model declarations, settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store error
    #[error("Database operation failed: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Terminal error (raw mode, screen control, input)
    #[error("Terminal error: {0}\n\n  → Run 'reset' if your terminal looks broken.")]
    Terminal(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),
}

impl DouglasError {
    /// Whether this error belongs to the configuration family
    /// (reported before any store or terminal operation happens)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DouglasError::AppNotFound(_)
                | DouglasError::NoDatabase(_)
                | DouglasError::InvalidIdentifier(_)
                | DouglasError::Configuration(_)
        )
    }
}

impl From<toml::de::Error> for DouglasError {
    fn from(err: toml::de::Error) -> Self {
        DouglasError::Toml(err.to_string())
    }
}

/// Result type alias using DouglasError
pub type Result<T> = std::result::Result<T, DouglasError>;
