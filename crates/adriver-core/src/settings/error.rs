//! Settings store error types

use thiserror::Error;

/// Errors that can occur when registering or accessing settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// No setting registered under this name
    #[error("Unknown setting '{0}'")]
    Unknown(String),

    /// Setting exists but holds a different type
    #[error("Setting '{name}' is not a {expected} setting")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    /// Integer value outside the registered bounds
    #[error("Value {value} for '{name}' is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Registration with a default outside its own bounds
    #[error("Invalid bounds for '{name}': default {default} not in {min}..={max}")]
    InvalidBounds {
        name: String,
        default: i64,
        min: i64,
        max: i64,
    },
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
