//! Audio backend error types

use thiserror::Error;

use crate::settings::SettingsError;

/// Errors a backend can report while starting or running
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio devices available on the host
    #[error("No audio output devices found")]
    NoDevices,

    /// The requested audio host is not available on this system
    #[error("Audio host unavailable: {0}")]
    HostUnavailable(String),

    /// Device not found
    #[error("Audio device not found: {0}")]
    DeviceNotFound(String),

    /// Failed to get device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start/play stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),

    /// Unsupported sample format
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Output file could not be created or written
    #[error("Audio file error: {0}")]
    FileError(String),

    /// A driver parameter could not be read from the settings store
    #[error("Driver setting error: {0}")]
    Settings(#[from] SettingsError),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
