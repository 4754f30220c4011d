//! Audio driver configuration
//!
//! Names, defaults and bounds of the common driver settings, and the typed
//! snapshot backends read them into when they start.

use crate::settings::Settings;
use crate::types::SampleFormat;

use super::error::{AudioError, AudioResult};

/// Output sample format (`"16bits"` or `"float"`)
pub const SAMPLE_FORMAT: &str = "sample-format";
/// Frames per period
pub const PERIOD_SIZE: &str = "period-size";
/// Number of periods in the device buffer
pub const PERIODS: &str = "periods";
/// Priority of the audio thread (0-99)
pub const REALTIME_PRIORITY: &str = "realtime-priority";
/// Output sample rate in Hz
pub const SAMPLE_RATE: &str = "sample-rate";
/// Backend name to use, or [`AUTO`]
pub const SELECTED_BACKEND: &str = "selected-backend";

/// Value of [`SELECTED_BACKEND`] that tries every enabled backend in order
pub const AUTO: &str = "auto";

/// Default sample rate for the audio system (48kHz)
pub const DEFAULT_SAMPLE_RATE: i64 = 48000;
pub const MIN_SAMPLE_RATE: i64 = 8000;
pub const MAX_SAMPLE_RATE: i64 = 192000;

/// (default, min, max) for `period-size` and `periods` on this platform
#[cfg(target_os = "windows")]
pub const PERIOD_SIZE_PRESET: (i64, i64, i64) = (512, 64, 8192);
#[cfg(target_os = "windows")]
pub const PERIODS_PRESET: (i64, i64, i64) = (8, 2, 64);

// Apple targets get the low-latency preset: small periods, few of them
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const PERIOD_SIZE_PRESET: (i64, i64, i64) = (64, 64, 8192);
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const PERIODS_PRESET: (i64, i64, i64) = (8, 2, 64);

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "ios")))]
pub const PERIOD_SIZE_PRESET: (i64, i64, i64) = (64, 64, 8192);
#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "ios")))]
pub const PERIODS_PRESET: (i64, i64, i64) = (16, 2, 64);

/// Default audio thread priority
#[cfg(unix)]
pub const DEFAULT_REALTIME_PRIORITY: i64 = 60;
#[cfg(not(unix))]
pub const DEFAULT_REALTIME_PRIORITY: i64 = 0;

/// Common driver parameters, read once when a backend starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Frames per period (the device buffer size requested from the host)
    pub period_size: u32,
    /// Number of periods
    pub periods: u32,
    pub sample_format: SampleFormat,
    pub sample_rate: u32,
    pub realtime_priority: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            period_size: PERIOD_SIZE_PRESET.0 as u32,
            periods: PERIODS_PRESET.0 as u32,
            sample_format: SampleFormat::default(),
            sample_rate: DEFAULT_SAMPLE_RATE as u32,
            realtime_priority: DEFAULT_REALTIME_PRIORITY as u8,
        }
    }
}

impl DriverConfig {
    /// Read the common driver settings
    ///
    /// Fails if a setting is missing (settings were never registered) or if
    /// `sample-format` holds a value that is not one of its options.
    pub fn from_settings(settings: &Settings) -> AudioResult<Self> {
        let format = settings.get_str(SAMPLE_FORMAT)?;
        let sample_format = format
            .parse::<SampleFormat>()
            .map_err(AudioError::UnsupportedFormat)?;

        // Registered bounds keep every value well inside the target types
        Ok(Self {
            period_size: settings.get_int(PERIOD_SIZE)? as u32,
            periods: settings.get_int(PERIODS)? as u32,
            sample_format,
            sample_rate: settings.get_int(SAMPLE_RATE)? as u32,
            realtime_priority: settings.get_int(REALTIME_PRIORITY)? as u8,
        })
    }

    /// Latency of one period in milliseconds
    pub fn period_latency_ms(&self) -> f32 {
        (self.period_size as f32 / self.sample_rate as f32) * 1000.0
    }

    /// Latency of the whole device buffer in milliseconds
    pub fn latency_ms(&self) -> f32 {
        self.period_latency_ms() * self.periods as f32
    }
}
