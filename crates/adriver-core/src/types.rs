//! Common sample types
//!
//! Every backend renders into interleaved stereo frames; these are the types
//! the render path (synth or user callback) writes into.

use std::fmt;
use std::str::FromStr;

/// Audio sample type (32-bit float for rendering, converted per backend on output)
pub type Sample = f32;

/// Maximum frames rendered in one go; larger device buffers are rendered in chunks
pub const MAX_BUFFER_SIZE: usize = 8192;

/// A single stereo sample (left and right channels)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoSample {
    pub left: Sample,
    pub right: Sample,
}

impl StereoSample {
    /// Create a new stereo sample
    #[inline]
    pub fn new(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }

    /// Create a silent stereo sample
    #[inline]
    pub fn silence() -> Self {
        Self::default()
    }

    /// Create a mono sample (same value in both channels)
    #[inline]
    pub fn mono(value: Sample) -> Self {
        Self {
            left: value,
            right: value,
        }
    }
}

/// Sample format written to the device or file
///
/// The string forms are the allowed values of the `sample-format` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// Signed 16-bit integer samples
    #[default]
    Int16,
    /// 32-bit float samples
    Float32,
}

impl SampleFormat {
    /// All formats, in the order they are offered as options
    pub const ALL: [SampleFormat; 2] = [SampleFormat::Int16, SampleFormat::Float32];

    /// Setting value for this format
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleFormat::Int16 => "16bits",
            SampleFormat::Float32 => "float",
        }
    }

    /// Bits per sample
    pub fn bits(&self) -> u16 {
        match self {
            SampleFormat::Int16 => 16,
            SampleFormat::Float32 => 32,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SampleFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown sample format '{}'", s))
    }
}
