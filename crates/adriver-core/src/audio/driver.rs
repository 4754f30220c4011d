//! Handle to the active audio driver
//!
//! Keeps the backend running. Drop this (or pass it to
//! [`delete_audio_driver`]) to stop audio; the instance is handed back to the
//! `delete` of the definition that created it, exactly once.

use std::fmt;

use super::definition::{DriverDefinition, DriverInstance};

/// A running audio driver
///
/// Of all audio-producing objects in a session the driver should be the last
/// one created and the first one dropped: rendering starts as soon as it
/// exists and may call into the synth or callback until it is gone.
pub struct AudioDriver {
    instance: Option<Box<dyn DriverInstance>>,
    definition: &'static DriverDefinition,
}

impl AudioDriver {
    pub(crate) fn new(instance: Box<dyn DriverInstance>, definition: &'static DriverDefinition) -> Self {
        Self {
            instance: Some(instance),
            definition,
        }
    }

    /// Name of the backend that is running
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    /// Get the sample rate of the audio system
    pub fn sample_rate(&self) -> u32 {
        self.instance.as_ref().map_or(0, |i| i.sample_rate())
    }

    /// Get the actual buffer size in frames
    pub fn buffer_size(&self) -> u32 {
        self.instance.as_ref().map_or(0, |i| i.buffer_size())
    }

    /// Get the audio latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        self.instance.as_ref().map_or(0.0, |i| i.latency_ms())
    }
}

impl Drop for AudioDriver {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            log::debug!("Deleting '{}' audio driver", self.definition.name);
            (self.definition.delete)(instance);
        }
    }
}

impl fmt::Debug for AudioDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioDriver")
            .field("name", &self.name())
            .field("sample_rate", &self.sample_rate())
            .field("buffer_size", &self.buffer_size())
            .finish()
    }
}

/// Shut down an audio driver
///
/// `None` is accepted and does nothing.
pub fn delete_audio_driver(driver: Option<AudioDriver>) {
    drop(driver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backends::mock::{self, MockDriver, FAIL_OK_OK};

    fn driver_for(index: usize) -> AudioDriver {
        let def = &FAIL_OK_OK[index];
        AudioDriver::new(Box::new(MockDriver::named(def.name)), def)
    }

    #[test]
    fn test_delete_dispatches_once() {
        let driver = driver_for(1);
        assert_eq!(driver.name(), "b");
        delete_audio_driver(Some(driver));
        assert_eq!(mock::deleted(), vec!["b"]);
    }

    #[test]
    fn test_drop_dispatches_once() {
        {
            let _driver = driver_for(2);
        }
        assert_eq!(mock::deleted(), vec!["c"]);
    }

    #[test]
    fn test_delete_none_is_noop() {
        delete_audio_driver(None);
        assert!(mock::deleted().is_empty());
    }

    #[test]
    fn test_introspection() {
        let driver = driver_for(0);
        assert_eq!(driver.sample_rate(), 48000);
        assert_eq!(driver.buffer_size(), 480);
        assert!((driver.latency_ms() - 10.0).abs() < 1e-3);
    }
}
