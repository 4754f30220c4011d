//! Build-time catalog of audio backends
//!
//! The order of [`DRIVERS`] is the preference order used by automatic
//! selection. Which entries exist depends on the target platform and the
//! enabled cargo features; nothing here changes at runtime.

use super::backends;
use super::definition::DriverDefinition;

/// Available audio drivers, listed in order of preference
pub static DRIVERS: &[DriverDefinition] = &[
    #[cfg(all(target_os = "linux", feature = "jack-backend"))]
    DriverDefinition {
        name: "jack",
        new: Some(backends::jack::new_jack_driver),
        new_with_callback: Some(backends::jack::new_jack_driver_with_callback),
        delete: backends::jack::delete_jack_driver,
        settings: Some(backends::jack::jack_driver_settings),
    },
    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd"
    ))]
    DriverDefinition {
        name: "alsa",
        new: Some(backends::cpal::new_alsa_driver),
        new_with_callback: Some(backends::cpal::new_alsa_driver_with_callback),
        delete: backends::cpal::delete_cpal_driver,
        settings: Some(backends::cpal::alsa_driver_settings),
    },
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    DriverDefinition {
        name: "coreaudio",
        new: Some(backends::cpal::new_coreaudio_driver),
        new_with_callback: Some(backends::cpal::new_coreaudio_driver_with_callback),
        delete: backends::cpal::delete_cpal_driver,
        settings: Some(backends::cpal::coreaudio_driver_settings),
    },
    #[cfg(target_os = "windows")]
    DriverDefinition {
        name: "wasapi",
        new: Some(backends::cpal::new_wasapi_driver),
        new_with_callback: Some(backends::cpal::new_wasapi_driver_with_callback),
        delete: backends::cpal::delete_cpal_driver,
        settings: Some(backends::cpal::wasapi_driver_settings),
    },
    #[cfg(feature = "file-backend")]
    DriverDefinition {
        name: "file",
        new: Some(backends::file::new_file_driver),
        new_with_callback: None,
        delete: backends::file::delete_file_driver,
        settings: Some(backends::file::file_driver_settings),
    },
];

/// Ordered, immutable view over a static list of backend definitions
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    entries: &'static [DriverDefinition],
}

impl Catalog {
    pub const fn new(entries: &'static [DriverDefinition]) -> Self {
        Self { entries }
    }

    /// The backends compiled into this build
    pub const fn builtin() -> Self {
        Self::new(DRIVERS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in preference order
    pub fn iter(&self) -> impl Iterator<Item = &'static DriverDefinition> {
        self.entries.iter()
    }

    /// Backend names in preference order
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|d| d.name)
    }

    pub fn get(&self, index: usize) -> Option<&'static DriverDefinition> {
        self.entries.get(index)
    }

    /// Index of the first entry with exactly this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|d| d.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&'static DriverDefinition> {
        self.position(name).map(|i| &self.entries[i])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
