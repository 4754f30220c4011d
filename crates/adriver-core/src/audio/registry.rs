//! Driver registry and process-wide entry points
//!
//! A [`DriverRegistry`] owns a catalog and its enablement mask. Hosts that
//! want explicit dependency passing can build their own; the free functions
//! below operate on one lazily created registry over the built-in catalog.
//!
//! The mask is meant to be set once, early, before any driver exists.
//! Restricting it while a driver is starting or running is not supported.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::settings::{Settings, SettingsResult};

use super::catalog::{Catalog, DRIVERS};
use super::definition::DriverDefinition;
use super::driver::AudioDriver;
use super::factory::{create_driver, SelectError};
use super::mask::{EnableMask, MaskError};
use super::registrar::register_driver_settings;
use super::render::{AudioFunc, RenderSource, SynthHandle};

/// Catalog plus the set of entries the factory may try
#[derive(Debug, Clone)]
pub struct DriverRegistry {
    catalog: Catalog,
    mask: EnableMask,
}

impl DriverRegistry {
    /// Registry over `entries` with every entry enabled
    pub fn new(entries: &'static [DriverDefinition]) -> Self {
        let catalog = Catalog::new(entries);
        Self {
            mask: EnableMask::new(catalog.len()),
            catalog,
        }
    }

    /// Registry over the backends compiled into this build
    pub fn builtin() -> Self {
        Self::new(DRIVERS)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mask(&self) -> &EnableMask {
        &self.mask
    }

    /// Restrict future selection to `names`
    ///
    /// `None` or an empty list re-enables every compiled-in backend. An
    /// unknown name fails and leaves the current mask as it was.
    pub fn register_backends<S: AsRef<str>>(&mut self, names: Option<&[S]>) -> Result<(), MaskError> {
        match names {
            Some(names) if !names.is_empty() => {
                self.mask.set_enabled_set(&self.catalog, names)?;
                log::debug!(
                    "Enabled audio drivers: {}",
                    self.enabled_names().collect::<Vec<_>>().join(", ")
                );
            }
            _ => {
                self.mask.enable_all();
                log::debug!("Enabled all audio drivers");
            }
        }
        Ok(())
    }

    /// Register the driver settings into `settings`
    pub fn register_settings(&self, settings: &mut Settings) -> SettingsResult<()> {
        register_driver_settings(settings, &self.catalog, &self.mask)
    }

    /// Start a driver that pulls audio from `synth`
    pub fn new_driver(&self, settings: &Settings, synth: SynthHandle) -> Result<AudioDriver, SelectError> {
        create_driver(&self.catalog, &self.mask, settings, RenderSource::Synth(synth))
    }

    /// Start a driver that calls `func` for every period
    pub fn new_driver_with_callback(
        &self,
        settings: &Settings,
        func: AudioFunc,
    ) -> Result<AudioDriver, SelectError> {
        create_driver(&self.catalog, &self.mask, settings, RenderSource::Callback(func))
    }

    /// Backend names in preference order with their enabled state
    pub fn backends(&self) -> Vec<(&'static str, bool)> {
        self.catalog
            .names()
            .enumerate()
            .map(|(i, name)| (name, self.mask.is_enabled(i)))
            .collect()
    }

    fn enabled_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.catalog
            .names()
            .enumerate()
            .filter(|(i, _)| self.mask.is_enabled(*i))
            .map(|(_, name)| name)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static REGISTRY: Lazy<RwLock<DriverRegistry>> = Lazy::new(|| RwLock::new(DriverRegistry::builtin()));

fn read() -> RwLockReadGuard<'static, DriverRegistry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, DriverRegistry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Restrict the built-in backends available to [`new_audio_driver`]
///
/// Call this once at startup, before any driver is created. `None` or an
/// empty list enables every compiled-in backend again.
pub fn register_backends<S: AsRef<str>>(names: Option<&[S]>) -> Result<(), MaskError> {
    write().register_backends(names)
}

/// Register the audio driver settings into `settings`
pub fn register_settings(settings: &mut Settings) -> SettingsResult<()> {
    read().register_settings(settings)
}

/// Create a driver bound to the synth engine
///
/// Which backend is used is decided by the `selected-backend` setting.
pub fn new_audio_driver(settings: &Settings, synth: SynthHandle) -> Result<AudioDriver, SelectError> {
    read().new_driver(settings, synth)
}

/// Create a driver that renders through `func`
pub fn new_audio_driver_with_callback(
    settings: &Settings,
    func: AudioFunc,
) -> Result<AudioDriver, SelectError> {
    read().new_driver_with_callback(settings, func)
}

/// Compiled-in backend names in preference order, with enabled state
pub fn available_backends() -> Vec<(&'static str, bool)> {
    read().backends()
}
