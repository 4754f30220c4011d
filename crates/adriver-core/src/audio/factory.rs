//! Driver selection
//!
//! Walks the catalog in preference order and returns the first backend that
//! starts. In automatic mode every enabled entry is tried until one succeeds;
//! an explicitly requested backend is tried once and never replaced by
//! another. When nothing starts, the failure is classified so that a typo in
//! the backend name reads differently from a backend that could not start.

use thiserror::Error;

use crate::settings::{Settings, SettingsError};

use super::catalog::Catalog;
use super::config::{AUTO, SELECTED_BACKEND};
use super::definition::{DriverDefinition, DriverInstance};
use super::driver::AudioDriver;
use super::error::AudioError;
use super::mask::EnableMask;
use super::render::RenderSource;

/// Why a requested backend did not start
#[derive(Error, Debug)]
pub enum StartFailure {
    /// The backend is compiled in but excluded by the enablement mask
    #[error("driver is not registered for use")]
    Disabled,

    #[error("driver does not support callback mode")]
    CallbackUnsupported,

    #[error("driver does not support synth mode")]
    SynthUnsupported,

    #[error(transparent)]
    Failed(#[from] AudioError),
}

/// Driver selection failures
#[derive(Error, Debug)]
pub enum SelectError {
    /// Nothing compiled in, or every entry disabled
    #[error("No audio drivers available")]
    NoCandidates,

    /// Automatic mode tried every enabled backend and none started
    #[error("Couldn't auto-select an audio driver, tried {}", .tried.join(", "))]
    AutoExhausted { tried: Vec<String> },

    /// `selected-backend` names no compiled-in backend
    #[error("Invalid audio driver '{requested}', valid drivers are: {valid}")]
    InvalidName { requested: String, valid: String },

    /// The requested backend exists but did not start
    #[error("Couldn't start the requested audio driver '{requested}': {reason}")]
    StartFailed {
        requested: String,
        reason: StartFailure,
    },

    /// Driver settings were never registered in this store
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Select and start one backend from `catalog`
pub(crate) fn create_driver(
    catalog: &Catalog,
    mask: &EnableMask,
    settings: &Settings,
    source: RenderSource,
) -> Result<AudioDriver, SelectError> {
    let requested = settings.get_str(SELECTED_BACKEND)?;
    let auto_select = requested == AUTO;

    let mut tried = Vec::new();
    let mut last_failure = None;

    for (i, def) in catalog.iter().enumerate() {
        if !mask.is_enabled(i) {
            continue;
        }

        if !auto_select && def.name != requested {
            continue;
        }

        log::debug!("Trying '{}' audio driver ({} mode)", def.name, source.mode());
        tried.push(def.name.to_string());

        match start(def, settings, &source) {
            Ok(instance) => {
                log::info!(
                    "Using '{}' audio driver ({}Hz, {} frames)",
                    def.name,
                    instance.sample_rate(),
                    instance.buffer_size()
                );
                return Ok(AudioDriver::new(instance, def));
            }
            Err(reason) => {
                log::debug!("'{}' audio driver failed to start: {}", def.name, reason);
                last_failure = Some(reason);
            }
        }

        if !auto_select {
            break;
        }
    }

    let err = classify(mask, settings, requested, auto_select, tried, last_failure);
    log::error!("{}", err);
    Err(err)
}

/// Run the constructor matching the render source
fn start(
    def: &DriverDefinition,
    settings: &Settings,
    source: &RenderSource,
) -> Result<Box<dyn DriverInstance>, StartFailure> {
    match source {
        RenderSource::Synth(synth) => match def.new {
            Some(new) => Ok(new(settings, synth.clone())?),
            None => {
                log::debug!("'{}' audio driver does not support synth mode", def.name);
                Err(StartFailure::SynthUnsupported)
            }
        },
        RenderSource::Callback(func) => match def.new_with_callback {
            Some(new) => Ok(new(settings, func.clone())?),
            None => {
                log::debug!("'{}' audio driver does not support callback mode", def.name);
                Err(StartFailure::CallbackUnsupported)
            }
        },
    }
}

fn classify(
    mask: &EnableMask,
    settings: &Settings,
    requested: &str,
    auto_select: bool,
    tried: Vec<String>,
    last_failure: Option<StartFailure>,
) -> SelectError {
    if mask.enabled_count() == 0 {
        return SelectError::NoCandidates;
    }

    if auto_select {
        return SelectError::AutoExhausted { tried };
    }

    if settings.option_is_valid(SELECTED_BACKEND, requested) {
        // nothing attempted means the name is valid but masked out
        let reason = last_failure.unwrap_or(StartFailure::Disabled);
        SelectError::StartFailed {
            requested: requested.to_string(),
            reason,
        }
    } else {
        SelectError::InvalidName {
            requested: requested.to_string(),
            valid: settings
                .option_concat(SELECTED_BACKEND, None)
                .unwrap_or_default(),
        }
    }
}
