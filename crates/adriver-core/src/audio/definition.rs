//! Backend descriptors
//!
//! Every backend compiled into the catalog is described by one
//! [`DriverDefinition`]: its name plus plain function pointers for the two
//! constructors, the destructor and the optional settings hook. A running
//! backend is a boxed [`DriverInstance`].

use std::any::Any;
use std::fmt;

use crate::settings::{Settings, SettingsResult};

use super::error::AudioResult;
use super::render::{AudioFunc, SynthHandle};

/// A live backend instance
///
/// Audio is flowing from the moment the constructor returns until the
/// instance is handed back to its definition's `delete`. Instances need not
/// be `Send`: some hosts tie their streams to the creating thread.
pub trait DriverInstance: 'static {
    /// Sample rate the device actually runs at
    fn sample_rate(&self) -> u32;

    /// Actual buffer size in frames
    fn buffer_size(&self) -> u32;

    /// Audio latency in milliseconds
    fn latency_ms(&self) -> f32 {
        (self.buffer_size() as f32 / self.sample_rate() as f32) * 1000.0
    }

    /// Recover the concrete type inside the backend's own `delete`
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Start a backend that pulls from a synth engine
pub type NewSynthDriverFn = fn(&Settings, SynthHandle) -> AudioResult<Box<dyn DriverInstance>>;
/// Start a backend that calls a user render function
pub type NewCallbackDriverFn = fn(&Settings, AudioFunc) -> AudioResult<Box<dyn DriverInstance>>;
/// Stop a backend and release its resources
pub type DeleteDriverFn = fn(Box<dyn DriverInstance>);
/// Register backend specific settings
pub type DriverSettingsFn = fn(&mut Settings) -> SettingsResult<()>;

/// Immutable description of one catalog entry
pub struct DriverDefinition {
    /// Unique name, also the value of the `selected-backend` setting
    pub name: &'static str,
    /// Synth-bound constructor
    pub new: Option<NewSynthDriverFn>,
    /// Callback-bound constructor (`None` if the backend has no callback mode)
    pub new_with_callback: Option<NewCallbackDriverFn>,
    pub delete: DeleteDriverFn,
    pub settings: Option<DriverSettingsFn>,
}

impl fmt::Debug for DriverDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverDefinition")
            .field("name", &self.name)
            .field("synth_mode", &self.new.is_some())
            .field("callback_mode", &self.new_with_callback.is_some())
            .field("settings", &self.settings.is_some())
            .finish()
    }
}

/// Downcast a driver inside its own `delete`
///
/// Returns `None` (and logs) if the instance was produced by another backend,
/// which can only happen if a catalog pairs a constructor with the wrong
/// destructor.
pub(crate) fn downcast_driver<T: DriverInstance>(
    backend: &str,
    driver: Box<dyn DriverInstance>,
) -> Option<Box<T>> {
    match driver.into_any().downcast::<T>() {
        Ok(driver) => Some(driver),
        Err(_) => {
            log::error!("'{}' audio driver asked to delete a foreign instance", backend);
            None
        }
    }
}
