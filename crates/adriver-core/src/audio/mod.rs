//! Audio driver subsystem
//!
//! Picks one output backend out of a preference-ordered, build-time catalog:
//! - **Linux**: native JACK (with the `jack-backend` feature), then ALSA
//! - **macOS/iOS**: CoreAudio
//! - **Windows**: WASAPI
//! - **Everywhere**: a WAV file writer (with the `file-backend` feature)
//!
//! Selection is driven entirely by the `selected-backend` setting. `"auto"`
//! tries every enabled backend in catalog order and keeps the first one that
//! starts; a backend name tries only that backend.
//!
//! # Example Usage
//!
//! ```ignore
//! use adriver_core::audio::{new_audio_driver, register_backends, register_settings};
//! use adriver_core::Settings;
//!
//! // Optional, once at startup: only consider these backends
//! register_backends(Some(&["jack", "file"][..]))?;
//!
//! let mut settings = Settings::new();
//! register_settings(&mut settings)?;
//! settings.set_str("selected-backend", "auto")?;
//!
//! let driver = new_audio_driver(&settings, synth)?;
//! println!("{} at {}Hz", driver.name(), driver.sample_rate());
//!
//! // Dropping the driver stops audio
//! drop(driver);
//! ```

mod backends;
mod catalog;
mod config;
mod definition;
mod driver;
mod error;
mod factory;
mod mask;
mod registrar;
mod registry;
mod render;

pub use catalog::{Catalog, DRIVERS};
pub use config::{
    DriverConfig, AUTO, DEFAULT_REALTIME_PRIORITY, DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE,
    MIN_SAMPLE_RATE, PERIODS, PERIODS_PRESET, PERIOD_SIZE, PERIOD_SIZE_PRESET, REALTIME_PRIORITY,
    SAMPLE_FORMAT, SAMPLE_RATE, SELECTED_BACKEND,
};
pub use definition::{
    DeleteDriverFn, DriverDefinition, DriverInstance, DriverSettingsFn, NewCallbackDriverFn,
    NewSynthDriverFn,
};
pub use driver::{delete_audio_driver, AudioDriver};
pub use error::{AudioError, AudioResult};
pub use factory::{SelectError, StartFailure};
pub use mask::{EnableMask, MaskError};
pub use registrar::{register_common_settings, register_driver_settings};
pub use registry::{
    available_backends, new_audio_driver, new_audio_driver_with_callback, register_backends,
    register_settings, DriverRegistry,
};
pub use render::{AudioFunc, RenderSource, Synth, SynthHandle};
