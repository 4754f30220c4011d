//! adriver core - audio output backend selection and lifecycle
//!
//! Picks exactly one audio output backend out of a build-time catalog,
//! binds it either to a synth engine or to a render callback, and tears it
//! down through the descriptor that created it.

pub mod audio;
pub mod settings;
pub mod types;

pub use audio::{
    available_backends, delete_audio_driver, new_audio_driver, new_audio_driver_with_callback,
    register_backends, register_settings, AudioDriver, AudioFunc, Synth, SynthHandle,
};
pub use settings::{SettingValue, Settings, SettingsOverrides};
pub use types::*;
