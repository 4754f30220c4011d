//! CPAL output backends
//!
//! One catalog entry per native host (ALSA, CoreAudio, WASAPI), all sharing
//! the stream code below. The device is picked by the `<host>.device`
//! setting; `"default"` means the host's default output device.
//!
//! The stream callback renders into a pre-allocated scratch buffer and then
//! interleaves it into the device buffer as f32 or i16, depending on
//! `sample-format`.

use std::any::Any;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    BufferSize, FromSample, HostId, Sample, SizedSample, Stream, StreamConfig,
    SupportedBufferSize, SupportedStreamConfig,
};

use crate::audio::config::DriverConfig;
use crate::audio::definition::{downcast_driver, DriverInstance};
use crate::audio::error::{AudioError, AudioResult};
use crate::audio::render::{AudioFunc, RenderSource, SynthHandle};
use crate::settings::{Settings, SettingsResult};
use crate::types::{SampleFormat, StereoSample, MAX_BUFFER_SIZE};

/// Value of `<host>.device` that selects the host's default output
const DEFAULT_DEVICE: &str = "default";

/// CPAL output stream
///
/// Keeps the stream alive. Handed back to [`delete_cpal_driver`] to stop.
pub struct CpalDriver {
    stream: Stream,
    host: &'static str,
    sample_rate: u32,
    buffer_size: u32,
}

impl DriverInstance for CpalDriver {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

pub fn delete_cpal_driver(driver: Box<dyn DriverInstance>) {
    let Some(driver) = downcast_driver::<CpalDriver>("cpal", driver) else {
        return;
    };

    if let Err(e) = driver.stream.pause() {
        log::warn!("Failed to pause {} stream: {}", driver.host, e);
    }
    log::info!("{} audio stream stopped", driver.host);
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd"
))]
mod alsa {
    use super::*;

    pub fn new_alsa_driver(settings: &Settings, synth: SynthHandle) -> AudioResult<Box<dyn DriverInstance>> {
        start(HostId::Alsa, "alsa", settings, RenderSource::Synth(synth))
    }

    pub fn new_alsa_driver_with_callback(
        settings: &Settings,
        func: AudioFunc,
    ) -> AudioResult<Box<dyn DriverInstance>> {
        start(HostId::Alsa, "alsa", settings, RenderSource::Callback(func))
    }

    pub fn alsa_driver_settings(settings: &mut Settings) -> SettingsResult<()> {
        register_device_setting(settings, "alsa")
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd"
))]
pub use alsa::*;

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod coreaudio {
    use super::*;

    pub fn new_coreaudio_driver(
        settings: &Settings,
        synth: SynthHandle,
    ) -> AudioResult<Box<dyn DriverInstance>> {
        start(HostId::CoreAudio, "coreaudio", settings, RenderSource::Synth(synth))
    }

    pub fn new_coreaudio_driver_with_callback(
        settings: &Settings,
        func: AudioFunc,
    ) -> AudioResult<Box<dyn DriverInstance>> {
        start(HostId::CoreAudio, "coreaudio", settings, RenderSource::Callback(func))
    }

    pub fn coreaudio_driver_settings(settings: &mut Settings) -> SettingsResult<()> {
        register_device_setting(settings, "coreaudio")
    }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub use coreaudio::*;

#[cfg(target_os = "windows")]
mod wasapi {
    use super::*;

    pub fn new_wasapi_driver(settings: &Settings, synth: SynthHandle) -> AudioResult<Box<dyn DriverInstance>> {
        start(HostId::Wasapi, "wasapi", settings, RenderSource::Synth(synth))
    }

    pub fn new_wasapi_driver_with_callback(
        settings: &Settings,
        func: AudioFunc,
    ) -> AudioResult<Box<dyn DriverInstance>> {
        start(HostId::Wasapi, "wasapi", settings, RenderSource::Callback(func))
    }

    pub fn wasapi_driver_settings(settings: &mut Settings) -> SettingsResult<()> {
        register_device_setting(settings, "wasapi")
    }
}

#[cfg(target_os = "windows")]
pub use wasapi::*;

fn device_setting(host: &str) -> String {
    format!("{}.device", host)
}

fn register_device_setting(settings: &mut Settings, host: &str) -> SettingsResult<()> {
    settings.register_str(&device_setting(host), DEFAULT_DEVICE)
}

/// Open the configured device on `host_id` and start a stream rendering from `source`
fn start(
    host_id: HostId,
    host: &'static str,
    settings: &Settings,
    source: RenderSource,
) -> AudioResult<Box<dyn DriverInstance>> {
    let config = DriverConfig::from_settings(settings)?;
    let device_name = settings.get_str(&device_setting(host))?;

    let cpal_host =
        cpal::host_from_id(host_id).map_err(|e| AudioError::HostUnavailable(e.to_string()))?;
    let device = find_device(&cpal_host, device_name)?;

    let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using {} audio device: {}", host, name);

    let supported = get_output_config(&device, &config)?;
    let buffer_size = clamp_buffer_size(supported.buffer_size(), config.period_size);
    let sample_rate = supported.sample_rate().0;

    let stream_config = StreamConfig {
        channels: supported.channels(),
        sample_rate: supported.sample_rate(),
        buffer_size: BufferSize::Fixed(buffer_size),
    };

    log::info!(
        "Audio config: {} channels, {}Hz, {}, {} frames (~{:.1}ms latency)",
        stream_config.channels,
        sample_rate,
        config.sample_format,
        buffer_size,
        (buffer_size as f32 / sample_rate as f32) * 1000.0
    );

    let stream = match config.sample_format {
        SampleFormat::Float32 => build_output_stream::<f32>(&device, &stream_config, host, source)?,
        SampleFormat::Int16 => build_output_stream::<i16>(&device, &stream_config, host, source)?,
    };
    stream
        .play()
        .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;

    Ok(Box::new(CpalDriver {
        stream,
        host,
        sample_rate,
        buffer_size,
    }))
}

fn find_device(host: &cpal::Host, name: &str) -> AudioResult<cpal::Device> {
    if name == DEFAULT_DEVICE {
        return host.default_output_device().ok_or(AudioError::NoDevices);
    }

    host.output_devices()
        .map_err(|e| AudioError::DeviceNotFound(e.to_string()))?
        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
        .ok_or_else(|| AudioError::DeviceNotFound(name.to_string()))
}

/// Pick an output configuration matching the requested format and rate
///
/// Stereo is preferred. If no configuration supports the requested rate the
/// device's default configuration is used, as long as its format matches.
fn get_output_config(device: &cpal::Device, config: &DriverConfig) -> AudioResult<SupportedStreamConfig> {
    let wanted = match config.sample_format {
        SampleFormat::Float32 => cpal::SampleFormat::F32,
        SampleFormat::Int16 => cpal::SampleFormat::I16,
    };

    let supported: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?
        .filter(|c| c.sample_format() == wanted && c.channels() > 0)
        .collect();

    if supported.is_empty() {
        return Err(AudioError::UnsupportedFormat(format!(
            "device has no {} output",
            config.sample_format
        )));
    }

    let rate = config.sample_rate;
    let in_range =
        |c: &&cpal::SupportedStreamConfigRange| rate >= c.min_sample_rate().0 && rate <= c.max_sample_rate().0;

    let best = supported
        .iter()
        .filter(|c| c.channels() >= 2)
        .find(in_range)
        .or_else(|| supported.iter().find(in_range));

    if let Some(best) = best {
        return Ok(best.clone().with_sample_rate(cpal::SampleRate(rate)));
    }

    let fallback = device
        .default_output_config()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?;
    if fallback.sample_format() != wanted || fallback.channels() == 0 {
        return Err(AudioError::ConfigError(format!(
            "device supports neither {}Hz nor {} at its default rate",
            rate, config.sample_format
        )));
    }

    log::warn!(
        "Audio device doesn't support {}Hz, falling back to {}Hz",
        rate,
        fallback.sample_rate().0
    );
    Ok(fallback)
}

fn clamp_buffer_size(range: &SupportedBufferSize, requested: u32) -> u32 {
    let requested = requested.min(MAX_BUFFER_SIZE as u32);
    match range {
        SupportedBufferSize::Range { min, max } => requested.clamp(*min, (*max).max(*min)),
        SupportedBufferSize::Unknown => requested,
    }
}

/// Build an output stream writing samples of type `T`
fn build_output_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    host: &'static str,
    source: RenderSource,
) -> AudioResult<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch = vec![StereoSample::silence(); MAX_BUFFER_SIZE];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
                // hosts may hand out more than MAX_BUFFER_SIZE frames at once
                for chunk in data.chunks_mut(channels * MAX_BUFFER_SIZE) {
                    let rendered = &mut scratch[..chunk.len() / channels];
                    source.render(rendered);
                    write_interleaved(chunk, channels, rendered);
                }
            },
            move |err| {
                log::error!("{} audio stream error: {}", host, err);
            },
            None, // No timeout (blocking)
        )
        .map_err(|e| AudioError::StreamBuildError(e.to_string()))
}

/// Interleave stereo frames into a device buffer, silencing extra channels
fn write_interleaved<T>(data: &mut [T], channels: usize, samples: &[StereoSample])
where
    T: Sample + FromSample<f32>,
{
    for (frame, sample) in data.chunks_mut(channels).zip(samples) {
        frame[0] = T::from_sample(sample.left);
        if channels > 1 {
            frame[1] = T::from_sample(sample.right);
        }
        for ch in frame.iter_mut().skip(2) {
            *ch = T::EQUILIBRIUM;
        }
    }
}
