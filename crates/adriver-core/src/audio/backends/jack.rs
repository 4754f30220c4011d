//! Native JACK backend for Linux
//!
//! Registers a client with two output ports (`left`, `right`) and renders
//! on JACK's process thread. Sample rate and buffer size come from the JACK
//! server; `period-size` and `sample-rate` do not apply here.
//!
//! Settings:
//! - `jack.id`: client name (JACK may rename it if taken)
//! - `jack.autoconnect`: connect the outputs to the first two physical
//!   playback ports after activation (0 or 1)

use std::any::Any;

use jack::{AudioOut, Client, ClientOptions, Control, Port, PortFlags, ProcessScope};

use crate::audio::definition::{downcast_driver, DriverInstance};
use crate::audio::error::{AudioError, AudioResult};
use crate::audio::render::{AudioFunc, RenderSource, SynthHandle};
use crate::settings::{Settings, SettingsResult};
use crate::types::{StereoSample, MAX_BUFFER_SIZE};

/// Client name setting
pub const JACK_ID: &str = "jack.id";
/// Auto-connect setting
pub const JACK_AUTOCONNECT: &str = "jack.autoconnect";

const DEFAULT_CLIENT_NAME: &str = "adriver";

/// JACK output port names
const LEFT: &str = "left";
const RIGHT: &str = "right";

/// Active JACK client
///
/// Keeps the client running. Handed back to [`delete_jack_driver`] to
/// deactivate.
pub struct JackDriver {
    async_client: jack::AsyncClient<JackNotifications, JackProcessor>,
    sample_rate: u32,
    buffer_size: u32,
}

impl DriverInstance for JackDriver {
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

/// JACK process handler
///
/// Renders into a pre-allocated buffer, then splits it onto the two ports.
struct JackProcessor {
    left: Port<AudioOut>,
    right: Port<AudioOut>,
    source: RenderSource,
    buffer: Vec<StereoSample>,
}

impl jack::ProcessHandler for JackProcessor {
    fn process(&mut self, _client: &Client, ps: &ProcessScope) -> Control {
        let left_out = self.left.as_mut_slice(ps);
        let right_out = self.right.as_mut_slice(ps);

        for (left, right) in left_out
            .chunks_mut(MAX_BUFFER_SIZE)
            .zip(right_out.chunks_mut(MAX_BUFFER_SIZE))
        {
            let rendered = &mut self.buffer[..left.len()];
            self.source.render(rendered);
            split_stereo(rendered, left, right);
        }

        Control::Continue
    }
}

/// JACK notification handler
struct JackNotifications;

impl jack::NotificationHandler for JackNotifications {
    fn sample_rate(&mut self, _client: &Client, srate: jack::Frames) -> Control {
        log::info!("JACK sample rate changed to: {}", srate);
        Control::Continue
    }

    fn xrun(&mut self, _client: &Client) -> Control {
        log::warn!("JACK xrun detected");
        Control::Continue
    }
}

fn split_stereo(samples: &[StereoSample], left: &mut [f32], right: &mut [f32]) {
    for ((sample, l), r) in samples.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = sample.left;
        *r = sample.right;
    }
}

pub fn jack_driver_settings(settings: &mut Settings) -> SettingsResult<()> {
    settings.register_str(JACK_ID, DEFAULT_CLIENT_NAME)?;
    settings.register_int(JACK_AUTOCONNECT, 0, 0, 1)
}

pub fn new_jack_driver(settings: &Settings, synth: SynthHandle) -> AudioResult<Box<dyn DriverInstance>> {
    start(settings, RenderSource::Synth(synth))
}

pub fn new_jack_driver_with_callback(
    settings: &Settings,
    func: AudioFunc,
) -> AudioResult<Box<dyn DriverInstance>> {
    start(settings, RenderSource::Callback(func))
}

pub fn delete_jack_driver(driver: Box<dyn DriverInstance>) {
    let Some(driver) = downcast_driver::<JackDriver>("jack", driver) else {
        return;
    };

    match driver.async_client.deactivate() {
        Ok((client, _, _)) => log::info!("JACK client '{}' deactivated", client.name()),
        Err(e) => log::warn!("Failed to deactivate JACK client: {}", e),
    }
}

/// Create the client, register ports and start processing
fn start(settings: &Settings, source: RenderSource) -> AudioResult<Box<dyn DriverInstance>> {
    let client_name = settings.get_str(JACK_ID)?;
    let autoconnect = settings.get_int(JACK_AUTOCONNECT)? != 0;

    let (client, _status) = Client::new(client_name, ClientOptions::NO_START_SERVER)
        .map_err(|e| AudioError::ConfigError(format!("Failed to create JACK client: {}", e)))?;
    let actual_client_name = client.name().to_string();

    let sample_rate = client.sample_rate() as u32;
    let buffer_size = client.buffer_size();

    log::info!(
        "JACK client '{}' created (sample rate: {}Hz, buffer: {} frames, latency: {:.1}ms)",
        actual_client_name,
        sample_rate,
        buffer_size,
        (buffer_size as f32 / sample_rate as f32) * 1000.0
    );

    let left = client
        .register_port(LEFT, AudioOut::default())
        .map_err(|e| AudioError::ConfigError(format!("Failed to register port: {}", e)))?;
    let right = client
        .register_port(RIGHT, AudioOut::default())
        .map_err(|e| AudioError::ConfigError(format!("Failed to register port: {}", e)))?;

    let processor = JackProcessor {
        left,
        right,
        source,
        buffer: vec![StereoSample::silence(); MAX_BUFFER_SIZE],
    };

    let async_client = client
        .activate_async(JackNotifications, processor)
        .map_err(|e| AudioError::ConfigError(format!("Failed to activate JACK client: {}", e)))?;

    log::info!("JACK client activated");

    if autoconnect {
        connect_physical_outputs(async_client.as_client(), &actual_client_name);
    }

    Ok(Box::new(JackDriver {
        async_client,
        sample_rate,
        buffer_size,
    }))
}

/// Connect our outputs to the first two physical playback ports
///
/// Failures are logged; the driver keeps running unconnected.
fn connect_physical_outputs(client: &Client, client_name: &str) {
    let playback = client.ports(None, None, PortFlags::IS_INPUT | PortFlags::IS_PHYSICAL);
    if playback.is_empty() {
        log::warn!("No physical JACK playback ports found for connection");
        return;
    }

    for (port, target) in [LEFT, RIGHT].iter().zip(playback.iter()) {
        let ours = format!("{}:{}", client_name, port);
        match client.connect_ports_by_name(&ours, target) {
            Ok(()) => log::info!("Connected {} to {}", ours, target),
            Err(e) => log::warn!("Could not connect {} to {}: {}", ours, target, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_stereo() {
        let samples = [StereoSample::new(0.1, 0.2), StereoSample::new(0.3, 0.4)];
        let mut left = [0.0; 2];
        let mut right = [0.0; 2];
        split_stereo(&samples, &mut left, &mut right);
        assert_eq!(left, [0.1, 0.3]);
        assert_eq!(right, [0.2, 0.4]);
    }

    #[test]
    fn test_settings() {
        let mut settings = Settings::new();
        jack_driver_settings(&mut settings).unwrap();
        assert_eq!(settings.get_str(JACK_ID).unwrap(), "adriver");
        assert_eq!(settings.int_range(JACK_AUTOCONNECT).unwrap(), (0, 0, 1));
    }
}
