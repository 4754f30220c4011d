//! adriver - play a test tone through the selected audio backend
//!
//! This is the host side of the driver subsystem. It:
//! 1. Loads the YAML config and restricts the backend set
//! 2. Registers the driver settings and applies overrides
//! 3. Starts a driver bound to a sine synth (or a render callback)
//! 4. Plays for the configured duration and tears the driver down
//!
//! ## Command line flags
//!
//! - `--config <path>`: config file (default ~/.config/adriver/config.yaml)
//! - `--backend <name>`: override `selected-backend`
//! - `--callback`: render through a callback instead of the synth engine
//! - `--list`: print the compiled-in backends and exit
//! - `--init-config`: write a default config file and exit

mod config;
mod synth;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use adriver_core::audio::{SAMPLE_RATE, SELECTED_BACKEND};
use adriver_core::{
    available_backends, delete_audio_driver, new_audio_driver, new_audio_driver_with_callback,
    register_backends, register_settings, AudioFunc, Settings, StereoSample, Synth, SynthHandle,
};

use config::PlayConfig;
use synth::SineSynth;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config_path: Option<PathBuf>,
    backend: Option<String>,
    callback: bool,
    list: bool,
    init_config: bool,
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            "--backend" => {
                parsed.backend = Some(args.next().context("--backend needs a name")?);
            }
            "--callback" => parsed.callback = true,
            "--list" => parsed.list = true,
            "--init-config" => parsed.init_config = true,
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok(parsed)
}

fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(config::default_config_path);

    if args.init_config {
        config::save_config(&PlayConfig::default(), &config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let play = config::load_config(&config_path);

    register_backends(play.backends.as_deref()).context("Invalid backend list in config")?;

    if args.list {
        for (name, enabled) in available_backends() {
            println!("{:<10} {}", name, if enabled { "enabled" } else { "disabled" });
        }
        return Ok(());
    }

    let mut settings = Settings::new();
    register_settings(&mut settings).context("Failed to register driver settings")?;
    settings
        .apply(&play.settings)
        .context("Invalid setting override in config")?;
    if let Some(backend) = &args.backend {
        settings.set_str(SELECTED_BACKEND, backend)?;
    }

    let sample_rate = settings.get_int(SAMPLE_RATE)? as u32;
    let sine = Arc::new(Mutex::new(SineSynth::new(
        play.tone.frequency,
        play.tone.amplitude,
        sample_rate,
    )));

    let driver = if args.callback {
        let sine = sine.clone();
        let func = AudioFunc::new(move |out: &mut [StereoSample]| {
            sine.lock().unwrap_or_else(PoisonError::into_inner).render(out);
        });
        new_audio_driver_with_callback(&settings, func)
    } else {
        new_audio_driver(&settings, SynthHandle::from_shared(sine.clone()))
    }
    .context("No audio driver could be started")?;

    // the device may run at another rate than requested
    sine.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .set_sample_rate(driver.sample_rate());

    let duration = Duration::try_from_secs_f64(play.duration_secs.max(0.0))
        .context("Invalid duration_secs in config")?;

    log::info!(
        "Playing {}Hz through '{}' ({}Hz, {} frames, {:.1}ms latency) for {:.1}s",
        play.tone.frequency,
        driver.name(),
        driver.sample_rate(),
        driver.buffer_size(),
        driver.latency_ms(),
        duration.as_secs_f64()
    );

    std::thread::sleep(duration);
    delete_audio_driver(Some(driver));

    log::info!("adriver done");
    Ok(())
}
