//! WAV file backend
//!
//! Renders the synth into a stereo WAV file on a dedicated thread, one
//! period at a time, paced to real time. Useful for headless runs and
//! tests. There is no callback mode.
//!
//! Settings: `file.name` (output path). `sample-format` picks 16-bit
//! integer or 32-bit float samples.

use std::any::Any;
use std::fs::File;
use std::io::BufWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hound::{WavSpec, WavWriter};

use crate::audio::config::DriverConfig;
use crate::audio::definition::{downcast_driver, DriverInstance};
use crate::audio::error::{AudioError, AudioResult};
use crate::audio::render::SynthHandle;
use crate::settings::{Settings, SettingsResult};
use crate::types::{SampleFormat, StereoSample, MAX_BUFFER_SIZE};

/// Output path setting
pub const FILE_NAME: &str = "file.name";

const DEFAULT_FILE_NAME: &str = "adriver.wav";

type Writer = WavWriter<BufWriter<File>>;

/// Running file renderer
pub struct FileDriver {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<AudioResult<u64>>>,
    sample_rate: u32,
    buffer_size: u32,
    periods: u32,
}

impl DriverInstance for FileDriver {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    fn latency_ms(&self) -> f32 {
        (self.buffer_size as f32 * self.periods as f32 / self.sample_rate as f32) * 1000.0
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl FileDriver {
    /// Stop the render thread and finalize the file
    ///
    /// Returns the number of frames written.
    fn stop(&mut self) -> AudioResult<u64> {
        self.running.store(false, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| AudioError::FileError("render thread panicked".to_string()))?,
            None => Ok(0),
        }
    }
}

pub fn file_driver_settings(settings: &mut Settings) -> SettingsResult<()> {
    settings.register_str(FILE_NAME, DEFAULT_FILE_NAME)
}

pub fn new_file_driver(settings: &Settings, synth: SynthHandle) -> AudioResult<Box<dyn DriverInstance>> {
    let config = DriverConfig::from_settings(settings)?;
    let path = settings.get_str(FILE_NAME)?;

    let writer = WavWriter::create(path, wav_spec(&config))
        .map_err(|e| AudioError::FileError(format!("{}: {}", path, e)))?;

    let period_size = (config.period_size as usize).min(MAX_BUFFER_SIZE);
    let running = Arc::new(AtomicBool::new(true));

    let thread = {
        let running = running.clone();
        thread::Builder::new()
            .name("adriver-file".to_string())
            .spawn(move || render_loop(writer, synth, config, period_size, &running))
            .map_err(|e| AudioError::FileError(format!("failed to spawn render thread: {}", e)))?
    };

    log::info!(
        "Writing {} audio to '{}' ({}Hz, {} frames per period)",
        config.sample_format,
        path,
        config.sample_rate,
        period_size
    );

    Ok(Box::new(FileDriver {
        running,
        thread: Some(thread),
        sample_rate: config.sample_rate,
        buffer_size: period_size as u32,
        periods: config.periods,
    }))
}

pub fn delete_file_driver(driver: Box<dyn DriverInstance>) {
    let Some(mut driver) = downcast_driver::<FileDriver>("file", driver) else {
        return;
    };

    match driver.stop() {
        Ok(frames) => log::info!("File audio driver stopped after {} frames", frames),
        Err(e) => log::error!("File audio driver failed: {}", e),
    }
}

fn wav_spec(config: &DriverConfig) -> WavSpec {
    let sample_format = match config.sample_format {
        SampleFormat::Int16 => hound::SampleFormat::Int,
        SampleFormat::Float32 => hound::SampleFormat::Float,
    };

    WavSpec {
        channels: 2,
        sample_rate: config.sample_rate,
        bits_per_sample: config.sample_format.bits(),
        sample_format,
    }
}

/// Render periods until `running` is cleared, then finalize
fn render_loop(
    mut writer: Writer,
    synth: SynthHandle,
    config: DriverConfig,
    period_size: usize,
    running: &AtomicBool,
) -> AudioResult<u64> {
    let mut buffer = vec![StereoSample::silence(); period_size];
    let started = Instant::now();
    let mut frames: u64 = 0;

    while running.load(Ordering::Acquire) {
        synth.render(&mut buffer);
        write_period(&mut writer, config.sample_format, &buffer)?;
        frames += period_size as u64;

        // pace against the start time so sleep jitter does not accumulate
        let deadline = started + frames_duration(frames, config.sample_rate);
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    writer
        .finalize()
        .map_err(|e| AudioError::FileError(e.to_string()))?;
    Ok(frames)
}

fn write_period(writer: &mut Writer, format: SampleFormat, samples: &[StereoSample]) -> AudioResult<()> {
    let result = match format {
        SampleFormat::Int16 => samples.iter().try_for_each(|s| {
            writer.write_sample(to_i16(s.left))?;
            writer.write_sample(to_i16(s.right))
        }),
        SampleFormat::Float32 => samples.iter().try_for_each(|s| {
            writer.write_sample(s.left)?;
            writer.write_sample(s.right)
        }),
    };
    result.map_err(|e| AudioError::FileError(e.to_string()))
}

/// Play time of `frames` at `sample_rate`
fn frames_duration(frames: u64, sample_rate: u32) -> Duration {
    Duration::from_secs_f64(frames as f64 / sample_rate.max(1) as f64)
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::config::{PERIOD_SIZE, SAMPLE_FORMAT, SAMPLE_RATE};
    use crate::audio::registrar::register_common_settings;
    use crate::audio::render::Synth;

    struct Constant(f32, f32);

    impl Synth for Constant {
        fn render(&mut self, out: &mut [StereoSample]) {
            out.fill(StereoSample::new(self.0, self.1));
        }
    }

    fn settings_for(path: &std::path::Path, format: &str) -> Settings {
        let mut settings = Settings::new();
        register_common_settings(&mut settings).unwrap();
        file_driver_settings(&mut settings).unwrap();
        settings.set_str(FILE_NAME, path.to_str().unwrap()).unwrap();
        settings.set_str(SAMPLE_FORMAT, format).unwrap();
        settings.set_int(PERIOD_SIZE, 64).unwrap();
        settings.set_int(SAMPLE_RATE, 8000).unwrap();
        settings
    }

    #[test]
    fn test_writes_int16_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let driver = new_file_driver(
            &settings_for(&path, "16bits"),
            SynthHandle::new(Constant(0.5, -0.5)),
        )
        .unwrap();
        assert_eq!(driver.sample_rate(), 8000);
        assert_eq!(driver.buffer_size(), 64);
        thread::sleep(Duration::from_millis(40));
        delete_file_driver(driver);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 16);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert!(!samples.is_empty());
        assert_eq!(samples.len() % 128, 0);
        assert_eq!(samples[0], to_i16(0.5));
        assert_eq!(samples[1], to_i16(-0.5));
    }

    #[test]
    fn test_writes_float_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let driver = new_file_driver(
            &settings_for(&path, "float"),
            SynthHandle::new(Constant(0.25, 0.75)),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        delete_file_driver(driver);

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_format, hound::SampleFormat::Float);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert!(samples.chunks(2).all(|f| f == [0.25, 0.75]));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.wav");
        let result = new_file_driver(
            &settings_for(&path, "16bits"),
            SynthHandle::new(Constant(0.0, 0.0)),
        );
        assert!(matches!(result, Err(AudioError::FileError(_))));
    }

    #[test]
    fn test_frames_duration_past_u32_periods() {
        assert_eq!(frames_duration(48000, 48000), Duration::from_secs(1));

        // more 64-frame periods than fit in a u32 (about 66 days at 48kHz)
        let periods = u32::MAX as u64 + 10;
        let elapsed = frames_duration(64 * periods, 48000);
        let expected = 64.0 * periods as f64 / 48000.0;
        assert!((elapsed.as_secs_f64() - expected).abs() < 1e-3);
        assert!(elapsed > Duration::from_secs(66 * 24 * 3600));
    }

    #[test]
    fn test_to_i16_clamps() {
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
        assert_eq!(to_i16(0.0), 0);
    }
}
