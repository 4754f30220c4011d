//! Sine test tone

use std::f32::consts::TAU;

use adriver_core::{StereoSample, Synth};

/// Sine oscillator rendering the same signal on both channels
#[derive(Debug, Clone)]
pub struct SineSynth {
    frequency: f32,
    phase: f32,
    increment: f32,
    amplitude: f32,
}

impl SineSynth {
    pub fn new(frequency: f32, amplitude: f32, sample_rate: u32) -> Self {
        Self {
            frequency,
            phase: 0.0,
            increment: TAU * frequency / sample_rate.max(1) as f32,
            amplitude: amplitude.clamp(0.0, 1.0),
        }
    }

    /// Retune for a different output rate, keeping the phase
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.increment = TAU * self.frequency / sample_rate.max(1) as f32;
    }

    /// Render one frame
    #[inline]
    pub fn next_sample(&mut self) -> StereoSample {
        let value = self.phase.sin() * self.amplitude;
        self.phase = (self.phase + self.increment) % TAU;
        StereoSample::mono(value)
    }
}

impl Synth for SineSynth {
    fn render(&mut self, out: &mut [StereoSample]) {
        for frame in out.iter_mut() {
            *frame = self.next_sample();
        }
    }
}
