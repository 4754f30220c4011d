//! Render sources driven by a backend's audio thread
//!
//! A driver is bound either to a [`Synth`] engine (pulled directly) or to a
//! caller supplied [`AudioFunc`]. Both are shared handles so the factory can
//! offer the same source to the next candidate after a failed start.

use std::sync::{Arc, Mutex, PoisonError};

use crate::types::StereoSample;

/// Synthesis engine a driver pulls samples from
pub trait Synth: Send {
    /// Fill `out` with the next `out.len()` frames
    fn render(&mut self, out: &mut [StereoSample]);
}

/// Shared handle to a synthesis engine
#[derive(Clone)]
pub struct SynthHandle(Arc<Mutex<dyn Synth>>);

impl SynthHandle {
    pub fn new<S: Synth + 'static>(synth: S) -> Self {
        Self(Arc::new(Mutex::new(synth)))
    }

    /// Wrap an engine the caller keeps its own reference to
    pub fn from_shared<S: Synth + 'static>(synth: Arc<Mutex<S>>) -> Self {
        Self(synth)
    }

    pub fn render(&self, out: &mut [StereoSample]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .render(out);
    }
}

type RenderFn = dyn FnMut(&mut [StereoSample]) + Send;

/// Caller supplied render callback
///
/// Whatever the closure captures is its user data. Called on the backend's
/// audio thread as soon as the driver is constructed.
#[derive(Clone)]
pub struct AudioFunc(Arc<Mutex<RenderFn>>);

impl AudioFunc {
    pub fn new<F>(func: F) -> Self
    where
        F: FnMut(&mut [StereoSample]) + Send + 'static,
    {
        Self(Arc::new(Mutex::new(func)))
    }

    pub fn render(&self, out: &mut [StereoSample]) {
        let mut func = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        (&mut *func)(out)
    }
}

/// What a running backend renders from
#[derive(Clone)]
pub enum RenderSource {
    Synth(SynthHandle),
    Callback(AudioFunc),
}

impl RenderSource {
    /// Render `out.len()` frames
    pub fn render(&self, out: &mut [StereoSample]) {
        match self {
            RenderSource::Synth(synth) => synth.render(out),
            RenderSource::Callback(func) => func.render(out),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            RenderSource::Synth(_) => "synth",
            RenderSource::Callback(_) => "callback",
        }
    }
}
