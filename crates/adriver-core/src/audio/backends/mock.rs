//! Mock backends for registry, factory and registrar tests
//!
//! Every constructor, destructor and settings hook appends to a thread-local
//! log so tests can assert exactly what the factory touched and in which
//! order. Each test runs on its own thread, so logs never mix.

use std::any::Any;
use std::cell::RefCell;

use crate::audio::definition::{
    downcast_driver, DriverDefinition, DriverInstance, DriverSettingsFn, NewCallbackDriverFn,
    NewSynthDriverFn,
};
use crate::audio::error::{AudioError, AudioResult};
use crate::audio::render::{AudioFunc, SynthHandle};
use crate::settings::{Settings, SettingsResult};
use crate::types::StereoSample;

thread_local! {
    static ATTEMPTS: RefCell<Vec<(&'static str, &'static str)>> = const { RefCell::new(Vec::new()) };
    static DELETED: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    static HOOKS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// (backend, mode) of every constructor call on this thread
pub fn attempts() -> Vec<(&'static str, &'static str)> {
    ATTEMPTS.with(|a| a.borrow().clone())
}

/// Backend names of every delete on this thread
pub fn deleted() -> Vec<&'static str> {
    DELETED.with(|d| d.borrow().clone())
}

/// Backend names of every settings hook call on this thread
pub fn hooks() -> Vec<&'static str> {
    HOOKS.with(|h| h.borrow().clone())
}

pub struct MockDriver {
    name: &'static str,
}

impl DriverInstance for MockDriver {
    fn sample_rate(&self) -> u32 {
        48000
    }

    fn buffer_size(&self) -> u32 {
        480
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl MockDriver {
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

/// Synth that renders silence
pub struct Silence;

impl crate::audio::render::Synth for Silence {
    fn render(&mut self, out: &mut [StereoSample]) {
        out.fill(StereoSample::silence());
    }
}

pub fn silence() -> SynthHandle {
    SynthHandle::new(Silence)
}

pub fn noop_func() -> AudioFunc {
    AudioFunc::new(|out: &mut [StereoSample]| out.fill(StereoSample::silence()))
}

fn attempt(name: &'static str, mode: &'static str, ok: bool) -> AudioResult<Box<dyn DriverInstance>> {
    ATTEMPTS.with(|a| a.borrow_mut().push((name, mode)));
    if ok {
        Ok(Box::new(MockDriver { name }))
    } else {
        Err(AudioError::StreamBuildError(format!("{} refused to start", name)))
    }
}

fn hook(name: &'static str, settings: &mut Settings) -> SettingsResult<()> {
    HOOKS.with(|h| h.borrow_mut().push(name));
    settings.register_str(&format!("{}.device", name), "default")
}

fn delete_mock(driver: Box<dyn DriverInstance>) {
    if let Some(driver) = downcast_driver::<MockDriver>("mock", driver) {
        DELETED.with(|d| d.borrow_mut().push(driver.name));
    }
}

macro_rules! mock_backend {
    ($new:ident, $new_cb:ident, $settings:ident, $name:literal, $ok:expr) => {
        fn $new(_: &Settings, _: SynthHandle) -> AudioResult<Box<dyn DriverInstance>> {
            attempt($name, "synth", $ok)
        }

        fn $new_cb(_: &Settings, _: AudioFunc) -> AudioResult<Box<dyn DriverInstance>> {
            attempt($name, "callback", $ok)
        }

        fn $settings(settings: &mut Settings) -> SettingsResult<()> {
            hook($name, settings)
        }
    };
}

mock_backend!(new_a_fail, new_a_fail_cb, settings_a, "a", false);
mock_backend!(new_a_ok, new_a_ok_cb, settings_a_ok, "a", true);
mock_backend!(new_b_ok, new_b_ok_cb, settings_b, "b", true);
mock_backend!(new_b_fail, new_b_fail_cb, settings_b_fail, "b", false);
mock_backend!(new_c_ok, new_c_ok_cb, settings_c, "c", true);

const fn mock(
    name: &'static str,
    new: Option<NewSynthDriverFn>,
    new_with_callback: Option<NewCallbackDriverFn>,
    settings: Option<DriverSettingsFn>,
) -> DriverDefinition {
    DriverDefinition {
        name,
        new,
        new_with_callback,
        delete: delete_mock,
        settings,
    }
}

/// a fails, b and c start
pub static FAIL_OK_OK: &[DriverDefinition] = &[
    mock("a", Some(new_a_fail), Some(new_a_fail_cb), Some(settings_a)),
    mock("b", Some(new_b_ok), Some(new_b_ok_cb), Some(settings_b)),
    mock("c", Some(new_c_ok), Some(new_c_ok_cb), Some(settings_c)),
];

/// Every backend fails
pub static ALL_FAIL: &[DriverDefinition] = &[
    mock("a", Some(new_a_fail), Some(new_a_fail_cb), Some(settings_a)),
    mock("b", Some(new_b_fail), Some(new_b_fail_cb), Some(settings_b_fail)),
];

/// a starts but has no callback mode and no settings hook, b starts in both modes
pub static NO_CALLBACK_FIRST: &[DriverDefinition] = &[
    mock("a", Some(new_a_ok), None, None),
    mock("b", Some(new_b_ok), Some(new_b_ok_cb), Some(settings_b)),
];

/// a has only a callback constructor
pub static CALLBACK_ONLY: &[DriverDefinition] = &[
    mock("a", None, Some(new_a_ok_cb), Some(settings_a_ok)),
    mock("b", Some(new_b_ok), Some(new_b_ok_cb), Some(settings_b)),
];

/// Nine entries, to cover a mask wider than one byte
pub static NINE: &[DriverDefinition] = &[
    mock("n0", Some(new_b_ok), None, None),
    mock("n1", Some(new_b_ok), None, None),
    mock("n2", Some(new_b_ok), None, None),
    mock("n3", Some(new_b_ok), None, None),
    mock("n4", Some(new_b_ok), None, None),
    mock("n5", Some(new_b_ok), None, None),
    mock("n6", Some(new_b_ok), None, None),
    mock("n7", Some(new_b_ok), None, None),
    mock("n8", Some(new_b_ok), None, None),
];

/// Nothing compiled in
pub static EMPTY: &[DriverDefinition] = &[];
