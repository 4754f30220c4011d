//! Settings registration for the audio driver subsystem
//!
//! Publishes the common driver options and the `selected-backend` choice
//! list into a [`Settings`] store, then lets every enabled backend add its
//! own options.

use crate::settings::{Settings, SettingsResult};
use crate::types::SampleFormat;

use super::catalog::Catalog;
use super::config::{
    AUTO, DEFAULT_REALTIME_PRIORITY, DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE,
    PERIODS, PERIODS_PRESET, PERIOD_SIZE, PERIOD_SIZE_PRESET, REALTIME_PRIORITY, SAMPLE_FORMAT,
    SAMPLE_RATE, SELECTED_BACKEND,
};
use super::mask::EnableMask;

/// Register the options shared by every backend
pub fn register_common_settings(settings: &mut Settings) -> SettingsResult<()> {
    settings.register_str(SAMPLE_FORMAT, SampleFormat::default().as_str())?;
    for format in SampleFormat::ALL {
        settings.add_option(SAMPLE_FORMAT, format.as_str())?;
    }

    let (default, min, max) = PERIOD_SIZE_PRESET;
    settings.register_int(PERIOD_SIZE, default, min, max)?;
    let (default, min, max) = PERIODS_PRESET;
    settings.register_int(PERIODS, default, min, max)?;

    settings.register_int(REALTIME_PRIORITY, DEFAULT_REALTIME_PRIORITY, 0, 99)?;
    settings.register_int(SAMPLE_RATE, DEFAULT_SAMPLE_RATE, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE)?;
    Ok(())
}

/// Register all driver settings for `catalog` under `mask`
///
/// `selected-backend` lists every catalog entry regardless of the mask; only
/// enabled entries get their own settings hook called. A failing hook does
/// not stop the pass: every hook runs and the first error is returned.
pub fn register_driver_settings(
    settings: &mut Settings,
    catalog: &Catalog,
    mask: &EnableMask,
) -> SettingsResult<()> {
    register_common_settings(settings)?;

    settings.register_str(SELECTED_BACKEND, AUTO)?;
    for def in catalog.iter() {
        settings.add_option(SELECTED_BACKEND, def.name)?;
    }

    let mut first_error = None;
    for (i, def) in catalog.iter().enumerate() {
        let Some(register) = def.settings else {
            continue;
        };
        if !mask.is_enabled(i) {
            log::debug!("Skipping settings of disabled '{}' audio driver", def.name);
            continue;
        }
        if let Err(e) = register(settings) {
            log::warn!("Failed to register settings of '{}' audio driver: {}", def.name, e);
            first_error.get_or_insert(e);
        }
    }

    log::debug!(
        "Registered audio driver settings, backends: {}",
        settings.option_concat(SELECTED_BACKEND, None)?
    );
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backends::mock::{self, FAIL_OK_OK, NO_CALLBACK_FIRST};
    use crate::settings::SettingsError;

    #[test]
    fn test_common_settings() {
        let mut settings = Settings::new();
        let catalog = Catalog::new(FAIL_OK_OK);
        register_driver_settings(&mut settings, &catalog, &EnableMask::new(catalog.len())).unwrap();

        assert_eq!(settings.get_str(SAMPLE_FORMAT).unwrap(), "16bits");
        assert_eq!(
            settings.options(SAMPLE_FORMAT).unwrap(),
            &["16bits".to_string(), "float".to_string()]
        );
        assert_eq!(settings.int_range(REALTIME_PRIORITY).unwrap().1, 0);
        assert_eq!(settings.int_range(REALTIME_PRIORITY).unwrap().2, 99);
        assert_eq!(settings.int_range(PERIOD_SIZE).unwrap(), PERIOD_SIZE_PRESET);
        assert_eq!(settings.int_range(PERIODS).unwrap(), PERIODS_PRESET);
        assert_eq!(settings.get_str(SELECTED_BACKEND).unwrap(), AUTO);
    }

    #[test]
    fn test_backend_options_ignore_mask() {
        let mut settings = Settings::new();
        let catalog = Catalog::new(FAIL_OK_OK);
        let mut mask = EnableMask::new(catalog.len());
        mask.set_enabled_set(&catalog, &["c"]).unwrap();

        register_driver_settings(&mut settings, &catalog, &mask).unwrap();
        assert_eq!(settings.option_concat(SELECTED_BACKEND, None).unwrap(), "a, b, c");
        assert!(!settings.option_is_valid(SELECTED_BACKEND, AUTO));
    }

    #[test]
    fn test_hooks_only_for_enabled_entries() {
        let mut settings = Settings::new();
        let catalog = Catalog::new(FAIL_OK_OK);
        let mut mask = EnableMask::new(catalog.len());
        mask.set_enabled_set(&catalog, &["a", "c"]).unwrap();

        register_driver_settings(&mut settings, &catalog, &mask).unwrap();
        assert_eq!(mock::hooks(), vec!["a", "c"]);
        assert!(settings.contains("a.device"));
        assert!(!settings.contains("b.device"));
        assert!(settings.contains("c.device"));
    }

    #[test]
    fn test_each_pass_calls_each_hook_once() {
        let mut settings = Settings::new();
        let catalog = Catalog::new(FAIL_OK_OK);
        let mask = EnableMask::new(catalog.len());

        register_driver_settings(&mut settings, &catalog, &mask).unwrap();
        assert_eq!(mock::hooks(), vec!["a", "b", "c"]);

        // second pass over the same store is tolerated and does not duplicate options
        register_driver_settings(&mut settings, &catalog, &mask).unwrap();
        assert_eq!(mock::hooks(), vec!["a", "b", "c", "a", "b", "c"]);
        assert_eq!(settings.options(SELECTED_BACKEND).unwrap().len(), 3);
    }

    #[test]
    fn test_failing_hook_keeps_every_backend_option() {
        let mut settings = Settings::new();
        settings.register_int("a.device", 0, 0, 1).unwrap();
        let catalog = Catalog::new(FAIL_OK_OK);

        let result = register_driver_settings(&mut settings, &catalog, &EnableMask::new(catalog.len()));
        assert!(matches!(result, Err(SettingsError::TypeMismatch { .. })));
        assert_eq!(settings.option_concat(SELECTED_BACKEND, None).unwrap(), "a, b, c");
        assert_eq!(mock::hooks(), vec!["a", "b", "c"]);
        assert!(settings.contains("c.device"));
    }

    #[test]
    fn test_entries_without_hook() {
        let mut settings = Settings::new();
        let catalog = Catalog::new(NO_CALLBACK_FIRST);
        register_driver_settings(&mut settings, &catalog, &EnableMask::new(catalog.len())).unwrap();
        assert_eq!(mock::hooks(), vec!["b"]);
    }
}
