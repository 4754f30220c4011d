//! Typed key-value settings store
//!
//! Backends and the driver factory read all of their parameters from here.
//! A setting is either a string (optionally with a list of allowed values)
//! or a bounded integer, and must be registered before it can be read or set.
//!
//! # Example Usage
//!
//! ```ignore
//! let mut settings = Settings::new();
//! settings.register_str("sample-format", "16bits")?;
//! settings.add_option("sample-format", "16bits")?;
//! settings.add_option("sample-format", "float")?;
//! settings.register_int("period-size", 64, 64, 8192)?;
//!
//! settings.set_int("period-size", 256)?;
//! assert!(settings.option_is_valid("sample-format", "float"));
//! ```

mod error;
mod value;

use std::collections::BTreeMap;

pub use error::{SettingsError, SettingsResult};
pub use value::{SettingValue, SettingsOverrides};

#[derive(Debug, Clone, PartialEq)]
enum Setting {
    Str {
        value: String,
        default: String,
        /// Allowed values in insertion order (empty = free-form)
        options: Vec<String>,
    },
    Int {
        value: i64,
        default: i64,
        min: i64,
        max: i64,
    },
}

/// Settings store
#[derive(Debug, Clone, Default)]
pub struct Settings {
    entries: BTreeMap<String, Setting>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a string setting
    ///
    /// Registering an existing string setting again updates its default and
    /// keeps the current value and options.
    pub fn register_str(&mut self, name: &str, default: &str) -> SettingsResult<()> {
        match self.entries.get_mut(name) {
            Some(Setting::Str { default: d, .. }) => {
                *d = default.to_string();
                Ok(())
            }
            Some(Setting::Int { .. }) => Err(mismatch(name, "string")),
            None => {
                self.entries.insert(
                    name.to_string(),
                    Setting::Str {
                        value: default.to_string(),
                        default: default.to_string(),
                        options: Vec::new(),
                    },
                );
                Ok(())
            }
        }
    }

    /// Add an allowed value to a string setting (duplicates are ignored)
    pub fn add_option(&mut self, name: &str, option: &str) -> SettingsResult<()> {
        match self.entries.get_mut(name) {
            Some(Setting::Str { options, .. }) => {
                if !options.iter().any(|o| o == option) {
                    options.push(option.to_string());
                }
                Ok(())
            }
            Some(Setting::Int { .. }) => Err(mismatch(name, "string")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// Register a bounded integer setting
    ///
    /// Registering an existing integer setting again updates default and
    /// bounds; the current value is clamped into the new bounds.
    pub fn register_int(&mut self, name: &str, default: i64, min: i64, max: i64) -> SettingsResult<()> {
        if min > max || default < min || default > max {
            return Err(SettingsError::InvalidBounds {
                name: name.to_string(),
                default,
                min,
                max,
            });
        }

        match self.entries.get_mut(name) {
            Some(Setting::Int {
                value,
                default: d,
                min: lo,
                max: hi,
            }) => {
                *d = default;
                *lo = min;
                *hi = max;
                *value = (*value).clamp(min, max);
                Ok(())
            }
            Some(Setting::Str { .. }) => Err(mismatch(name, "integer")),
            None => {
                self.entries.insert(
                    name.to_string(),
                    Setting::Int {
                        value: default,
                        default,
                        min,
                        max,
                    },
                );
                Ok(())
            }
        }
    }

    /// Whether a setting with this name has been registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all registered settings, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get_str(&self, name: &str) -> SettingsResult<&str> {
        match self.entries.get(name) {
            Some(Setting::Str { value, .. }) => Ok(value),
            Some(Setting::Int { .. }) => Err(mismatch(name, "string")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// Default value of a string setting
    pub fn get_str_default(&self, name: &str) -> SettingsResult<&str> {
        match self.entries.get(name) {
            Some(Setting::Str { default, .. }) => Ok(default),
            Some(Setting::Int { .. }) => Err(mismatch(name, "string")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// True if the string setting exists and currently equals `s`
    pub fn str_equal(&self, name: &str, s: &str) -> bool {
        self.get_str(name).map(|v| v == s).unwrap_or(false)
    }

    /// Set a string setting
    ///
    /// The value is not checked against the option list; use
    /// [`Settings::option_is_valid`] for that.
    pub fn set_str(&mut self, name: &str, new_value: &str) -> SettingsResult<()> {
        match self.entries.get_mut(name) {
            Some(Setting::Str { value, .. }) => {
                *value = new_value.to_string();
                Ok(())
            }
            Some(Setting::Int { .. }) => Err(mismatch(name, "string")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    pub fn get_int(&self, name: &str) -> SettingsResult<i64> {
        match self.entries.get(name) {
            Some(Setting::Int { value, .. }) => Ok(*value),
            Some(Setting::Str { .. }) => Err(mismatch(name, "integer")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// Registered (default, min, max) of an integer setting
    pub fn int_range(&self, name: &str) -> SettingsResult<(i64, i64, i64)> {
        match self.entries.get(name) {
            Some(Setting::Int { default, min, max, .. }) => Ok((*default, *min, *max)),
            Some(Setting::Str { .. }) => Err(mismatch(name, "integer")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// Set an integer setting, rejecting values outside its bounds
    pub fn set_int(&mut self, name: &str, new_value: i64) -> SettingsResult<()> {
        match self.entries.get_mut(name) {
            Some(Setting::Int { value, min, max, .. }) => {
                if new_value < *min || new_value > *max {
                    return Err(SettingsError::OutOfRange {
                        name: name.to_string(),
                        value: new_value,
                        min: *min,
                        max: *max,
                    });
                }
                *value = new_value;
                Ok(())
            }
            Some(Setting::Str { .. }) => Err(mismatch(name, "integer")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// Allowed values of a string setting, in registration order
    pub fn options(&self, name: &str) -> SettingsResult<&[String]> {
        match self.entries.get(name) {
            Some(Setting::Str { options, .. }) => Ok(options),
            Some(Setting::Int { .. }) => Err(mismatch(name, "string")),
            None => Err(SettingsError::Unknown(name.to_string())),
        }
    }

    /// True if `value` is one of the registered options of a string setting
    pub fn option_is_valid(&self, name: &str, value: &str) -> bool {
        self.options(name)
            .map(|opts| opts.iter().any(|o| o == value))
            .unwrap_or(false)
    }

    /// All options of a string setting joined by `separator` (default ", ")
    pub fn option_concat(&self, name: &str, separator: Option<&str>) -> SettingsResult<String> {
        Ok(self.options(name)?.join(separator.unwrap_or(", ")))
    }

    /// Apply host overrides
    ///
    /// Stops at the first override that names an unknown setting, has the
    /// wrong type, or is out of range. Overrides before it stay applied.
    pub fn apply(&mut self, overrides: &SettingsOverrides) -> SettingsResult<()> {
        for (name, value) in overrides {
            match value {
                SettingValue::Int(v) => self.set_int(name, *v)?,
                SettingValue::Str(s) => self.set_str(name, s)?,
            }
            log::debug!("Setting '{}' overridden to {}", name, value);
        }
        Ok(())
    }
}

fn mismatch(name: &str, expected: &'static str) -> SettingsError {
    SettingsError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_settings() -> Settings {
        let mut s = Settings::new();
        s.register_str("sample-format", "16bits").unwrap();
        s.add_option("sample-format", "16bits").unwrap();
        s.add_option("sample-format", "float").unwrap();
        s.register_int("period-size", 64, 64, 8192).unwrap();
        s
    }

    #[test]
    fn test_string_options() {
        let s = format_settings();
        assert_eq!(s.get_str("sample-format").unwrap(), "16bits");
        assert!(s.str_equal("sample-format", "16bits"));
        assert!(s.option_is_valid("sample-format", "float"));
        assert!(!s.option_is_valid("sample-format", "24bits"));
        assert_eq!(s.option_concat("sample-format", None).unwrap(), "16bits, float");
    }

    #[test]
    fn test_set_str_is_not_validated() {
        let mut s = format_settings();
        s.set_str("sample-format", "bogus").unwrap();
        assert_eq!(s.get_str("sample-format").unwrap(), "bogus");
        assert!(!s.option_is_valid("sample-format", "bogus"));
    }

    #[test]
    fn test_int_bounds() {
        let mut s = format_settings();
        s.set_int("period-size", 512).unwrap();
        assert_eq!(s.get_int("period-size").unwrap(), 512);
        assert!(matches!(
            s.set_int("period-size", 1),
            Err(SettingsError::OutOfRange { .. })
        ));
        assert_eq!(s.get_int("period-size").unwrap(), 512);
        assert!(s.register_int("bad", 5, 10, 20).is_err());
    }

    #[test]
    fn test_type_mismatch_and_unknown() {
        let mut s = format_settings();
        assert!(matches!(
            s.get_int("sample-format"),
            Err(SettingsError::TypeMismatch { .. })
        ));
        assert!(matches!(s.get_str("nope"), Err(SettingsError::Unknown(_))));
        assert!(s.register_int("sample-format", 1, 0, 2).is_err());
        assert!(!s.str_equal("nope", "x"));
    }

    #[test]
    fn test_reregistration_keeps_value_and_options() {
        let mut s = format_settings();
        s.set_str("sample-format", "float").unwrap();
        s.set_int("period-size", 4096).unwrap();

        s.register_str("sample-format", "16bits").unwrap();
        s.add_option("sample-format", "float").unwrap();
        s.register_int("period-size", 64, 64, 1024).unwrap();

        assert_eq!(s.get_str("sample-format").unwrap(), "float");
        assert_eq!(s.options("sample-format").unwrap().len(), 2);
        // clamped into the new bounds
        assert_eq!(s.get_int("period-size").unwrap(), 1024);
    }

    #[test]
    fn test_apply_overrides() {
        let mut s = format_settings();
        let mut overrides = SettingsOverrides::new();
        overrides.insert("period-size".into(), SettingValue::Int(128));
        overrides.insert("sample-format".into(), "float".into());
        s.apply(&overrides).unwrap();
        assert_eq!(s.get_int("period-size").unwrap(), 128);
        assert_eq!(s.get_str("sample-format").unwrap(), "float");

        overrides.insert("missing".into(), SettingValue::Int(1));
        assert!(matches!(s.apply(&overrides), Err(SettingsError::Unknown(_))));
    }
}
