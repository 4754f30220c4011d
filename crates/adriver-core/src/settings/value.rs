//! Serializable setting values
//!
//! Hosts keep user overrides in their own config files (YAML in the CLI);
//! these types are the file-facing shape of those overrides.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single override value
///
/// Untagged so that `period-size: 256` and `selected-backend: alsa` both
/// read naturally from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Str(s.to_string())
    }
}

/// Overrides keyed by setting name, applied in name order
pub type SettingsOverrides = BTreeMap<String, SettingValue>;
