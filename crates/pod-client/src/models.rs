//! Pod client models
//!
//! Process configuration records match the JSON the unified image's launcher
//! publishes in its current-configuration annotation.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Substitution variables a process group renders into its launcher config
pub type SubstitutionMap = HashMap<String, String>;

/// Which image layout a pod runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    /// Separate main and sidecar images; files are synced through the sidecar API
    #[default]
    Split,
    /// One image; the launcher reports state through pod annotations
    Unified,
}

impl ImageType {
    /// Interpret the `FDB_IMAGE_TYPE` value. Anything but "unified" is split.
    #[must_use]
    pub fn from_env_value(value: &str) -> Self {
        if value == "unified" {
            ImageType::Unified
        } else {
            ImageType::Split
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageType::Split => f.write_str("split"),
            ImageType::Unified => f.write_str("unified"),
        }
    }
}

/// Where a pod's public IP is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicIpSource {
    /// The pod's own IPs from its status
    #[default]
    Pod,
    /// A per-pod service IP stored in an annotation
    Service,
}

/// Process configuration run by the launcher in the unified image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfiguration {
    /// FoundationDB version the processes run
    #[serde(default)]
    pub version: String,

    /// Whether the launcher should run fdbserver processes at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_servers: Option<bool>,

    /// Command-line arguments for each process
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

/// One argument in a process configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// How the argument is rendered
    #[serde(rename = "type", default)]
    pub argument_type: ArgumentType,

    /// Literal value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// Sub-arguments joined by a `Concatenate` argument
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Argument>,

    /// Environment variable read by an `Environment` argument
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Multiplier applied to the process number
    #[serde(default, deserialize_with = "deserialize_integral")]
    pub multiplier: i64,

    /// Offset added to the process number
    #[serde(default, deserialize_with = "deserialize_integral")]
    pub offset: i64,
}

/// Argument rendering mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentType {
    /// Use `value` verbatim
    #[default]
    #[serde(alias = "")]
    Literal,
    /// Join the rendered `values`
    Concatenate,
    /// Read the environment variable named by `source`
    Environment,
    /// Render `process_number * multiplier + offset`
    ProcessNumber,
}

/// Accept any JSON number with an integral value, so `2` and `2.0` compare equal.
#[allow(clippy::cast_possible_truncation, reason = "fraction and range are checked first")]
fn deserialize_integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => Ok(value as i64),
        _ => Err(de::Error::custom(format!("expected an integer, found {number}"))),
    }
}
