//! Generation configuration loaded from YAML.
//!
//! ```yaml
//! settings:
//!   workers: 8
//!   max_file_size_gb: 40
//!   chunk_size: 10000          # alias: docs_per_chunk
//!
//! generator_overrides:         # engine type -> default params
//!   integer:
//!     min: 0
//!     max: 5000
//!
//! field_overrides:             # dotted field path -> generator
//!   user.email:
//!     generator: keyword
//!     params:
//!       choices: [a@example.com, b@example.com]
//!
//! timeseries:
//!   field: "@timestamp"
//!   start_date: "2024-01-01"
//!   end_date: "2024-01-31"
//!   frequency: s
//!   format: "%Y-%m-%dT%H:%M:%S"
//! ```
//!
//! Everything is validated at load time so misconfigured overrides fail
//! before a blueprint is hydrated.

use crate::formats::DateFormat;
use crate::schema::{Blueprint, SchemaError};
use crate::types::{kind_for_engine_type, GeneratorKind};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_FILE_SIZE_GB: f64 = 40.0;
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },

    #[error("Generator override for unsupported engine type '{0}'")]
    UnsupportedEngineType(String),

    #[error("Parameter '{param}' is not accepted by {kind} (in override for '{target}')")]
    InvalidParameter {
        target: String,
        param: String,
        kind: GeneratorKind,
    },

    #[error("Field override for '{field}' cannot use composite generator {kind}")]
    CompositeOverride { field: String, kind: GeneratorKind },

    #[error("Invalid field name '{0}': must start with a letter, '_' or '@' and contain only letters, digits, '_', '.' or '@'")]
    InvalidFieldName(String),

    #[error("Unsupported timestamp format '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD or an ISO-8601 datetime")]
    InvalidDate(String),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SdgConfig {
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub generator_overrides: BTreeMap<String, Map<String, Value>>,

    #[serde(default)]
    pub field_overrides: BTreeMap<String, FieldOverride>,

    #[serde(default)]
    pub timeseries: Option<TimeseriesConfig>,
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Chunks generated in parallel per round.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-file size ceiling in GiB.
    #[serde(default = "default_max_file_size_gb")]
    pub max_file_size_gb: f64,

    /// Documents per generated chunk.
    #[serde(default = "default_chunk_size", alias = "docs_per_chunk")]
    pub chunk_size: usize,
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_max_file_size_gb() -> f64 {
    DEFAULT_MAX_FILE_SIZE_GB
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_file_size_gb: DEFAULT_MAX_FILE_SIZE_GB,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Settings {
    /// Per-file ceiling in bytes.
    pub fn max_file_bytes(&self) -> u64 {
        (self.max_file_size_gb * BYTES_PER_GB) as u64
    }
}

/// Generator substitution for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOverride {
    pub generator: GeneratorKind,

    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Time-series mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesConfig {
    /// Dotted path of the timestamp field overwritten in each document.
    pub field: String,

    #[serde(default = "default_start_date")]
    pub start_date: String,

    #[serde(default = "default_end_date")]
    pub end_date: String,

    #[serde(default = "default_frequency")]
    pub frequency: String,

    #[serde(default = "default_format")]
    pub format: String,
}

fn default_start_date() -> String {
    "2019-01-01".to_string()
}

fn default_end_date() -> String {
    "2019-12-31".to_string()
}

fn default_frequency() -> String {
    "min".to_string()
}

fn default_format() -> String {
    "%Y-%m-%dT%H:%M:%S".to_string()
}

impl TimeseriesConfig {
    /// Config for `field` with every other value at its default.
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            frequency: default_frequency(),
            format: default_format(),
        }
    }

    pub fn start(&self) -> Result<NaiveDateTime, ConfigError> {
        parse_datetime(&self.start_date)
    }

    pub fn end(&self) -> Result<NaiveDateTime, ConfigError> {
        parse_datetime(&self.end_date)
    }

    pub fn date_format(&self) -> Result<DateFormat, ConfigError> {
        DateFormat::parse_timeseries(&self.format)
            .ok_or_else(|| ConfigError::UnsupportedFormat(self.format.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_field_path(&self.field) {
            return Err(ConfigError::InvalidFieldName(self.field.clone()));
        }
        let (start, end) = (self.start()?, self.end()?);
        if start > end {
            return Err(ConfigError::InvalidSetting {
                name: "timeseries.start_date".to_string(),
                reason: format!("{} is after end_date {}", self.start_date, self.end_date),
            });
        }
        self.date_format()?;
        Ok(())
    }
}

/// Parse `YYYY-MM-DD` or an ISO-8601 datetime (with or without offset).
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, ConfigError> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::InvalidDate(value.to_string()))
}

/// Whether `path` is a dotted field path of valid field names.
pub fn is_valid_field_path(path: &str) -> bool {
    let mut chars = path.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '@');
    first_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@'))
        && !path.ends_with('.')
        && !path.contains("..")
}

impl SdgConfig {
    /// Load and validate a YAML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML config string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: SdgConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings values and overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = &self.settings;
        if settings.workers == 0 {
            return Err(invalid_setting("workers", "must be at least 1"));
        }
        if settings.chunk_size == 0 {
            return Err(invalid_setting("chunk_size", "must be at least 1"));
        }
        if !(settings.max_file_size_gb.is_finite() && settings.max_file_size_gb > 0.0) {
            return Err(invalid_setting("max_file_size_gb", "must be a positive number"));
        }

        for (engine_type, params) in &self.generator_overrides {
            let kind = kind_for_engine_type(engine_type)
                .ok_or_else(|| ConfigError::UnsupportedEngineType(engine_type.clone()))?;
            check_params(engine_type, kind, params)?;
        }

        for (field, field_override) in &self.field_overrides {
            if !is_valid_field_path(field) {
                return Err(ConfigError::InvalidFieldName(field.clone()));
            }
            if field_override.generator.is_composite() {
                return Err(ConfigError::CompositeOverride {
                    field: field.clone(),
                    kind: field_override.generator,
                });
            }
            check_params(field, field_override.generator, &field_override.params)?;
        }

        if let Some(timeseries) = &self.timeseries {
            timeseries.validate()?;
        }
        Ok(())
    }

    /// Apply generator defaults, then field overrides, to a parsed blueprint.
    pub fn apply_to(&self, blueprint: &mut Blueprint) -> Result<(), SchemaError> {
        for (engine_type, params) in &self.generator_overrides {
            blueprint.apply_generator_defaults(engine_type, params);
        }
        for (field, field_override) in &self.field_overrides {
            blueprint.override_field(field, field_override.generator, field_override.params.clone())?;
            tracing::debug!("Field '{}' overridden with {}", field, field_override.generator);
        }
        Ok(())
    }
}

fn invalid_setting(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn check_params(target: &str, kind: GeneratorKind, params: &Map<String, Value>) -> Result<(), ConfigError> {
    let accepted = kind.accepted_params();
    match params.keys().find(|k| !accepted.contains(&k.as_str())) {
        Some(param) => Err(ConfigError::InvalidParameter {
            target: target.to_string(),
            param: param.clone(),
            kind,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BlueprintNode, GeneratorSpec};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
settings:
  workers: 4
  max_file_size_gb: 0.5
  docs_per_chunk: 250

generator_overrides:
  long:
    min: 10
    max: 20

field_overrides:
  user.role:
    generator: random_choice
    params:
      elements: [admin, guest]

timeseries:
  field: "@timestamp"
  start_date: "2024-01-01"
  end_date: "2024-01-02"
  frequency: s
"#;

    #[test]
    fn test_full_config() {
        let config = SdgConfig::from_yaml(FULL_CONFIG).unwrap();
        assert_eq!(config.settings.workers, 4);
        assert_eq!(config.settings.chunk_size, 250);
        assert_eq!(config.settings.max_file_bytes(), 512 * 1024 * 1024);
        assert_eq!(config.generator_overrides["long"]["max"], json!(20));
        assert_eq!(
            config.field_overrides["user.role"].generator,
            GeneratorKind::RandomChoice
        );

        let timeseries = config.timeseries.unwrap();
        assert_eq!(timeseries.field, "@timestamp");
        assert_eq!(timeseries.format, "%Y-%m-%dT%H:%M:%S");
        assert_eq!(timeseries.start().unwrap().to_string(), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_defaults() {
        let config = SdgConfig::from_yaml("{}").unwrap();
        assert_eq!(config.settings.workers, num_cpus::get());
        assert_eq!(config.settings.max_file_size_gb, 40.0);
        assert_eq!(config.settings.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.timeseries.is_none());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"settings:\n  workers: 2\n").unwrap();
        let config = SdgConfig::from_file(file.path()).unwrap();
        assert_eq!(config.settings.workers, 2);
    }

    #[test]
    fn test_invalid_settings() {
        let err = SdgConfig::from_yaml("settings:\n  workers: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { name, .. } if name == "workers"));

        let err = SdgConfig::from_yaml("settings:\n  max_file_size_gb: -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { .. }));
    }

    #[test]
    fn test_unknown_override_generator_fails_at_load() {
        let yaml = "field_overrides:\n  name:\n    generator: shoe_size\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::Yaml(_)
        ));
    }

    #[test]
    fn test_override_validation() {
        let yaml = "generator_overrides:\n  knn_vector:\n    min: 1\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::UnsupportedEngineType(t) if t == "knn_vector"
        ));

        let yaml = "generator_overrides:\n  long:\n    choices: [1]\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::InvalidParameter { param, .. } if param == "choices"
        ));

        let yaml = "field_overrides:\n  user:\n    generator: nested\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::CompositeOverride { .. }
        ));

        let yaml = "field_overrides:\n  9lives:\n    generator: integer\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::InvalidFieldName(_)
        ));
    }

    #[test]
    fn test_timeseries_validation() {
        let yaml = "timeseries:\n  field: ts\n  format: \"%Q\"\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::UnsupportedFormat(_)
        ));

        let yaml = "timeseries:\n  field: ts\n  start_date: \"2024-02-01\"\n  end_date: \"2024-01-01\"\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::InvalidSetting { .. }
        ));

        let yaml = "timeseries:\n  field: ts\n  start_date: yesterday\n";
        assert!(matches!(
            SdgConfig::from_yaml(yaml).unwrap_err(),
            ConfigError::InvalidDate(_)
        ));
    }

    #[test]
    fn test_field_paths() {
        assert!(is_valid_field_path("@timestamp"));
        assert!(is_valid_field_path("user.address.city"));
        assert!(is_valid_field_path("_id"));
        assert!(!is_valid_field_path("user..city"));
        assert!(!is_valid_field_path("user."));
        assert!(!is_valid_field_path("first name"));
        assert!(!is_valid_field_path(""));
    }

    #[test]
    fn test_apply_to() {
        let config = SdgConfig::from_yaml(FULL_CONFIG).unwrap();

        let mut count = GeneratorSpec::new(GeneratorKind::Integer);
        count.engine_type = Some("long".to_string());
        let user = Blueprint::new().with_field(
            "role",
            BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Keyword)),
        );
        let mut blueprint = Blueprint::new()
            .with_field("count", BlueprintNode::generator(count))
            .with_field(
                "user",
                BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Object).with_fields(user)),
            );

        config.apply_to(&mut blueprint).unwrap();

        match blueprint.get("count").unwrap() {
            BlueprintNode::Generator(spec) => assert_eq!(spec.params["min"], json!(10)),
            other => panic!("unexpected node {other:?}"),
        }
        match blueprint.node_at_path_mut("user.role").unwrap() {
            BlueprintNode::Generator(spec) => assert_eq!(spec.kind, "RANDOM_CHOICE"),
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_apply_to_missing_field() {
        let config = SdgConfig::from_yaml(FULL_CONFIG).unwrap();
        let mut blueprint = Blueprint::new();
        assert!(matches!(
            config.apply_to(&mut blueprint).unwrap_err(),
            SchemaError::FieldNotFound(p) if p == "user.role"
        ));
    }
}
