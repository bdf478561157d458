//! Schema parsers.
//!
//! Two input dialects produce a [`Blueprint`]:
//!
//! - **Mapping**: an engine field mapping (`{"properties": {...}}` and the
//!   index-template / export shapes wrapping it). See [`mapping`].
//! - **Template**: a literal example document with `{{KIND(k=v,...)}}`
//!   placeholders. See [`template`].
//!
//! [`parse`] detects the dialect; callers that already know it use
//! [`parse_mapping`] or [`parse_template`] directly.

pub mod mapping;
pub mod template;

use crate::schema::{Blueprint, SchemaError};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use mapping::parse_mapping;
pub use template::parse_template;

/// Input dialect of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    Mapping,
    Template,
}

impl fmt::Display for SchemaDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDialect::Mapping => write!(f, "mapping"),
            SchemaDialect::Template => write!(f, "template"),
        }
    }
}

impl FromStr for SchemaDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mapping" | "mappings" => Ok(SchemaDialect::Mapping),
            "template" => Ok(SchemaDialect::Template),
            _ => Err(format!("Unknown schema dialect: {s}")),
        }
    }
}

/// Detect the dialect of a raw schema.
pub fn detect_dialect(raw: &Value) -> Result<SchemaDialect, SchemaError> {
    if mapping::locate_properties(raw).is_some() {
        return Ok(SchemaDialect::Mapping);
    }
    match raw {
        Value::Object(map) if !map.is_empty() => Ok(SchemaDialect::Template),
        Value::Object(_) => Err(SchemaError::UnrecognizedSchema(
            "empty document".to_string(),
        )),
        other => Err(SchemaError::UnrecognizedSchema(format!(
            "expected a JSON object, found {}",
            json_type_name(other)
        ))),
    }
}

/// Parse a raw schema of either dialect.
pub fn parse(raw: &Value) -> Result<Blueprint, SchemaError> {
    match detect_dialect(raw)? {
        SchemaDialect::Mapping => parse_mapping(raw),
        SchemaDialect::Template => parse_template(raw),
    }
}

/// Parse a raw schema in a known dialect.
pub fn parse_as(raw: &Value, dialect: SchemaDialect) -> Result<Blueprint, SchemaError> {
    match dialect {
        SchemaDialect::Mapping => parse_mapping(raw),
        SchemaDialect::Template => parse_template(raw),
    }
}

impl Blueprint {
    /// Load and parse a JSON schema file.
    pub fn from_file<P: AsRef<Path>>(path: P, dialect: SchemaDialect) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content, dialect)
    }

    /// Parse a JSON schema string.
    pub fn from_json(content: &str, dialect: SchemaDialect) -> Result<Self, SchemaError> {
        let raw: Value = serde_json::from_str(content)?;
        parse_as(&raw, dialect)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
