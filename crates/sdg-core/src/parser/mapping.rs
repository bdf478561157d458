//! Mapping dialect parser.
//!
//! Accepted shapes:
//!
//! ```text
//! {"properties": {...}}
//! {"mappings": {"properties": {...}}}
//! {"index_patterns": [...], "mappings": {"properties": {...}}}
//! {"template": {"mappings": {"properties": {...}}}}
//! {"<index>": {"mappings": {"properties": {...}}}}      (GET <index>/_mapping)
//! ```
//!
//! A field carrying `properties` becomes an OBJECT (or NESTED when its type
//! says so) whose sub-fields are parsed recursively. Every other field is
//! translated through the engine-type table.

use crate::schema::{Blueprint, BlueprintNode, GeneratorSpec, SchemaError};
use crate::types::{kind_for_engine_type, GeneratorKind};
use serde_json::{Map, Value};

/// Find the root `properties` object of a mapping document.
pub fn locate_properties(raw: &Value) -> Option<&Map<String, Value>> {
    let root = raw.as_object()?;

    if let Some(properties) = root.get("properties").and_then(Value::as_object) {
        return Some(properties);
    }
    if let Some(properties) = mappings_properties(root) {
        return Some(properties);
    }
    if let Some(template) = root.get("template").and_then(Value::as_object) {
        if let Some(properties) = mappings_properties(template) {
            return Some(properties);
        }
    }
    if root.len() == 1 {
        if let Some(index) = root.values().next().and_then(Value::as_object) {
            return mappings_properties(index);
        }
    }
    None
}

fn mappings_properties(object: &Map<String, Value>) -> Option<&Map<String, Value>> {
    object
        .get("mappings")
        .and_then(Value::as_object)
        .and_then(|m| m.get("properties"))
        .and_then(Value::as_object)
}

/// Parse a mapping document into a blueprint.
pub fn parse_mapping(raw: &Value) -> Result<Blueprint, SchemaError> {
    let properties = locate_properties(raw).ok_or_else(|| {
        SchemaError::UnrecognizedSchema(
            "neither a mapping (properties) nor an index template (mappings.properties)".to_string(),
        )
    })?;
    parse_properties(properties, "")
}

fn parse_properties(properties: &Map<String, Value>, prefix: &str) -> Result<Blueprint, SchemaError> {
    let mut blueprint = Blueprint::new();
    for (name, definition) in properties {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        let node = parse_field(definition, &path)?;
        blueprint.push(name.clone(), node);
    }
    Ok(blueprint)
}

fn parse_field(definition: &Value, path: &str) -> Result<BlueprintNode, SchemaError> {
    let definition = definition
        .as_object()
        .ok_or_else(|| SchemaError::MissingFieldType {
            field: path.to_string(),
        })?;
    let declared_type = definition.get("type").and_then(Value::as_str);

    if let Some(properties) = definition.get("properties").and_then(Value::as_object) {
        let kind = match declared_type {
            Some("nested") => GeneratorKind::Nested,
            Some("object") | None => GeneratorKind::Object,
            Some(other) => {
                return Err(SchemaError::UnsupportedFieldType {
                    field: path.to_string(),
                    field_type: other.to_string(),
                })
            }
        };
        let mut spec = GeneratorSpec::new(kind).with_fields(parse_properties(properties, path)?);
        spec.engine_type = Some(declared_type.unwrap_or("object").to_string());
        return Ok(BlueprintNode::Generator(spec));
    }

    let field_type = declared_type.ok_or_else(|| SchemaError::MissingFieldType {
        field: path.to_string(),
    })?;
    let kind = kind_for_engine_type(field_type).ok_or_else(|| SchemaError::UnsupportedFieldType {
        field: path.to_string(),
        field_type: field_type.to_string(),
    })?;

    let mut spec = GeneratorSpec::new(kind);
    spec.engine_type = Some(field_type.to_string());
    if kind.is_composite() {
        spec.fields = Some(Blueprint::new());
    }

    match kind {
        GeneratorKind::Date | GeneratorKind::DateRange => {
            copy_attribute(definition, "format", &mut spec.params);
        }
        GeneratorKind::Text => {
            copy_attribute(definition, "analyzer", &mut spec.params);
        }
        _ => {}
    }

    Ok(BlueprintNode::Generator(spec))
}

fn copy_attribute(definition: &Map<String, Value>, name: &str, params: &mut Map<String, Value>) {
    if let Some(value) = definition.get(name) {
        params.insert(name.to_string(), value.clone());
    }
}
