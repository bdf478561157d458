//! Template dialect parser.
//!
//! A template is an example document. String values of the form
//! `{{KIND(key=value,...)}}` become generator leaves; everything else is kept
//! as a static literal. Objects and arrays are walked so placeholders may sit
//! at any depth.
//!
//! Parameter values are coerced in order: integer, float, boolean
//! (`true`/`false`, any case), then string.

use crate::parser::json_type_name;
use crate::schema::{Blueprint, BlueprintNode, GeneratorSpec, SchemaError};
use crate::types::GeneratorKind;
use serde_json::{Map, Number, Value};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Parse a template document into a blueprint.
pub fn parse_template(raw: &Value) -> Result<Blueprint, SchemaError> {
    let document = raw.as_object().ok_or_else(|| {
        SchemaError::UnrecognizedSchema(format!(
            "template must be a JSON object, found {}",
            json_type_name(raw)
        ))
    })?;
    parse_object(document)
}

fn parse_object(object: &Map<String, Value>) -> Result<Blueprint, SchemaError> {
    let mut blueprint = Blueprint::new();
    for (name, value) in object {
        blueprint.push(name.clone(), parse_value(value)?);
    }
    Ok(blueprint)
}

fn parse_value(value: &Value) -> Result<BlueprintNode, SchemaError> {
    match value {
        Value::String(s) if is_placeholder(s) => Ok(BlueprintNode::Generator(parse_placeholder(s)?)),
        Value::Object(map) if contains_placeholder(value) => Ok(BlueprintNode::Container {
            fields: parse_object(map)?,
        }),
        Value::Array(items) if contains_placeholder(value) => Ok(BlueprintNode::Sequence {
            items: items.iter().map(parse_value).collect::<Result<_, _>>()?,
        }),
        other => Ok(BlueprintNode::Static {
            value: other.clone(),
        }),
    }
}

fn is_placeholder(s: &str) -> bool {
    s.starts_with(OPEN) && s.ends_with(CLOSE)
}

fn contains_placeholder(value: &Value) -> bool {
    match value {
        Value::String(s) => is_placeholder(s),
        Value::Array(items) => items.iter().any(contains_placeholder),
        Value::Object(map) => map.values().any(contains_placeholder),
        _ => false,
    }
}

/// Parse one `{{KIND(params)}}` token.
pub fn parse_placeholder(token: &str) -> Result<GeneratorSpec, SchemaError> {
    let syntax_error = || SchemaError::TemplateSyntax {
        token: token.to_string(),
    };

    let inner = token
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(syntax_error)?;

    let open_paren = inner.find('(').ok_or_else(syntax_error)?;
    let name = &inner[..open_paren];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(syntax_error());
    }
    let params_str = inner[open_paren + 1..]
        .strip_suffix(')')
        .ok_or_else(syntax_error)?;

    let kind: GeneratorKind = name
        .parse()
        .map_err(|_| SchemaError::UnknownGeneratorKind(name.to_string()))?;

    let mut params = Map::new();
    if !params_str.trim().is_empty() {
        for segment in params_str.split(',') {
            let (key, value) = segment.split_once('=').ok_or_else(syntax_error)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(syntax_error());
            }
            params.insert(key.to_string(), coerce_param(value.trim()));
        }
    }

    Ok(GeneratorSpec::new(kind).with_params(params))
}

/// Coerce a raw parameter string into a JSON value.
pub fn coerce_param(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(raw.to_string())
}
