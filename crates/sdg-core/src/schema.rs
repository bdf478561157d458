//! Blueprint definitions for synthetic data generation.
//!
//! A [`Blueprint`] is the normalized form of an input schema. Both input
//! dialects (engine mappings and template documents) parse into the same
//! tree, which the hydrator in `sdg-generator` then binds to generators.
//!
//! ## Node Hierarchy
//!
//! - `Static` - a literal copied verbatim into every document
//! - `Generator` - a leaf naming a generator kind plus its params; OBJECT and
//!   NESTED generators carry a nested `fields` blueprint
//! - `Container` - a field group from a template document
//! - `Sequence` - an array from a template document holding placeholders
//!
//! Field order is preserved everywhere so generated documents have a stable
//! key order.

use crate::types::{kind_for_engine_type, GeneratorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema parsing and blueprint operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading a schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Input matches neither the mapping nor the template dialect
    #[error("Unrecognized schema: {0}")]
    UnrecognizedSchema(String),

    /// Placeholder token does not follow `{{NAME(key=value,...)}}`
    #[error("Invalid template placeholder: {token}")]
    TemplateSyntax { token: String },

    /// Mapping declares an engine type with no generator
    #[error("Unsupported field type '{field_type}' for field '{field}'")]
    UnsupportedFieldType { field: String, field_type: String },

    /// Mapping field has neither `type` nor `properties`
    #[error("Field '{field}' declares no type")]
    MissingFieldType { field: String },

    /// Generator kind not present in the catalog
    #[error("Unknown generator kind: {0}")]
    UnknownGeneratorKind(String),

    /// Dotted field path does not exist in the blueprint
    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

// ============================================================================
// Blueprint Types
// ============================================================================

/// An ordered set of named blueprint nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blueprint {
    fields: Vec<BlueprintField>,
}

/// A named node inside a [`Blueprint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintField {
    pub name: String,
    pub node: BlueprintNode,
}

/// One node of the blueprint tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum BlueprintNode {
    /// Literal value copied into every document.
    Static { value: Value },
    /// Leaf or composite bound to a generator kind.
    Generator(GeneratorSpec),
    /// Field group whose children contain generators.
    Container { fields: Blueprint },
    /// Array whose items contain generators.
    Sequence { items: Vec<BlueprintNode> },
}

/// Declaration of a generator leaf.
///
/// `kind` is kept as written so that kinds missing from the catalog can be
/// reported by the hydrator. The parsers only emit canonical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,

    /// Sub-fields for OBJECT and NESTED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Blueprint>,

    /// Engine type the leaf was parsed from, when it came from a mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_type: Option<String>,
}

impl GeneratorSpec {
    /// Create a leaf for `kind` with no params.
    pub fn new(kind: GeneratorKind) -> Self {
        Self {
            kind: kind.name().to_string(),
            params: Map::new(),
            fields: None,
            engine_type: None,
        }
    }

    /// Attach params.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Attach nested sub-fields.
    pub fn with_fields(mut self, fields: Blueprint) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Catalog entry for this leaf, if the kind is known.
    pub fn generator_kind(&self) -> Option<GeneratorKind> {
        self.kind.parse().ok()
    }
}

impl BlueprintNode {
    /// Static literal node.
    pub fn literal(value: impl Into<Value>) -> Self {
        BlueprintNode::Static {
            value: value.into(),
        }
    }

    /// Generator node.
    pub fn generator(spec: GeneratorSpec) -> Self {
        BlueprintNode::Generator(spec)
    }

    /// Nested field group of this node, if it has one.
    fn children_mut(&mut self) -> Option<&mut Blueprint> {
        match self {
            BlueprintNode::Container { fields } => Some(fields),
            BlueprintNode::Generator(spec) => spec.fields.as_mut(),
            _ => None,
        }
    }

    fn for_each_generator_mut(&mut self, f: &mut dyn FnMut(&mut GeneratorSpec)) {
        match self {
            BlueprintNode::Static { .. } => {}
            BlueprintNode::Generator(spec) => {
                if let Some(fields) = spec.fields.as_mut() {
                    fields.for_each_generator_mut(f);
                }
                f(spec);
            }
            BlueprintNode::Container { fields } => fields.for_each_generator_mut(f),
            BlueprintNode::Sequence { items } => {
                for item in items {
                    item.for_each_generator_mut(f);
                }
            }
        }
    }
}

impl Blueprint {
    /// Create an empty blueprint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping insertion order.
    pub fn push(&mut self, name: impl Into<String>, node: BlueprintNode) {
        self.fields.push(BlueprintField {
            name: name.into(),
            node,
        });
    }

    /// Builder form of [`Blueprint::push`].
    pub fn with_field(mut self, name: impl Into<String>, node: BlueprintNode) -> Self {
        self.push(name, node);
        self
    }

    /// Look up a top-level field by name.
    pub fn get(&self, name: &str) -> Option<&BlueprintNode> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.node)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut BlueprintNode> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .map(|f| &mut f.node)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &BlueprintField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve a dotted path (`user.address.city`) through containers and
    /// composite generators.
    pub fn node_at_path_mut(&mut self, path: &str) -> Option<&mut BlueprintNode> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut node = self.get_mut(first)?;
        for segment in segments {
            node = node.children_mut()?.get_mut(segment)?;
        }
        Some(node)
    }

    /// Visit every generator leaf, children before their composite parent.
    pub fn for_each_generator_mut(&mut self, f: &mut dyn FnMut(&mut GeneratorSpec)) {
        for field in &mut self.fields {
            field.node.for_each_generator_mut(f);
        }
    }

    /// Merge per-engine-type default params into matching leaves.
    ///
    /// Params already present on a leaf win over the defaults.
    pub fn apply_generator_defaults(&mut self, engine_type: &str, defaults: &Map<String, Value>) {
        self.for_each_generator_mut(&mut |spec| {
            if spec.engine_type.as_deref() == Some(engine_type) {
                for (key, value) in defaults {
                    spec.params
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        });
    }

    /// Replace the generator at `path` with `kind` and `params`.
    pub fn override_field(
        &mut self,
        path: &str,
        kind: GeneratorKind,
        params: Map<String, Value>,
    ) -> Result<(), SchemaError> {
        let node = self
            .node_at_path_mut(path)
            .ok_or_else(|| SchemaError::FieldNotFound(path.to_string()))?;

        let engine_type = match node {
            BlueprintNode::Generator(spec) => spec.engine_type.take(),
            _ => None,
        };
        let mut spec = GeneratorSpec::new(kind).with_params(params);
        spec.engine_type = engine_type;
        *node = BlueprintNode::Generator(spec);
        Ok(())
    }

    /// Write the blueprint back as an engine mapping (`{"properties": ...}`).
    ///
    /// Static literals and sequences have no mapping form and are skipped.
    pub fn to_mapping(&self) -> Value {
        let mut root = Map::new();
        root.insert("properties".to_string(), Value::Object(self.properties()));
        Value::Object(root)
    }

    fn properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        for field in &self.fields {
            let definition = match &field.node {
                BlueprintNode::Generator(spec) => spec.to_mapping_field(),
                BlueprintNode::Container { fields } => {
                    let mut def = Map::new();
                    def.insert("type".to_string(), Value::from("object"));
                    def.insert("properties".to_string(), Value::Object(fields.properties()));
                    Some(def)
                }
                BlueprintNode::Static { .. } | BlueprintNode::Sequence { .. } => None,
            };
            if let Some(def) = definition {
                properties.insert(field.name.clone(), Value::Object(def));
            }
        }
        properties
    }
}

impl GeneratorSpec {
    fn to_mapping_field(&self) -> Option<Map<String, Value>> {
        let kind = self.generator_kind()?;
        let engine_type = self
            .engine_type
            .clone()
            .filter(|t| kind_for_engine_type(t).is_some())
            .unwrap_or_else(|| kind.canonical_engine_type().to_string());

        let mut def = Map::new();
        def.insert("type".to_string(), Value::from(engine_type));
        for attribute in ["format", "analyzer"] {
            if let Some(value) = self.params.get(attribute) {
                def.insert(attribute.to_string(), value.clone());
            }
        }
        if let Some(fields) = &self.fields {
            def.insert("properties".to_string(), Value::Object(fields.properties()));
        }
        Some(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Blueprint {
        let address = Blueprint::new()
            .with_field("city", BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Keyword)))
            .with_field("zip", BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Integer)));
        Blueprint::new()
            .with_field("id", BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Integer)))
            .with_field("source", BlueprintNode::literal("static"))
            .with_field(
                "address",
                BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Object).with_fields(address)),
            )
    }

    #[test]
    fn test_field_order_preserved() {
        let names: Vec<_> = sample().iter().map(|f| f.name.clone()).collect();
        assert_eq!(names, vec!["id", "source", "address"]);
    }

    #[test]
    fn test_node_at_path() {
        let mut blueprint = sample();
        assert!(blueprint.node_at_path_mut("address.city").is_some());
        assert!(blueprint.node_at_path_mut("address.street").is_none());
        assert!(blueprint.node_at_path_mut("source.inner").is_none());
    }

    #[test]
    fn test_override_field() {
        let mut blueprint = sample();
        let mut params = Map::new();
        params.insert("choices".to_string(), json!(["Paris", "Oslo"]));
        blueprint
            .override_field("address.city", GeneratorKind::RandomChoice, params)
            .unwrap();

        let mut blueprint2 = blueprint.clone();
        match blueprint2.node_at_path_mut("address.city").unwrap() {
            BlueprintNode::Generator(spec) => {
                assert_eq!(spec.kind, "RANDOM_CHOICE");
                assert_eq!(spec.params["choices"], json!(["Paris", "Oslo"]));
            }
            other => panic!("unexpected node {other:?}"),
        }

        let err = blueprint
            .override_field("address.missing", GeneratorKind::Integer, Map::new())
            .unwrap_err();
        assert!(matches!(err, SchemaError::FieldNotFound(p) if p == "address.missing"));
    }

    #[test]
    fn test_generator_defaults_do_not_replace_leaf_params() {
        let mut spec = GeneratorSpec::new(GeneratorKind::Integer);
        spec.engine_type = Some("long".to_string());
        spec.params.insert("max".to_string(), json!(5));
        let mut blueprint = Blueprint::new().with_field("n", BlueprintNode::generator(spec));

        let mut defaults = Map::new();
        defaults.insert("min".to_string(), json!(1));
        defaults.insert("max".to_string(), json!(1000));
        blueprint.apply_generator_defaults("long", &defaults);

        match blueprint.get("n").unwrap() {
            BlueprintNode::Generator(spec) => {
                assert_eq!(spec.params["min"], json!(1));
                assert_eq!(spec.params["max"], json!(5));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_to_mapping_skips_static_fields() {
        let mapping = sample().to_mapping();
        assert_eq!(
            mapping,
            json!({
                "properties": {
                    "id": {"type": "long"},
                    "address": {
                        "type": "object",
                        "properties": {
                            "city": {"type": "keyword"},
                            "zip": {"type": "long"}
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_blueprint_serde() {
        let blueprint = sample();
        let json = serde_json::to_string(&blueprint).unwrap();
        let back: Blueprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blueprint);
    }
}
