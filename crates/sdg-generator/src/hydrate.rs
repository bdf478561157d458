//! Blueprint hydration.
//!
//! Hydration walks a [`Blueprint`] once and replaces every generator leaf
//! with a [`BoundGenerator`]: its kind plus fully resolved params. OBJECT and
//! NESTED sub-fields are hydrated first, so document generation never looks
//! anything up again.
//!
//! ```text
//! Blueprint                          HydratedBlueprint
//!   id:    Generator(INTEGER)   ──▶    id:    Bound(Integer{1,5})
//!   name:  Static("x")          ──▶    name:  Static("x")
//!   user:  Generator(OBJECT)    ──▶    user:  Bound(Object{fields: hydrated})
//! ```
//!
//! Every failure (unknown kind, bad params, unsupported formats) surfaces
//! here, before any document is produced.

use crate::error::HydrationError;
use crate::generators::ResolvedParams;
use crate::params::{check_object_params, resolve_leaf, resolve_num_of_objs};
use sdg_core::{Blueprint, BlueprintNode, GeneratorKind, GeneratorSpec};
use serde_json::Value;

/// A blueprint whose generator leaves are bound and ready for reuse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydratedBlueprint {
    fields: Vec<(String, HydratedNode)>,
}

/// One node of a hydrated blueprint.
#[derive(Debug, Clone, PartialEq)]
pub enum HydratedNode {
    Static(Value),
    Bound(BoundGenerator),
    Container(HydratedBlueprint),
    Sequence(Vec<HydratedNode>),
}

/// A generator kind bound to its resolved params.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundGenerator {
    pub kind: GeneratorKind,
    pub params: ResolvedParams,
}

impl HydratedBlueprint {
    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &HydratedNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Look up a top-level field.
    pub fn get(&self, name: &str) -> Option<&HydratedNode> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of bound generators, including those inside composites.
    pub fn generator_count(&self) -> usize {
        self.fields.iter().map(|(_, node)| node.generator_count()).sum()
    }
}

impl HydratedNode {
    fn generator_count(&self) -> usize {
        match self {
            HydratedNode::Static(_) => 0,
            HydratedNode::Bound(bound) => {
                1 + match &bound.params {
                    ResolvedParams::Object { fields } | ResolvedParams::Nested { fields, .. } => {
                        fields.generator_count()
                    }
                    _ => 0,
                }
            }
            HydratedNode::Container(fields) => fields.generator_count(),
            HydratedNode::Sequence(items) => items.iter().map(HydratedNode::generator_count).sum(),
        }
    }
}

/// Hydrate a blueprint.
pub fn hydrate(blueprint: &Blueprint) -> Result<HydratedBlueprint, HydrationError> {
    let fields = blueprint
        .iter()
        .map(|field| Ok((field.name.clone(), hydrate_node(&field.node)?)))
        .collect::<Result<Vec<_>, HydrationError>>()?;
    Ok(HydratedBlueprint { fields })
}

fn hydrate_node(node: &BlueprintNode) -> Result<HydratedNode, HydrationError> {
    match node {
        BlueprintNode::Static { value } => Ok(HydratedNode::Static(value.clone())),
        BlueprintNode::Generator(spec) => Ok(HydratedNode::Bound(bind(spec)?)),
        BlueprintNode::Container { fields } => Ok(HydratedNode::Container(hydrate(fields)?)),
        BlueprintNode::Sequence { items } => Ok(HydratedNode::Sequence(
            items.iter().map(hydrate_node).collect::<Result<_, _>>()?,
        )),
    }
}

fn bind(spec: &GeneratorSpec) -> Result<BoundGenerator, HydrationError> {
    let kind = spec
        .generator_kind()
        .ok_or_else(|| HydrationError::UnknownGeneratorKind(spec.kind.clone()))?;

    let params = match kind {
        GeneratorKind::Object => {
            check_object_params(&spec.params)?;
            ResolvedParams::Object {
                fields: hydrate_fields(kind, spec)?,
            }
        }
        GeneratorKind::Nested => {
            let num_of_objs = resolve_num_of_objs(&spec.params)?;
            ResolvedParams::Nested {
                fields: hydrate_fields(kind, spec)?,
                num_of_objs,
            }
        }
        _ => resolve_leaf(kind, &spec.params)?,
    };

    Ok(BoundGenerator { kind, params })
}

fn hydrate_fields(kind: GeneratorKind, spec: &GeneratorSpec) -> Result<HydratedBlueprint, HydrationError> {
    let fields = spec
        .fields
        .as_ref()
        .ok_or(HydrationError::MissingFields(kind))?;
    hydrate(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdg_core::parser::parse;
    use serde_json::{json, Map};

    #[test]
    fn test_hydrate_template() {
        let blueprint = parse(&json!({
            "id": "{{INTEGER(min=1,max=5)}}",
            "name": "static",
            "user": {"ip": "{{IP_ADDRESS(format=ipv6)}}"}
        }))
        .unwrap();
        let hydrated = hydrate(&blueprint).unwrap();

        assert_eq!(hydrated.len(), 3);
        assert_eq!(hydrated.generator_count(), 2);
        match hydrated.get("id").unwrap() {
            HydratedNode::Bound(bound) => {
                assert_eq!(bound.kind, GeneratorKind::Integer);
                assert_eq!(bound.params, ResolvedParams::Integer { min: 1, max: 5 });
            }
            other => panic!("unexpected node {other:?}"),
        }
        assert_eq!(
            hydrated.get("name"),
            Some(&HydratedNode::Static(json!("static")))
        );
        assert!(matches!(hydrated.get("user"), Some(HydratedNode::Container(_))));
    }

    #[test]
    fn test_hydrate_mapping_composites() {
        let blueprint = parse(&json!({
            "properties": {
                "comments": {
                    "type": "nested",
                    "properties": {"author": {"type": "keyword"}}
                },
                "user": {"properties": {"age": {"type": "integer"}}}
            }
        }))
        .unwrap();
        let hydrated = hydrate(&blueprint).unwrap();

        match hydrated.get("comments").unwrap() {
            HydratedNode::Bound(BoundGenerator {
                params: ResolvedParams::Nested { fields, num_of_objs },
                ..
            }) => {
                assert_eq!(*num_of_objs, None);
                assert!(fields.get("author").is_some());
            }
            other => panic!("unexpected node {other:?}"),
        }
        assert_eq!(hydrated.generator_count(), 4);
    }

    #[test]
    fn test_unknown_kind_fails_at_hydration() {
        let spec = GeneratorSpec {
            kind: "SHOE_SIZE".to_string(),
            params: Map::new(),
            fields: None,
            engine_type: None,
        };
        let blueprint = Blueprint::new().with_field("size", BlueprintNode::Generator(spec));

        let err = hydrate(&blueprint).unwrap_err();
        assert!(matches!(err, HydrationError::UnknownGeneratorKind(k) if k == "SHOE_SIZE"));
    }

    #[test]
    fn test_unknown_kind_inside_composite() {
        let inner = Blueprint::new().with_field(
            "x",
            BlueprintNode::Generator(GeneratorSpec {
                kind: "MYSTERY".to_string(),
                params: Map::new(),
                fields: None,
                engine_type: None,
            }),
        );
        let blueprint = Blueprint::new().with_field(
            "outer",
            BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Nested).with_fields(inner)),
        );
        assert!(matches!(
            hydrate(&blueprint).unwrap_err(),
            HydrationError::UnknownGeneratorKind(_)
        ));
    }

    #[test]
    fn test_composite_without_fields() {
        let blueprint = Blueprint::new().with_field(
            "obj",
            BlueprintNode::generator(GeneratorSpec::new(GeneratorKind::Object)),
        );
        assert!(matches!(
            hydrate(&blueprint).unwrap_err(),
            HydrationError::MissingFields(GeneratorKind::Object)
        ));
    }

    #[test]
    fn test_hydration_is_deterministic() {
        let blueprint = parse(&json!({"a": "{{FLOAT(min=1.5,max=2.5)}}", "b": [1, "{{BOOLEAN()}}"]})).unwrap();
        assert_eq!(hydrate(&blueprint).unwrap(), hydrate(&blueprint).unwrap());
    }
}
