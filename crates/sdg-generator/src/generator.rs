//! Document synthesis from a hydrated blueprint.

use crate::error::GenerationError;
use crate::generators::generate_value;
use crate::hydrate::{HydratedBlueprint, HydratedNode};
use crate::seed::index_seed;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

impl HydratedBlueprint {
    /// Generate one document, drawing randomness from `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GenerationError> {
        let mut document = Map::with_capacity(self.len());
        for (name, node) in self.fields() {
            document.insert(name.to_string(), node.generate(rng)?);
        }
        Ok(Value::Object(document))
    }
}

impl HydratedNode {
    fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GenerationError> {
        match self {
            HydratedNode::Static(value) => Ok(value.clone()),
            HydratedNode::Bound(bound) => generate_value(&bound.params, rng),
            HydratedNode::Container(fields) => fields.generate(rng),
            HydratedNode::Sequence(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(|item| item.generate(rng))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }
}

/// Generate one document.
pub fn generate_document<R: Rng>(
    blueprint: &HydratedBlueprint,
    rng: &mut R,
) -> Result<Value, GenerationError> {
    blueprint.generate(rng)
}

/// Generate `chunk_size` independent documents from `seed`.
pub fn generate_chunk(
    blueprint: &HydratedBlueprint,
    chunk_size: usize,
    seed: u64,
) -> Result<Vec<Value>, GenerationError> {
    DocumentGenerator::new(blueprint, seed)
        .documents(chunk_size as u64)
        .collect()
}

/// Document generator that produces deterministic documents.
///
/// The generator uses a seeded random number generator to ensure
/// reproducible results across runs with the same seed and blueprint.
pub struct DocumentGenerator<'a> {
    /// Hydrated blueprint shared by all documents
    blueprint: &'a HydratedBlueprint,
    /// Base seed the RNG was derived from
    seed: u64,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Current document index (for incremental generation)
    index: u64,
}

impl<'a> DocumentGenerator<'a> {
    /// Create a new document generator with the given blueprint and seed.
    pub fn new(blueprint: &'a HydratedBlueprint, seed: u64) -> Self {
        Self {
            blueprint,
            seed,
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    /// Set the starting index for document generation.
    ///
    /// Re-seeds the RNG from the base seed and the index so generation can
    /// resume at any point deterministically.
    pub fn with_start_index(mut self, index: u64) -> Self {
        self.index = index;
        self.rng = StdRng::seed_from_u64(index_seed(self.seed, index));
        self
    }

    /// Get the current document index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate the next document.
    pub fn next_document(&mut self) -> Result<Value, GenerationError> {
        let document = self.blueprint.generate(&mut self.rng)?;
        self.index += 1;
        Ok(document)
    }

    /// Lazily generate `count` documents.
    pub fn documents(&mut self, count: u64) -> DocumentIterator<'_, 'a> {
        DocumentIterator {
            generator: self,
            remaining: count,
        }
    }
}

/// Iterator that lazily generates documents.
pub struct DocumentIterator<'g, 'a> {
    generator: &'g mut DocumentGenerator<'a>,
    remaining: u64,
}

impl Iterator for DocumentIterator<'_, '_> {
    type Item = Result<Value, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_document())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DocumentIterator<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrate::hydrate;
    use sdg_core::parser::parse;
    use serde_json::json;

    fn hydrated(raw: Value) -> HydratedBlueprint {
        hydrate(&parse(&raw).unwrap()).unwrap()
    }

    #[test]
    fn test_template_end_to_end() {
        let blueprint = hydrated(json!({"id": "{{INTEGER(min=1,max=5)}}", "name": "static"}));

        for doc in generate_chunk(&blueprint, 1_000, 42).unwrap() {
            let id = doc["id"].as_i64().unwrap();
            assert!((1..=5).contains(&id));
            assert_eq!(doc["name"], json!("static"));
        }
    }

    #[test]
    fn test_field_order_follows_blueprint() {
        let blueprint = hydrated(json!({"z": 1, "a": "{{BOOLEAN()}}", "m": "{{UUID()}}"}));
        let doc = generate_chunk(&blueprint, 1, 1).unwrap().remove(0);
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_same_seed_same_documents() {
        let blueprint = hydrated(json!({
            "id": "{{INTEGER()}}",
            "word": "{{KEYWORD()}}",
            "text": "{{TEXT()}}",
            "fixed": {"k": [1, 2]}
        }));
        assert_eq!(
            generate_chunk(&blueprint, 50, 99).unwrap(),
            generate_chunk(&blueprint, 50, 99).unwrap()
        );
    }

    #[test]
    fn test_different_seeds_vary_only_generated_fields() {
        let blueprint = hydrated(json!({"id": "{{INTEGER(min=0,max=1000000)}}", "name": "static"}));
        let a = generate_chunk(&blueprint, 20, 1).unwrap();
        let b = generate_chunk(&blueprint, 20, 2).unwrap();
        assert_ne!(a, b);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x["name"], y["name"]);
        }
    }

    #[test]
    fn test_nested_with_fixed_count() {
        let blueprint = hydrated(json!({
            "properties": {
                "comments": {
                    "type": "nested",
                    "properties": {
                        "author": {"type": "keyword"},
                        "stars": {"type": "integer"}
                    }
                }
            }
        }));
        let mut blueprint_with_count = parse(&json!({
            "properties": {
                "comments": {
                    "type": "nested",
                    "properties": {
                        "author": {"type": "keyword"},
                        "stars": {"type": "integer"}
                    }
                }
            }
        }))
        .unwrap();
        if let Some(sdg_core::BlueprintNode::Generator(spec)) =
            blueprint_with_count.node_at_path_mut("comments")
        {
            spec.params.insert("num_of_objs".to_string(), json!(3));
        }
        let fixed = hydrate(&blueprint_with_count).unwrap();

        for doc in generate_chunk(&fixed, 100, 42).unwrap() {
            let comments = doc["comments"].as_array().unwrap();
            assert_eq!(comments.len(), 3);
            for comment in comments {
                let comment = comment.as_object().unwrap();
                assert!(comment.contains_key("author"));
                assert!(comment.contains_key("stars"));
            }
        }

        for doc in generate_chunk(&blueprint, 100, 42).unwrap() {
            let n = doc["comments"].as_array().unwrap().len();
            assert!((1..=5).contains(&n));
        }
    }

    #[test]
    fn test_object_and_sequence() {
        let blueprint = hydrated(json!({
            "user": {"name": "{{KEYWORD(choices=ann|bob)}}", "role": "admin"},
            "tags": ["fixed", "{{STATUS_CODE()}}"]
        }));
        let doc = generate_chunk(&blueprint, 1, 5).unwrap().remove(0);
        assert!(["ann", "bob"].contains(&doc["user"]["name"].as_str().unwrap()));
        assert_eq!(doc["user"]["role"], json!("admin"));
        assert_eq!(doc["tags"][0], json!("fixed"));
        assert!(doc["tags"][1].is_u64());
    }

    #[test]
    fn test_generation_error_propagates() {
        let blueprint = hydrated(json!({"pick": "{{RANDOM_CHOICE(elements=)}}"}));
        assert!(matches!(
            generate_chunk(&blueprint, 3, 1).unwrap_err(),
            GenerationError::EmptyChoices(_)
        ));
    }

    #[test]
    fn test_start_index_is_deterministic() {
        let blueprint = hydrated(json!({"id": "{{INTEGER(min=0,max=1000000)}}"}));
        let mut first = DocumentGenerator::new(&blueprint, 42).with_start_index(10);
        let mut second = DocumentGenerator::new(&blueprint, 42).with_start_index(10);
        assert_eq!(first.next_document().unwrap(), second.next_document().unwrap());
        assert_eq!(first.current_index(), 11);
    }

    #[test]
    fn test_documents_iterator_len() {
        let blueprint = hydrated(json!({"b": "{{BOOLEAN()}}"}));
        let mut generator = DocumentGenerator::new(&blueprint, 1);
        assert_eq!(generator.documents(7).len(), 7);
    }
}
