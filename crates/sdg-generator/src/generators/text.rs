//! String value generators backed by `fake` lorem words.

use crate::error::GenerationError;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use rand::Rng;
use sdg_core::GeneratorKind;
use serde_json::Value;

/// Generate a keyword: a pick from `choices`, or a fresh word.
pub fn generate_keyword<R: Rng>(
    rng: &mut R,
    choices: Option<&[Value]>,
) -> Result<Value, GenerationError> {
    match choices {
        Some(choices) => pick(rng, choices, GeneratorKind::Keyword),
        None => Ok(Value::String(Word().fake_with_rng(rng))),
    }
}

/// Generate prose, optionally prefixed by one `must_include` entry.
///
/// With `single_token` (keyword analyzer) a single word is produced instead.
pub fn generate_text<R: Rng>(rng: &mut R, must_include: &[String], single_token: bool) -> Value {
    let body: String = if single_token {
        Word().fake_with_rng(rng)
    } else {
        Sentence(5..15).fake_with_rng(rng)
    };
    if must_include.is_empty() {
        return Value::String(body);
    }
    let prefix = &must_include[rng.random_range(0..must_include.len())];
    Value::String(format!("{prefix} {body}"))
}

/// Pick one element uniformly.
pub fn generate_random_choice<R: Rng>(
    rng: &mut R,
    elements: &[Value],
) -> Result<Value, GenerationError> {
    pick(rng, elements, GeneratorKind::RandomChoice)
}

fn pick<R: Rng>(rng: &mut R, values: &[Value], kind: GeneratorKind) -> Result<Value, GenerationError> {
    if values.is_empty() {
        return Err(GenerationError::EmptyChoices(kind));
    }
    Ok(values[rng.random_range(0..values.len())].clone())
}
