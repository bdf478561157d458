//! Error types for hydration and document generation.

use sdg_core::GeneratorKind;
use thiserror::Error;

/// Errors raised while binding a blueprint to generators.
#[derive(Error, Debug)]
pub enum HydrationError {
    /// Kind has no registry entry.
    #[error("Unknown generator kind: {0}")]
    UnknownGeneratorKind(String),

    /// Parameter is not accepted, missing or has the wrong shape.
    #[error("Invalid parameter '{name}' for {kind}: {reason}")]
    InvalidParameter {
        kind: GeneratorKind,
        name: String,
        reason: String,
    },

    /// Date format outside the allow-list.
    #[error("Unsupported date format '{0}'")]
    UnsupportedFormat(String),

    /// OBJECT or NESTED declared without sub-fields.
    #[error("{0} generator declared without fields")]
    MissingFields(GeneratorKind),
}

impl HydrationError {
    pub(crate) fn invalid(kind: GeneratorKind, name: &str, reason: impl Into<String>) -> Self {
        HydrationError::InvalidParameter {
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a generator while synthesizing a document.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Choice list resolved to nothing to pick from.
    #[error("{0} has no values to choose from")]
    EmptyChoices(GeneratorKind),

    /// Date arithmetic left the representable range.
    #[error("{kind} produced a date outside the representable range")]
    DateOutOfRange { kind: GeneratorKind },
}
