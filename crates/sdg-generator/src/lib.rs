//! Document generator for synthetic datasets.
//!
//! This crate turns a parsed [`sdg_core::Blueprint`] into documents. A
//! blueprint is hydrated once; the hydrated form is then reused for every
//! document, and all randomness comes from a caller-supplied seed.
//!
//! # Architecture
//!
//! ```text
//! Blueprint (sdg-core)
//!        │
//!        ▼  hydrate()
//! ┌──────────────────────┐
//! │  HydratedBlueprint   │
//! │                      │
//! │  - Static values     │
//! │  - BoundGenerator    │
//! │    (kind + params)   │
//! └──────────┬───────────┘
//!            │  DocumentGenerator (seed, StdRng, index)
//!            ▼
//!      serde_json::Value documents
//! ```
//!
//! # Example
//!
//! ```rust
//! use sdg_core::parser::parse;
//! use sdg_generator::{generate_chunk, hydrate};
//! use serde_json::json;
//!
//! let blueprint = parse(&json!({"id": "{{INTEGER(min=1,max=5)}}", "name": "static"})).unwrap();
//! let hydrated = hydrate(&blueprint).unwrap();
//! let docs = generate_chunk(&hydrated, 10, 42).unwrap();
//! assert_eq!(docs.len(), 10);
//! ```
//!
//! # Generators
//!
//! - `INTEGER`, `FLOAT` - Random numbers in `[min, max]`
//! - `BOOLEAN` - Uniform boolean
//! - `DATE`, `TIMESTAMP` - Dates in a window, rendered in an allowed format
//! - `IP_ADDRESS` - IPv4 or IPv6 address
//! - `KEYWORD`, `TEXT` - Words and sentences, or picks from given choices
//! - `OBJECT`, `NESTED` - Sub-documents built from nested fields
//! - `GEO_POINT` - `{lat, lon}`
//! - `STATUS_CODE`, `CURRENCY` - HTTP codes and `"<amount> <code>"` strings
//! - `INTEGER_RANGE`, `FLOAT_RANGE`, `IP_RANGE`, `DATE_RANGE` - `{gte, lte}` pairs
//! - `UUID` - UUID v4 from the seeded RNG
//! - `RANDOM_CHOICE` - Pick from `elements`

pub mod error;
pub mod generator;
pub mod generators;
pub mod hydrate;
mod params;
pub mod seed;

// Re-exports for convenience
pub use error::{GenerationError, HydrationError};
pub use generator::{generate_chunk, generate_document, DocumentGenerator, DocumentIterator};
pub use generators::ResolvedParams;
pub use hydrate::{hydrate, BoundGenerator, HydratedBlueprint, HydratedNode};
pub use seed::{chunk_seed, entropy_seed};
