//! Core types for synthetic data generation.
//!
//! This crate provides the schema-side half of the generator:
//!
//! - [`GeneratorKind`] - The closed catalog of generator kinds
//! - [`Blueprint`] - Normalized schema tree produced by the parsers
//! - [`parser`] - Mapping and template dialect parsers
//! - [`DateFormat`] - Date format allow-list
//! - [`SdgConfig`] - YAML generation config with overrides
//!
//! # Architecture
//!
//! ```text
//! sdg-core (this crate)
//!    │
//!    ├─── sdg-generator   (hydrates blueprints, synthesizes documents)
//!    ├─── sdg-timeseries  (timestamp windows, uses DateFormat)
//!    └─── sdg-writer      (size-bounded NDJSON output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sdg_core::parser::parse;
//! use serde_json::json;
//!
//! let blueprint = parse(&json!({
//!     "id": "{{INTEGER(min=1,max=5)}}",
//!     "name": "static"
//! }))
//! .unwrap();
//! assert_eq!(blueprint.len(), 2);
//! ```

pub mod config;
pub mod formats;
pub mod parser;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use config::{ConfigError, FieldOverride, SdgConfig, Settings, TimeseriesConfig};
pub use formats::DateFormat;
pub use parser::SchemaDialect;
pub use schema::{Blueprint, BlueprintField, BlueprintNode, GeneratorSpec, SchemaError};
pub use types::{kind_for_engine_type, GeneratorKind};
