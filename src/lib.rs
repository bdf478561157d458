//! Synthetic Data Generator Library
//!
//! Generates size-bounded synthetic document datasets for benchmarking
//! search engines, from either an index mapping or a template document.
//!
//! # Features
//!
//! - Mapping and template schemas: `{"properties": ...}` exports or literal
//!   documents with `{{KIND(key=value,...)}}` placeholders
//! - YAML config: worker count, file size, chunk size, generator defaults
//!   per engine type and per-field generator overrides
//! - Size-bounded output: newline-delimited JSON files rolled at a maximum
//!   size, plus a `<index>_record.json` run record
//! - Time-series mode: disjoint timestamp windows per chunk
//! - Reproducible runs with `--seed`
//!
//! # Crates
//!
//! - `sdg_core` - Blueprint model, schema parsers, configuration
//! - `sdg_generator` - Generator registry, hydration, document synthesis
//! - `sdg_timeseries` - Timestamp window partitioning
//! - `sdg_writer` - Chunked, size-bounded dataset writer
//!
//! # CLI Usage
//!
//! ```bash
//! # 5 GB from an index mapping
//! sdg generate --index-name logs --index-mappings mapping.json \
//!   --output-path ./data --total-size-gb 5
//!
//! # Preview one document from a template
//! sdg generate --index-name logs --template-document template.json \
//!   --output-path ./data --total-size-gb 1 --test-document
//! ```

pub mod environment;
pub mod generate;

pub use generate::{generate_test_document, load_blueprint, load_config, run_generate};
