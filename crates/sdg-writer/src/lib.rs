//! Size-bounded dataset writer.
//!
//! This crate drives bulk generation: it generates chunks of documents from a
//! hydrated blueprint on a worker pool and writes them as newline-delimited
//! JSON, rolling to a new file whenever the current one reaches the maximum
//! file size, until the estimated dataset size reaches the target.
//!
//! # Example
//!
//! ```ignore
//! use sdg_writer::{DatasetWriter, WriterOptions, ByteProgressBar};
//!
//! let writer = DatasetWriter::new(&hydrated, options);
//! let report = writer.generate_dataset(&mut ByteProgressBar::new())?;
//! println!("{} docs in {} files", report.docs_written, report.files.len());
//! ```

pub mod args;
pub mod error;
pub mod progress;
pub mod report;
pub mod writer;

pub use args::{GenerateArgs, SchemaSourceArgs};
pub use error::WriterError;
pub use progress::{format_size, ByteProgressBar, NoProgress, ProgressSink};
pub use report::{format_summary, write_run_record, RunRecord};
pub use writer::{
    generate_dataset, set_field, DatasetReport, DatasetWriter, FileDescriptor, WriterOptions,
};
