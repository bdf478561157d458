//! Size-bounded NDJSON dataset writer.
//!
//! Chunks are generated in rounds on a worker pool and gathered back in
//! worker order; only the coordinating thread ever opens an output file, so
//! lines from different chunks never interleave. Progress and termination
//! follow an estimate (chunk documents times the average document size),
//! while file rolling follows the real on-disk size.

use crate::error::WriterError;
use crate::progress::{NoProgress, ProgressSink};
use rayon::prelude::*;
use sdg_core::{Settings, TimeseriesConfig};
use sdg_generator::{chunk_seed, DocumentGenerator, HydratedBlueprint};
use sdg_timeseries::{
    generate_timestamps_from_window, Frequency, TimeSeriesPartitioner, TimestampWindow, Windows,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for NDJSON writing.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Options for one dataset run.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Directory the files are created in; created if missing.
    pub output_dir: PathBuf,
    /// Prefix of every output file name.
    pub index_name: String,
    pub target_total_bytes: u64,
    pub max_file_bytes: u64,
    /// Documents per chunk (and per timestamp window in time-series mode).
    pub chunk_size: usize,
    /// Chunks generated in parallel per round.
    pub workers: usize,
    /// Base seed every chunk seed is derived from.
    pub seed: u64,
    pub timeseries: Option<TimeseriesConfig>,
}

impl WriterOptions {
    /// Options taken from generation settings.
    pub fn from_settings(
        settings: &Settings,
        output_dir: impl Into<PathBuf>,
        index_name: impl Into<String>,
        target_total_bytes: u64,
        seed: u64,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            index_name: index_name.into(),
            target_total_bytes,
            max_file_bytes: settings.max_file_bytes(),
            chunk_size: settings.chunk_size,
            workers: settings.workers,
            seed,
            timeseries: None,
        }
    }

    pub fn with_timeseries(mut self, timeseries: Option<TimeseriesConfig>) -> Self {
        self.timeseries = timeseries;
        self
    }

    fn validate(&self) -> Result<(), WriterError> {
        if self.chunk_size == 0 {
            return Err(invalid_option("chunk_size", "must be at least 1"));
        }
        if self.workers == 0 {
            return Err(invalid_option("workers", "must be at least 1"));
        }
        if self.max_file_bytes == 0 {
            return Err(invalid_option("max_file_bytes", "must be at least 1"));
        }
        if self.index_name.is_empty() || self.index_name.contains(['/', '\\']) {
            return Err(invalid_option(
                "index_name",
                "must be non-empty and contain no path separators",
            ));
        }
        Ok(())
    }
}

fn invalid_option(name: &'static str, reason: &str) -> WriterError {
    WriterError::InvalidOption {
        name,
        reason: reason.to_string(),
    }
}

/// One completed output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub file_name: String,
    #[serde(rename = "docs")]
    pub doc_count: u64,
    pub file_size_bytes: u64,
}

/// Outcome of a dataset run.
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub files: Vec<FileDescriptor>,
    pub docs_written: u64,
    /// Running total of estimated bytes; the value termination was decided on.
    pub estimated_bytes: u64,
    pub avg_document_size: u64,
    pub elapsed: Duration,
}

impl DatasetReport {
    /// Sum of on-disk file sizes.
    pub fn bytes_on_disk(&self) -> u64 {
        self.files.iter().map(|f| f.file_size_bytes).sum()
    }

    pub fn docs_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.docs_written as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Generate a dataset without progress reporting.
pub fn generate_dataset(
    blueprint: &HydratedBlueprint,
    options: WriterOptions,
) -> Result<DatasetReport, WriterError> {
    DatasetWriter::new(blueprint, options).generate_dataset(&mut NoProgress)
}

/// Writes generated documents into size-bounded NDJSON files.
pub struct DatasetWriter<'a> {
    blueprint: &'a HydratedBlueprint,
    options: WriterOptions,
}

/// Work for one chunk of a round.
#[derive(Debug, Clone, Copy)]
struct ChunkTask {
    seed: u64,
    window: Option<TimestampWindow>,
}

/// A generated chunk, already serialized as NDJSON lines.
struct EncodedChunk {
    docs: u64,
    bytes: Vec<u8>,
}

/// Time-series settings resolved for the run.
struct TimeseriesPlan {
    windows: Windows,
    frequency: Frequency,
    field: String,
    format: String,
    consumed: u64,
}

impl<'a> DatasetWriter<'a> {
    pub fn new(blueprint: &'a HydratedBlueprint, options: WriterOptions) -> Self {
        Self { blueprint, options }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Serialized size of one sample document plus its newline.
    pub fn estimate_document_size(&self) -> Result<u64, WriterError> {
        let sample = DocumentGenerator::new(self.blueprint, self.options.seed).next_document()?;
        Ok(serde_json::to_vec(&sample)?.len() as u64 + 1)
    }

    /// Generate chunks until the estimated total reaches the target.
    pub fn generate_dataset(
        &self,
        progress: &mut dyn ProgressSink,
    ) -> Result<DatasetReport, WriterError> {
        let options = &self.options;
        options.validate()?;
        let start_time = Instant::now();
        fs::create_dir_all(&options.output_dir)?;

        let avg_document_size = self.estimate_document_size()?;
        let chunk_bytes = options.chunk_size as u64 * avg_document_size;
        info!("Average document size in bytes: {}", avg_document_size);
        info!("Chunk size: {} docs", options.chunk_size);
        info!(
            "Target size: {} bytes, max file size: {} bytes, workers: {}",
            options.target_total_bytes, options.max_file_bytes, options.workers
        );

        let mut timeseries = match &options.timeseries {
            Some(config) => {
                let partitioner = TimeSeriesPartitioner::new(
                    config,
                    options.chunk_size as u64,
                    avg_document_size,
                    options.target_total_bytes,
                )?;
                let windows = partitioner.generate_windows()?;
                info!(
                    "Time-series field '{}': {} windows at frequency '{}'",
                    config.field,
                    windows.len(),
                    windows.frequency()
                );
                Some(TimeseriesPlan {
                    frequency: windows.frequency(),
                    windows,
                    field: config.field.clone(),
                    format: config.format.clone(),
                    consumed: 0,
                })
            }
            None => None,
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.workers)
            .build()
            .map_err(|e| WriterError::ThreadPool(e.to_string()))?;

        let mut sink = FileSink::new(&options.output_dir, &options.index_name, options.max_file_bytes);
        let mut estimated_bytes = 0u64;
        let mut docs_written = 0u64;
        let mut round = 0u64;
        progress.start(options.target_total_bytes);

        'rounds: while estimated_bytes < options.target_total_bytes {
            let remaining = options.target_total_bytes - estimated_bytes;
            let chunks_needed = remaining.div_ceil(chunk_bytes.max(1));
            let round_size = chunks_needed.min(options.workers as u64);

            let mut tasks = Vec::with_capacity(round_size as usize);
            for worker in 0..round_size {
                let window = match timeseries.as_mut() {
                    Some(plan) => match plan.windows.next() {
                        Some(window) => {
                            plan.consumed += 1;
                            Some(window)
                        }
                        None => break,
                    },
                    None => None,
                };
                tasks.push(ChunkTask {
                    seed: chunk_seed(options.seed, round, worker),
                    window,
                });
            }
            if tasks.is_empty() {
                let windows = timeseries.as_ref().map_or(0, |plan| plan.consumed);
                return Err(WriterError::WindowsExhausted { windows });
            }

            let generation_start = Instant::now();
            let plan = timeseries.as_ref();
            let chunks = pool.install(|| {
                tasks
                    .par_iter()
                    .map(|task| self.build_chunk(task, plan))
                    .collect::<Result<Vec<_>, WriterError>>()
            })?;
            let generation_time = generation_start.elapsed();

            let writing_start = Instant::now();
            for chunk in chunks {
                sink.append(&chunk)?;
                let written = chunk.docs * avg_document_size;
                estimated_bytes += written;
                docs_written += chunk.docs;
                progress.advance(written);

                if estimated_bytes >= options.target_total_bytes {
                    debug!("Round {} reached the target size", round);
                    break 'rounds;
                }
            }
            debug!(
                "Round {}: generating took {:?}, writing took {:?}",
                round,
                generation_time,
                writing_start.elapsed()
            );
            round += 1;
        }

        let files = sink.finish()?;
        progress.finish();

        let report = DatasetReport {
            files,
            docs_written,
            estimated_bytes,
            avg_document_size,
            elapsed: start_time.elapsed(),
        };
        info!(
            "Generated {} docs in {} files ({} bytes on disk) in {:?}",
            report.docs_written,
            report.files.len(),
            report.bytes_on_disk(),
            report.elapsed
        );
        Ok(report)
    }

    fn build_chunk(
        &self,
        task: &ChunkTask,
        timeseries: Option<&TimeseriesPlan>,
    ) -> Result<EncodedChunk, WriterError> {
        let mut generator = DocumentGenerator::new(self.blueprint, task.seed);
        let mut bytes = Vec::with_capacity(DEFAULT_BUFFER_SIZE);
        let mut docs = 0u64;

        match (task.window, timeseries) {
            (Some(window), Some(plan)) => {
                let stamps = generate_timestamps_from_window(&window, plan.frequency, &plan.format)?;
                for stamp in stamps.iter() {
                    let mut document = generator.next_document()?;
                    set_field(&mut document, &plan.field, stamp);
                    encode_line(&mut bytes, &document)?;
                    docs += 1;
                }
            }
            _ => {
                for document in generator.documents(self.options.chunk_size as u64) {
                    encode_line(&mut bytes, &document?)?;
                    docs += 1;
                }
            }
        }

        Ok(EncodedChunk { docs, bytes })
    }
}

fn encode_line(buffer: &mut Vec<u8>, document: &Value) -> Result<(), WriterError> {
    serde_json::to_writer(&mut *buffer, document)?;
    buffer.push(b'\n');
    Ok(())
}

/// Set the value at a dotted path, creating intermediate objects.
pub fn set_field(document: &mut Value, path: &str, value: Value) {
    let mut current = document;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// The file currently being appended to.
struct OpenFile {
    file_name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    docs: u64,
    size: u64,
}

/// Owns the output files and decides when to roll.
struct FileSink {
    output_dir: PathBuf,
    index_name: String,
    max_file_bytes: u64,
    next_counter: u64,
    current: Option<OpenFile>,
    completed: Vec<FileDescriptor>,
}

impl FileSink {
    fn new(output_dir: &Path, index_name: &str, max_file_bytes: u64) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            index_name: index_name.to_string(),
            max_file_bytes,
            next_counter: 0,
            current: None,
            completed: Vec::new(),
        }
    }

    fn append(&mut self, chunk: &EncodedChunk) -> Result<(), WriterError> {
        let incoming = chunk.bytes.len() as u64;
        let would_overflow = self
            .current
            .as_ref()
            .is_some_and(|file| file.size > 0 && file.size + incoming > self.max_file_bytes);
        if would_overflow {
            self.close_current()?;
        }

        let max_file_bytes = self.max_file_bytes;
        let file = self.open_if_needed()?;
        file.writer.write_all(&chunk.bytes)?;
        file.writer.flush()?;
        file.docs += chunk.docs;
        file.size = fs::metadata(&file.path)?.len();
        let full = file.size >= max_file_bytes;

        if full {
            self.close_current()?;
        }
        Ok(())
    }

    fn open_if_needed(&mut self) -> Result<&mut OpenFile, WriterError> {
        if self.current.is_none() {
            let file_name = format!("{}_{}.json", self.index_name, self.next_counter);
            let path = self.output_dir.join(&file_name);
            self.next_counter += 1;
            debug!("Opening output file {}", path.display());
            let writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, File::create(&path)?);
            self.current = Some(OpenFile {
                file_name,
                path,
                writer,
                docs: 0,
                size: 0,
            });
        }
        self.current
            .as_mut()
            .ok_or_else(|| WriterError::Io(std::io::Error::other("output file not open")))
    }

    fn close_current(&mut self) -> Result<(), WriterError> {
        if let Some(mut file) = self.current.take() {
            file.writer.flush()?;
            drop(file.writer);
            let file_size_bytes = fs::metadata(&file.path)?.len();
            info!(
                "Completed {} ({} docs, {} bytes)",
                file.file_name, file.docs, file_size_bytes
            );
            self.completed.push(FileDescriptor {
                file_name: file.file_name,
                doc_count: file.docs,
                file_size_bytes,
            });
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<FileDescriptor>, WriterError> {
        self.close_current()?;
        Ok(self.completed)
    }
}
