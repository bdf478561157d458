//! CLI argument definitions for dataset generation.

use clap::Args;
use std::path::PathBuf;

/// Where the schema comes from. Exactly one must be given.
#[derive(Args, Clone, Debug)]
#[group(required = true, multiple = false)]
pub struct SchemaSourceArgs {
    /// Path to an index mapping JSON file
    #[arg(long, short = 'm')]
    pub index_mappings: Option<PathBuf>,

    /// Path to a template document JSON file with {{KIND(...)}} placeholders
    #[arg(long, short = 't')]
    pub template_document: Option<PathBuf>,
}

/// Arguments of the `generate` command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Name used for output files and the run record
    #[arg(long, short = 'i')]
    pub index_name: String,

    #[command(flatten)]
    pub schema: SchemaSourceArgs,

    /// Directory the NDJSON files are written to
    #[arg(long, short = 'o', env = "SDG_OUTPUT_PATH")]
    pub output_path: PathBuf,

    /// Total dataset size to generate, in GB
    #[arg(long, short = 's')]
    pub total_size_gb: f64,

    /// Optional YAML generation config (settings and overrides)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Base seed for deterministic runs (time-derived when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print one generated document and exit without writing files
    #[arg(long, default_value = "false")]
    pub test_document: bool,

    /// Skip the free disk space check
    #[arg(long, default_value = "false")]
    pub skip_disk_check: bool,

    /// Hide the progress bar
    #[arg(long, default_value = "false")]
    pub no_progress: bool,
}

impl GenerateArgs {
    /// Requested dataset size in bytes (1 GB = 1024³ bytes).
    pub fn total_size_bytes(&self) -> u64 {
        (self.total_size_gb * 1024.0 * 1024.0 * 1024.0).max(0.0) as u64
    }
}
