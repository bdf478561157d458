//! Command-line interface for the synthetic data generator
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate 10 GB of documents from an index mapping
//! sdg generate \
//!   --index-name logs \
//!   --index-mappings logs-mapping.json \
//!   --output-path /data/logs \
//!   --total-size-gb 10 \
//!   --config sdg-config.yml
//!
//! # Same dataset every run
//! sdg generate -i logs -t template.json -o /data/logs -s 1 --seed 42
//!
//! # Print one document and exit
//! sdg generate -i logs -t template.json -o /data/logs -s 1 --test-document
//!
//! # List the generator kinds and date formats
//! sdg generators
//! ```

use clap::{Parser, Subcommand};
use sdg_core::{formats::supported_date_formats, GeneratorKind};
use sdg_writer::GenerateArgs;
use synthetic_data_generator::run_generate;

#[derive(Parser)]
#[command(name = "sdg")]
#[command(about = "Generate synthetic document datasets from index mappings or templates")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a size-bounded NDJSON dataset
    Generate(GenerateArgs),

    /// List generator kinds with their parameters, and supported date formats
    Generators,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            run_generate(&args)?;
        }
        Commands::Generators => {
            for kind in GeneratorKind::ALL {
                let params = kind.accepted_params();
                if params.is_empty() {
                    println!("{kind}");
                } else {
                    println!("{kind}({})", params.join(", "));
                }
            }
            println!();
            println!("Date formats:");
            for format in supported_date_formats() {
                println!("  {format}");
            }
        }
    }

    Ok(())
}
