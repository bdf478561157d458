//! `generate` command handler.

use crate::environment::{ensure_disk_space, log_runtime_environment};
use anyhow::Context;
use sdg_core::{Blueprint, SchemaDialect, SdgConfig};
use sdg_generator::{entropy_seed, hydrate, DocumentGenerator, HydratedBlueprint};
use sdg_writer::{
    format_summary, set_field, write_run_record, ByteProgressBar, DatasetWriter, GenerateArgs,
    NoProgress, ProgressSink, RunRecord, SchemaSourceArgs, WriterOptions,
};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Load the generation config, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SdgConfig> {
    match path {
        Some(path) => SdgConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SdgConfig::default()),
    }
}

/// Parse the schema, apply config overrides and hydrate it.
pub fn load_blueprint(
    source: &SchemaSourceArgs,
    config: &SdgConfig,
) -> anyhow::Result<HydratedBlueprint> {
    let (path, dialect) = match (&source.index_mappings, &source.template_document) {
        (Some(path), _) => (path, SchemaDialect::Mapping),
        (None, Some(path)) => (path, SchemaDialect::Template),
        (None, None) => anyhow::bail!("Either --index-mappings or --template-document is required"),
    };

    let mut blueprint = Blueprint::from_file(path, dialect)
        .with_context(|| format!("Failed to parse {dialect} schema {}", path.display()))?;
    config
        .apply_to(&mut blueprint)
        .context("Failed to apply config overrides")?;
    info!("Parsed {} top-level fields from {}", blueprint.len(), path.display());

    let hydrated = hydrate(&blueprint).context("Failed to hydrate blueprint")?;
    info!("Hydrated {} generators", hydrated.generator_count());
    Ok(hydrated)
}

/// One document as it would appear in the dataset.
pub fn generate_test_document(
    blueprint: &HydratedBlueprint,
    config: &SdgConfig,
    seed: u64,
) -> anyhow::Result<Value> {
    let mut document = DocumentGenerator::new(blueprint, seed)
        .next_document()
        .context("Failed to generate test document")?;
    if let Some(timeseries) = &config.timeseries {
        let start = timeseries.start()?;
        let format = timeseries.date_format()?;
        set_field(&mut document, &timeseries.field, format.render(&start));
    }
    Ok(document)
}

/// Run the `generate` command.
///
/// Returns the run record, or `None` in test-document mode.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<Option<RunRecord>> {
    let config = load_config(args.config.as_deref())?;
    let blueprint = load_blueprint(&args.schema, &config)?;
    let seed = args.seed.unwrap_or_else(entropy_seed);
    info!("Base seed: {}", seed);

    if args.test_document {
        let document = generate_test_document(&blueprint, &config, seed)?;
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(None);
    }

    let total_size_bytes = args.total_size_bytes();
    if total_size_bytes == 0 {
        anyhow::bail!("--total-size-gb must be positive, got {}", args.total_size_gb);
    }
    if !args.skip_disk_check {
        ensure_disk_space(&args.output_path, total_size_bytes)?;
    }
    log_runtime_environment();

    let options = WriterOptions::from_settings(
        &config.settings,
        &args.output_path,
        &args.index_name,
        total_size_bytes,
        seed,
    )
    .with_timeseries(config.timeseries.clone());

    let mut progress: Box<dyn ProgressSink> = if args.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(ByteProgressBar::new())
    };
    let report = DatasetWriter::new(&blueprint, options)
        .generate_dataset(progress.as_mut())
        .with_context(|| format!("Failed to generate dataset for '{}'", args.index_name))?;

    let record = RunRecord::new(&args.index_name, &report);
    write_run_record(&args.output_path, &record)?;
    println!("{}", format_summary(&record));
    Ok(Some(record))
}
