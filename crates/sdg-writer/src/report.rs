//! Run record and console summary.

use crate::error::WriterError;
use crate::progress::format_size;
use crate::writer::{DatasetReport, FileDescriptor};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary written next to the data files as `<index_name>_record.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(rename = "index-name")]
    pub index_name: String,
    pub docs_added: u64,
    /// Estimated dataset size in bytes.
    pub dataset_size: u64,
    pub total_time_in_seconds_to_generate_docs_added: u64,
    pub files: Vec<FileDescriptor>,
}

impl RunRecord {
    pub fn new(index_name: &str, report: &DatasetReport) -> Self {
        Self {
            index_name: index_name.to_string(),
            docs_added: report.docs_written,
            dataset_size: report.estimated_bytes,
            total_time_in_seconds_to_generate_docs_added: report.elapsed.as_secs_f64().round() as u64,
            files: report.files.clone(),
        }
    }
}

/// Write the run record into `output_dir` and return its path.
pub fn write_run_record(output_dir: &Path, record: &RunRecord) -> Result<PathBuf, WriterError> {
    let path = output_dir.join(format!("{}_record.json", record.index_name));
    fs::write(&path, serde_json::to_string_pretty(record)?)?;
    info!("Run record written to {}", path.display());
    Ok(path)
}

/// Format the run as a table of files plus a totals row.
pub fn format_summary(record: &RunRecord) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["File", "Docs", "Size"]);

    for file in &record.files {
        table.add_row(vec![
            Cell::new(&file.file_name),
            Cell::new(format_number(file.doc_count)),
            Cell::new(format_size(file.file_size_bytes)),
        ]);
    }

    let on_disk: u64 = record.files.iter().map(|f| f.file_size_bytes).sum();
    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(record.docs_added)),
        Cell::new(format_size(on_disk)),
    ]);

    format!(
        "Index: {}\n{}\nGenerated in {}s (estimated size {})\n",
        record.index_name,
        table,
        record.total_time_in_seconds_to_generate_docs_added,
        format_size(record.dataset_size)
    )
}

/// Format number with thousands separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
