//! Host environment checks.
//!
//! Logs what the generator is about to run on and refuses to start when the
//! output filesystem cannot hold the requested dataset.

use anyhow::bail;
use sdg_writer::format_size;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Snapshot of the host the run executes on.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub cpu_cores: usize,
    pub memory_mb: u64,
    pub available_memory_mb: u64,
}

/// Log and capture CPU and memory information.
pub fn log_runtime_environment() -> EnvironmentInfo {
    let cpu_cores = num_cpus::get();
    let sys = sysinfo::System::new_all();
    let memory_mb = sys.total_memory() / 1024 / 1024;
    let available_memory_mb = sys.available_memory() / 1024 / 1024;

    info!("CPU cores visible: {}", cpu_cores);
    info!("Total memory: {} MB", memory_mb);
    info!("Available memory: {} MB", available_memory_mb);

    EnvironmentInfo {
        cpu_cores,
        memory_mb,
        available_memory_mb,
    }
}

/// Bytes available to unprivileged users on the filesystem holding `path`.
///
/// `path` may not exist yet; its closest existing ancestor is measured.
pub fn available_disk_bytes(path: &Path) -> anyhow::Result<u64> {
    let probe = existing_ancestor(path);
    let stat = nix::sys::statvfs::statvfs(&probe)
        .map_err(|e| anyhow::anyhow!("Failed to stat filesystem of {}: {e}", probe.display()))?;
    Ok(stat.blocks_available() as u64 * stat.fragment_size() as u64)
}

/// Fail when fewer than `required_bytes` are available under `path`.
pub fn ensure_disk_space(path: &Path, required_bytes: u64) -> anyhow::Result<()> {
    let available = available_disk_bytes(path)?;
    info!(
        "Output filesystem has {} available, {} requested",
        format_size(available),
        format_size(required_bytes)
    );
    if available < required_bytes {
        bail!(
            "Not enough disk space under {}: {} available but {} requested",
            path.display(),
            format_size(available),
            format_size(required_bytes)
        );
    }
    Ok(())
}

fn existing_ancestor(path: &Path) -> PathBuf {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
