//! Byte-scaled progress reporting.

use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress updates from the writer, once per written chunk.
pub trait ProgressSink {
    /// Called once before the first chunk with the byte target.
    fn start(&mut self, total_bytes: u64);

    /// Advance by `bytes` estimated bytes.
    fn advance(&mut self, bytes: u64);

    fn finish(&mut self);
}

/// Sink that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self, _total_bytes: u64) {}

    fn advance(&mut self, _bytes: u64) {}

    fn finish(&mut self) {}
}

/// Terminal progress bar measured in bytes.
pub struct ByteProgressBar {
    bar: ProgressBar,
    total: u64,
    position: u64,
}

impl ByteProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        let style = ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {msg} [{elapsed_precise}<{eta_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        bar.set_style(style);
        Self {
            bar,
            total: 0,
            position: 0,
        }
    }

    fn refresh_message(&self) {
        self.bar.set_message(format!(
            "{}/{}",
            format_size(self.position),
            format_size(self.total)
        ));
    }
}

impl Default for ByteProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ByteProgressBar {
    fn start(&mut self, total_bytes: u64) {
        self.total = total_bytes;
        self.position = 0;
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total_bytes);
        self.refresh_message();
    }

    fn advance(&mut self, bytes: u64) {
        self.position = self.position.saturating_add(bytes).min(self.total);
        self.bar.set_position(self.position);
        self.refresh_message();
    }

    fn finish(&mut self) {
        self.position = self.total;
        self.bar.set_position(self.total);
        self.refresh_message();
        self.bar.finish();
    }
}

/// Human-readable size, base 1024, with two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}
