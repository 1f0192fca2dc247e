use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use minify_core::{FileResult, SyncObserver};
use minify_sources::relative_path;

use crate::report::{format_ratio, format_time, ratio_color};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta} remaining) {wide_msg}";

/// Drives a progress bar over the run and prints one line per finished file
/// above it
pub struct ConsoleObserver {
    source_root: PathBuf,
    bar: ProgressBar,
}

impl ConsoleObserver {
    pub fn new(source_root: impl Into<PathBuf>, total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╸─"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(source_root, bar)
    }

    fn with_bar(source_root: impl Into<PathBuf>, bar: ProgressBar) -> Self {
        Self {
            source_root: source_root.into(),
            bar,
        }
    }

    /// Removes the bar so the report prints on a clean terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn name(&self, file: &Path) -> String {
        relative_path(file, &self.source_root).display().to_string()
    }

    fn print(&self, line: String) {
        self.bar.suspend(|| println!("{}", line));
    }
}

impl SyncObserver for ConsoleObserver {
    fn on_file_start(&self, file: &Path, index: usize, total: usize) {
        self.bar
            .set_message(format!("[{}/{}] {}", index + 1, total, self.name(file)));
    }

    fn on_file_done(&self, result: &FileResult) {
        if let Some(stats) = result.stats() {
            let ratio = stats.total_ratio();
            let mut line = format!(
                "  {} {} saved ({}) in {}",
                "✓".green().bold(),
                self.name(&result.file).cyan(),
                format_ratio(ratio).color(ratio_color(ratio)),
                format_time(result.processing_time)
            );
            if let Some(llm_ratio) = stats.llm_ratio() {
                line.push_str(&format!(" (llm {})", format_ratio(llm_ratio)));
            }
            if let Some(reason) = &stats.fallback {
                line.push_str(&format!(" {}", format!("kept original: {}", reason).yellow()));
            }
            self.print(line);
        }
        self.bar.inc(1);
    }

    fn on_file_error(&self, file: &Path, message: &str) {
        self.print(format!(
            "  {} {} error: {}",
            "✗".red().bold(),
            self.name(file),
            message.red()
        ));
        self.bar.inc(1);
    }
}
