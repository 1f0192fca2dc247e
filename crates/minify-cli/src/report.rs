//! Terminal report printed after a sync run

use std::path::Path;
use std::time::Duration;

use colored::{Color, Colorize};
use minify_core::{FileResult, RunSummary, TokenStats};
use minify_engine::SyncReport;
use minify_sources::relative_path;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::settings::RunSettings;

/// Colour tier for a compression ratio
pub fn ratio_color(ratio: f64) -> Color {
    if ratio >= 2.0 {
        Color::BrightGreen
    } else if ratio >= 1.5 {
        Color::Green
    } else if ratio >= 1.2 {
        Color::Cyan
    } else if ratio > 1.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}x", ratio)
}

fn colored_ratio(ratio: f64) -> String {
    format_ratio(ratio).color(ratio_color(ratio)).to_string()
}

/// `123ms` under a second, `1.2s` under a minute, `2m 3.4s` beyond
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let minutes = (secs / 60.0).floor();
        format!("{}m {:.1}s", minutes as u64, secs - minutes * 60.0)
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct SettingRow {
    #[tabled(rename = "Setting")]
    pub setting: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl SettingRow {
    fn new(setting: &'static str, value: impl ToString) -> Self {
        Self {
            setting,
            value: value.to_string(),
        }
    }
}

/// Size columns shared by pass-through and API runs
#[derive(Debug, Clone, Tabled)]
pub struct ResultRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Original")]
    pub original: usize,
    #[tabled(rename = "Final")]
    pub final_size: usize,
    #[tabled(rename = "Ratio")]
    pub ratio: String,
    #[tabled(rename = "Time")]
    pub time: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct TokenResultRow {
    #[tabled(inline)]
    pub sizes: ResultRow,
    #[tabled(rename = "Tokens before")]
    pub tokens_before: String,
    #[tabled(rename = "Tokens after")]
    pub tokens_after: String,
    #[tabled(rename = "Token ratio")]
    pub token_ratio: String,
}

impl TokenResultRow {
    fn new(sizes: ResultRow, tokens: Option<TokenStats>) -> Self {
        match tokens {
            Some(tokens) => Self {
                sizes,
                tokens_before: tokens.before.to_string(),
                tokens_after: tokens.after.to_string(),
                token_ratio: colored_ratio(tokens.ratio()),
            },
            None => Self {
                sizes,
                tokens_before: "-".to_string(),
                tokens_after: "-".to_string(),
                token_ratio: "-".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct FailureRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Error")]
    pub error: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub metric: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

fn render<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn configuration_table(settings: &RunSettings, file_count: usize) -> String {
    let mut rows = vec![
        SettingRow::new("Source directory", settings.source.display()),
        SettingRow::new("Target directory", settings.target.display()),
    ];
    match &settings.single_file {
        Some(file) => rows.push(SettingRow::new("File", file.display())),
        None => {
            rows.push(SettingRow::new("File pattern", &settings.file_pattern));
            let exclusions = if settings.exclude_patterns.is_empty() {
                "none".to_string()
            } else {
                settings.exclude_patterns.join(", ")
            };
            rows.push(SettingRow::new("Excluded patterns", exclusions));
        }
    }
    match settings.model() {
        Some(model) => {
            rows.push(SettingRow::new("External LLM", "enabled".green()));
            rows.push(SettingRow::new("LLM model", model));
        }
        None => rows.push(SettingRow::new("External LLM", "disabled".dimmed())),
    }
    rows.push(SettingRow::new("Token encoding", settings.encoding));
    rows.push(SettingRow::new("Files", file_count));

    render(rows)
}

/// Per-file table of successful results with a TOTAL row, or `None` when
/// nothing succeeded
pub fn results_table(report: &SyncReport, source_root: &Path, with_tokens: bool) -> Option<String> {
    let summary = report.summary();
    if summary.succeeded == 0 {
        return None;
    }

    let mut rows: Vec<TokenResultRow> = report
        .results
        .iter()
        .filter_map(|result| {
            let stats = result.stats()?;
            let sizes = ResultRow {
                file: relative_path(&result.file, source_root)
                    .display()
                    .to_string()
                    .cyan()
                    .to_string(),
                original: stats.original_size,
                final_size: stats.final_size,
                ratio: colored_ratio(stats.total_ratio()),
                time: format_time(result.processing_time),
            };
            Some(TokenResultRow::new(sizes, stats.tokens))
        })
        .collect();

    let total = ResultRow {
        file: "TOTAL".bold().to_string(),
        original: summary.total_original,
        final_size: summary.total_final,
        ratio: colored_ratio(summary.overall_ratio()),
        time: format_time(summary.total_processing_time),
    };
    rows.push(TokenResultRow::new(total, summary.tokens));

    let mut table = if with_tokens {
        Table::new(rows)
    } else {
        Table::new(rows.into_iter().map(|row| row.sizes))
    };
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    Some(table.to_string())
}

pub fn failures_table<'a>(
    failures: impl Iterator<Item = &'a FileResult>,
    source_root: &Path,
) -> Option<String> {
    let rows: Vec<FailureRow> = failures
        .map(|result| FailureRow {
            file: relative_path(&result.file, source_root)
                .display()
                .to_string()
                .red()
                .to_string(),
            error: result.error_message().unwrap_or_default().to_string(),
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(render(rows))
    }
}

/// Successful files per second of wall-clock time; `None` when nothing succeeded
pub fn files_per_second(summary: &RunSummary, elapsed: Duration) -> Option<f64> {
    if summary.succeeded == 0 {
        return None;
    }
    let secs = elapsed.as_secs_f64();
    Some(if secs > 0.0 {
        summary.succeeded as f64 / secs
    } else {
        0.0
    })
}

pub fn timing_rows(report: &SyncReport) -> Vec<MetricRow> {
    let summary = report.summary();
    let mut rows = vec![MetricRow {
        metric: "Total execution time",
        value: format_time(report.elapsed),
    }];

    if let Some(rate) = files_per_second(&summary, report.elapsed) {
        rows.push(MetricRow {
            metric: "Files per second",
            value: format!("{:.2}", rate),
        });
        rows.push(MetricRow {
            metric: "Average time per file",
            value: format_time(summary.average_processing_time()),
        });
    }

    rows
}

pub fn print_configuration(settings: &RunSettings, file_count: usize) {
    println!("{}", "Configuration".bold());
    println!("{}", configuration_table(settings, file_count));
    println!();
}

pub fn print_results(report: &SyncReport, source_root: &Path, with_tokens: bool) {
    if let Some(table) = results_table(report, source_root, with_tokens) {
        println!();
        println!("{}", "Compression results".bold());
        println!("{}", table);
    }
}

pub fn print_failures<'a>(failures: impl Iterator<Item = &'a FileResult>, source_root: &Path) {
    if let Some(table) = failures_table(failures, source_root) {
        println!();
        println!("{}", "Failed files".red().bold());
        println!("{}", table);
    }
}

pub fn print_timing(report: &SyncReport) {
    println!();
    println!("{}", "Timing".bold());
    println!("{}", render(timing_rows(report)));
}

pub fn print_banner(summary: &RunSummary, elapsed: Duration) {
    println!();
    if summary.failed == 0 {
        println!(
            "{} All {} file(s) processed successfully, overall ratio {}",
            "✓".green().bold(),
            summary.total_files(),
            colored_ratio(summary.overall_ratio())
        );
    } else if summary.succeeded == 0 {
        println!(
            "{} All {} file(s) failed to process",
            "✗".red().bold(),
            summary.total_files()
        );
    } else {
        println!(
            "{} Completed with errors: {} succeeded, {} failed",
            "!".yellow().bold(),
            summary.succeeded.to_string().green(),
            summary.failed.to_string().red()
        );
    }
    if let (Some(tokens), Some(ratio)) = (summary.tokens, summary.token_ratio()) {
        println!(
            "  Tokens: {} -> {} ({} saved, {})",
            tokens.before,
            tokens.after,
            tokens.reduction(),
            colored_ratio(ratio)
        );
    }
    if summary.fallbacks > 0 {
        println!(
            "  {} file(s) kept their original content after LLM errors",
            summary.fallbacks.to_string().yellow()
        );
    }
    println!("  Total processing time: {}", format_time(elapsed).magenta());
}
