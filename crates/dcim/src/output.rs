//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use dcim_core::RowAnomaly;
use dcim_core::emit::Sheet;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled for stderr notices.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the records via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> Result<String, CliError>,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Render export records: a worksheet-shaped table, or the records themselves
/// for structured formats. Plain emits each row's first cell.
pub fn render_sheet<T: Serialize>(
    format: OutputFormat,
    sheet: &Sheet,
    records: &[T],
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(sheet_table(sheet)),
        OutputFormat::Plain => Ok(sheet_first_column(sheet)),
        structured => render_structured(structured, records),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Summarize truncated rows on stderr.
pub fn report_anomalies(anomalies: &[RowAnomaly], quiet: bool, color: bool) {
    if quiet || anomalies.is_empty() {
        return;
    }
    let label = "warning:";
    let label = if color {
        label.yellow().bold().to_string()
    } else {
        label.to_owned()
    };
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{label} {} malformed row(s) truncated",
        anomalies.len()
    );
    for anomaly in anomalies {
        let ignored: Vec<String> = anomaly.ignored.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            stderr,
            "  row {}: {} missing, ignored {}",
            anomaly.row,
            anomaly.missing,
            ignored.join(", ")
        );
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// A worksheet as a rounded table, headers first.
pub fn sheet_table(sheet: &Sheet) -> String {
    let mut builder = Builder::default();
    builder.push_record(sheet.headers.iter().cloned());
    for row in &sheet.rows {
        builder.push_record(row.iter().map(ToString::to_string));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Each row's first cell, one per line.
pub fn sheet_first_column(sheet: &Sheet) -> String {
    sheet
        .rows
        .iter()
        .filter_map(|row| row.first().map(ToString::to_string))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn render_structured<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        _ => render_json_pretty(data),
    }
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string(data)?)
}

/// YAML output.
pub(crate) fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
