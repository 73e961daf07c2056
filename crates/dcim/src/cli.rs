//! Clap derive structures for the `dcim` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dcim -- export DCIM inventory dumps as documents
#[derive(Debug, Parser)]
#[command(
    name = "dcim",
    version,
    about = "Export DCIM inventory as nested XML documents and spreadsheets",
    long_about = "Turns flat inventory query dumps (JSON arrays or newline-delimited\n\
        JSON rows) into nested site/rack/device trees, XML documents and\n\
        xlsx workbooks, and simulates power-feed readings.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "DCIM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (defaults to `defaults.output` in the config)
    #[arg(long, short = 'o', env = "DCIM_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export inventory dumps as tables, spreadsheets or XML
    #[command(alias = "x")]
    Export(ExportArgs),

    /// Validate, mock and stream power-feed readings
    #[command(alias = "r")]
    Readings(ReadingsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXPORT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub command: ExportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Racks with their mounted devices (site hierarchy rows)
    Racks(SheetExportArgs),

    /// Device inventory (device inventory rows)
    #[command(alias = "dev")]
    Devices(DeviceExportArgs),

    /// Cable plant
    Cables(SheetExportArgs),

    /// Data-center access log
    Access(AccessExportArgs),

    /// Power panels and feeds (two-sheet workbook)
    Power(PowerExportArgs),

    /// Nested XML documents
    Xml(XmlArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Row dump: JSON array or newline-delimited JSON ("-" or omitted reads stdin)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SheetExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write an xlsx workbook instead of printing (optional path; defaults to a dated name)
    #[arg(long, value_name = "PATH")]
    pub xlsx: Option<Option<PathBuf>>,
}

#[derive(Debug, Args)]
pub struct DeviceExportArgs {
    #[command(flatten)]
    pub sheet: SheetExportArgs,

    /// Only devices owned by this tenant id
    #[arg(long)]
    pub tenant: Option<String>,

    /// Only devices with this status
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct AccessExportArgs {
    #[command(flatten)]
    pub sheet: SheetExportArgs,

    /// Only visits at this site id
    #[arg(long)]
    pub site: Option<String>,

    /// Earliest check-in (RFC 3339, inclusive)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest check-in (RFC 3339, inclusive)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct PowerExportArgs {
    /// Power panel rows (JSON array or newline-delimited JSON)
    #[arg(long)]
    pub panels: PathBuf,

    /// Power feed rows (JSON array or newline-delimited JSON)
    #[arg(long)]
    pub feeds: PathBuf,

    /// Write an xlsx workbook instead of printing (optional path; defaults to a dated name)
    #[arg(long, value_name = "PATH")]
    pub xlsx: Option<Option<PathBuf>>,
}

#[derive(Debug, Args)]
pub struct XmlArgs {
    #[command(subcommand)]
    pub command: XmlCommand,
}

#[derive(Debug, Subcommand)]
pub enum XmlCommand {
    /// Site → location → rack → device → interface document
    Racks(XmlExportArgs),

    /// Device → interface document with rack and tenant references
    Devices(XmlExportArgs),
}

#[derive(Debug, Args)]
pub struct XmlExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write to a file instead of stdout (optional path; defaults to a dated name)
    #[arg(long, value_name = "PATH")]
    pub out: Option<Option<PathBuf>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  READINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReadingsArgs {
    #[command(subcommand)]
    pub command: ReadingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReadingsCommand {
    /// Check a batch of readings before ingestion
    Validate {
        /// JSON array of readings ("-" reads stdin)
        file: PathBuf,
    },

    /// Generate a synthetic reading series for one feed
    Mock {
        /// Feed identifier
        #[arg(long)]
        feed: String,

        /// Window start (RFC 3339; defaults to the configured window before --to)
        #[arg(long)]
        from: Option<String>,

        /// Window end (RFC 3339; defaults to now)
        #[arg(long)]
        to: Option<String>,

        /// Step between readings: 5m, 1h or 1d (unknown values mean 5m)
        #[arg(long)]
        interval: Option<String>,

        /// Seed for reproducible series
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Stream simulated live readings as server-sent events
    Stream {
        /// Feed definitions: JSON array of {id, rated_kw, feed_type}
        #[arg(long)]
        feeds: PathBuf,

        /// Seconds between frames (defaults to the configured interval)
        #[arg(long)]
        every: Option<u64>,

        /// Stop after this many frames
        #[arg(long)]
        count: Option<usize>,

        /// Seed for reproducible readings
        #[arg(long)]
        seed: Option<u64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
