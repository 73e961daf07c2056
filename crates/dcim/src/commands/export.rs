//! Export command handlers.
//!
//! Each handler reads a row dump, materializes or maps it, and hands the
//! result either to the terminal renderer or to a file sink.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use dcim_core::emit::{
    AccessLogRecord, CableRecord, DocumentFormat, ExportKind, PowerFeedRecord, PowerPanelRecord,
    Sheet, SheetRecord, device_document, flatten_devices, flatten_sites, site_document,
};
use dcim_core::{
    AccessFilter, AccessLogRow, CableRow, DeviceFilter, DeviceInventoryRow, PowerFeedRow,
    PowerPanelRow, RowAnomaly, SiteHierarchyRow, SiteNode, build_device_tree, build_site_tree,
};

use crate::cli::{
    AccessExportArgs, DeviceExportArgs, ExportArgs, ExportCommand, GlobalOpts, OutputFormat,
    PowerExportArgs, SheetExportArgs, XmlCommand, XmlExportArgs,
};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::{output, sink, source};

use super::util;

pub fn handle(args: ExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ExportCommand::Racks(args) => racks(args, config, global),
        ExportCommand::Devices(args) => devices(args, config, global),
        ExportCommand::Cables(args) => cables(args, config, global),
        ExportCommand::Access(args) => access(args, config, global),
        ExportCommand::Power(args) => power(args, config, global),
        ExportCommand::Xml(args) => match args.command {
            XmlCommand::Racks(args) => xml_racks(args, config, global),
            XmlCommand::Devices(args) => xml_devices(args, config, global),
        },
    }
}

// ── Tree-backed exports ──────────────────────────────────────────────

fn site_tree(
    input: Option<&std::path::Path>,
    config: &Config,
    global: &GlobalOpts,
) -> Result<Vec<SiteNode>, CliError> {
    let text = source::read_input(input)?;
    let tree = build_site_tree(source::parse_rows::<SiteHierarchyRow>(&text)?)?;
    info!(
        rows = tree.rows_read,
        sites = tree.roots.len(),
        racks = tree.roots.iter().map(SiteNode::rack_count).sum::<usize>(),
        "site tree built"
    );
    warn_anomalies(&tree.anomalies, config, global);
    Ok(tree.roots)
}

fn device_tree(
    input: Option<&std::path::Path>,
    config: &Config,
    global: &GlobalOpts,
) -> Result<Vec<dcim_core::DeviceNode>, CliError> {
    let text = source::read_input(input)?;
    let tree = build_device_tree(source::parse_rows::<DeviceInventoryRow>(&text)?)?;
    info!(
        rows = tree.rows_read,
        devices = tree.roots.len(),
        "device tree built"
    );
    warn_anomalies(&tree.anomalies, config, global);
    Ok(tree.roots)
}

fn racks(args: SheetExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let sites = site_tree(args.input.input.as_deref(), config, global)?;
    let records = flatten_sites(&sites);
    deliver(&records, args.xlsx, ExportKind::Racks, config, global)
}

fn devices(args: DeviceExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let filter = DeviceFilter::from_options(
        args.tenant.as_deref().map(util::parse_id),
        args.status,
    );
    let devices: Vec<_> = device_tree(args.sheet.input.input.as_deref(), config, global)?
        .into_iter()
        .filter(|d| filter.matches(d))
        .collect();
    let records = flatten_devices(&devices);
    deliver(&records, args.sheet.xlsx, ExportKind::Devices, config, global)
}

fn xml_racks(args: XmlExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let sites = site_tree(args.input.input.as_deref(), config, global)?;
    let document = site_document(&sites)?;
    deliver_document(&document, args.out, ExportKind::Racks, config, global)
}

fn xml_devices(args: XmlExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = device_tree(args.input.input.as_deref(), config, global)?;
    let document = device_document(&devices)?;
    deliver_document(&document, args.out, ExportKind::Devices, config, global)
}

// ── Flat exports ─────────────────────────────────────────────────────

fn cables(args: SheetExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let records: Vec<CableRecord> = source::load_rows::<CableRow>(args.input.input.as_deref())?
        .into_iter()
        .map(CableRecord::from)
        .collect();
    deliver(&records, args.xlsx, ExportKind::Cables, config, global)
}

fn access(args: AccessExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let filter = AccessFilter::from_options(
        args.site.as_deref().map(util::parse_id),
        util::parse_optional_timestamp("from", args.from.as_deref())?,
        util::parse_optional_timestamp("to", args.to.as_deref())?,
    );
    let records: Vec<AccessLogRecord> =
        source::load_rows::<AccessLogRow>(args.sheet.input.input.as_deref())?
            .into_iter()
            .filter(|row| filter.matches(row))
            .map(AccessLogRecord::from)
            .collect();
    deliver(&records, args.sheet.xlsx, ExportKind::Access, config, global)
}

#[derive(Serialize)]
struct PowerExport<'a> {
    panels: &'a [PowerPanelRecord],
    feeds: &'a [PowerFeedRecord],
}

fn power(args: PowerExportArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    if args.panels.as_os_str() == "-" && args.feeds.as_os_str() == "-" {
        return Err(CliError::Validation {
            field: "panels".into(),
            reason: "panels and feeds cannot both be read from stdin".into(),
        });
    }
    let panels: Vec<PowerPanelRecord> = source::load_rows::<PowerPanelRow>(Some(args.panels.as_path()))?
        .into_iter()
        .map(PowerPanelRecord::from)
        .collect();
    let feeds: Vec<PowerFeedRecord> = source::load_rows::<PowerFeedRow>(Some(args.feeds.as_path()))?
        .into_iter()
        .map(PowerFeedRecord::from)
        .collect();

    let sheets = [Sheet::from_records(&panels), Sheet::from_records(&feeds)];
    if let Some(explicit) = args.xlsx {
        let path = sink::target_path(explicit, config, ExportKind::Power, DocumentFormat::Xlsx);
        sink::write_workbook(&path, &sheets)?;
        output::print_output(&path.display().to_string(), global.quiet);
        return Ok(());
    }

    let format = config::output_format(global, config);
    let rendered = match format {
        OutputFormat::Table => sheets
            .iter()
            .map(|sheet| format!("{}\n{}", sheet.name, output::sheet_table(sheet)))
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Plain => sheets
            .iter()
            .map(output::sheet_first_column)
            .collect::<Vec<_>>()
            .join("\n\n"),
        structured => output::render_structured(
            structured,
            &PowerExport {
                panels: &panels,
                feeds: &feeds,
            },
        )?,
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Delivery ─────────────────────────────────────────────────────────

/// Print records in the selected format, or write a one-sheet workbook
/// when `--xlsx` was given.
fn deliver<R>(
    records: &[R],
    xlsx: Option<Option<PathBuf>>,
    kind: ExportKind,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: SheetRecord + Serialize,
{
    let sheet = Sheet::from_records(records);
    info!(%kind, records = sheet.rows.len(), "export ready");

    if let Some(explicit) = xlsx {
        let path = sink::target_path(explicit, config, kind, DocumentFormat::Xlsx);
        sink::write_workbook(&path, &[sheet])?;
        output::print_output(&path.display().to_string(), global.quiet);
        return Ok(());
    }

    let format = config::output_format(global, config);
    let rendered = output::render_sheet(format, &sheet, records)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// Write an XML document to stdout, or to a file when `--out` was given.
fn deliver_document(
    document: &str,
    out: Option<Option<PathBuf>>,
    kind: ExportKind,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match out {
        Some(explicit) => {
            let path = sink::target_path(explicit, config, kind, DocumentFormat::Xml);
            sink::write_document(&path, document)?;
            output::print_output(&path.display().to_string(), global.quiet);
        }
        None => print!("{document}"),
    }
    Ok(())
}

fn warn_anomalies(anomalies: &[RowAnomaly], config: &Config, global: &GlobalOpts) {
    let color = output::should_color(config::color_mode(global, config));
    output::report_anomalies(anomalies, global.quiet, color);
}
