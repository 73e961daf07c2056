//! Download sinks: xlsx workbooks and XML files on disk.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use dcim_core::emit::{Cell, DocumentFormat, ExportKind, Sheet, export_filename};

use crate::config::Config;
use crate::error::CliError;

/// Where a generated document lands: an explicit path wins, otherwise a
/// dated name under the configured output directory (or the working
/// directory).
pub fn target_path(
    explicit: Option<PathBuf>,
    config: &Config,
    kind: ExportKind,
    format: DocumentFormat,
) -> PathBuf {
    explicit.unwrap_or_else(|| default_path(config, kind, format, Utc::now().date_naive()))
}

fn default_path(config: &Config, kind: ExportKind, format: DocumentFormat, date: NaiveDate) -> PathBuf {
    let dir = config
        .export
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(export_filename(&config.export.filename_prefix, kind, date, format))
}

/// Write `sheets` as one workbook, one worksheet each, header row in bold.
pub fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<(), CliError> {
    let wrap = |source: XlsxError| CliError::Workbook {
        path: path.display().to_string(),
        source,
    };

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        fill_worksheet(worksheet, sheet, &bold).map_err(wrap)?;
    }
    workbook.save(path).map_err(wrap)?;

    tracing::info!(path = %path.display(), sheets = sheets.len(), "workbook written");
    Ok(())
}

fn fill_worksheet(worksheet: &mut Worksheet, sheet: &Sheet, bold: &Format) -> Result<(), XlsxError> {
    worksheet.set_name(&sheet.name)?;

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col)?, header, bold)?;
    }

    for (index, cells) in sheet.rows.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in cells.iter().enumerate() {
            let col = col_num(col)?;
            match cell {
                Cell::Text(text) => worksheet.write_string(row, col, text)?,
                Cell::Number(n) => worksheet.write_number(row, col, *n)?,
            };
        }
    }
    Ok(())
}

fn col_num(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Write a rendered document verbatim.
pub fn write_document(path: &Path, document: &str) -> Result<(), CliError> {
    std::fs::write(path, document)?;
    tracing::info!(path = %path.display(), bytes = document.len(), "document written");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = target_path(
            Some(PathBuf::from("out.xlsx")),
            &Config::default(),
            ExportKind::Racks,
            DocumentFormat::Xlsx,
        );
        assert_eq!(path, PathBuf::from("out.xlsx"));
    }

    #[test]
    fn default_path_uses_prefix_kind_and_date() {
        let mut config = Config::default();
        config.export.filename_prefix = "acme".into();
        config.export.output_dir = Some(PathBuf::from("/srv/exports"));
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(
            default_path(&config, ExportKind::Devices, DocumentFormat::Xml, date),
            PathBuf::from("/srv/exports/acme-devices-2024-05-01.xml")
        );
        assert_eq!(
            default_path(&Config::default(), ExportKind::Power, DocumentFormat::Xlsx, date),
            PathBuf::from("./dcim-power-2024-05-01.xlsx")
        );
    }

    #[test]
    fn workbook_is_written_as_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("racks.xlsx");
        let sheet = Sheet {
            name: "Racks".into(),
            headers: vec!["Rack Name".into(), "U-Height".into()],
            rows: vec![vec![Cell::from("R1"), Cell::from(42u32)]],
        };

        write_workbook(&path, &[sheet]).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn unwritable_target_is_a_workbook_error() {
        let err = write_workbook(Path::new("/nonexistent/dir/out.xlsx"), &[]).unwrap_err();
        assert!(matches!(err, CliError::Workbook { .. }));
    }
}
