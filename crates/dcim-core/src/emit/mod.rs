// ── Tree emission ──
//
// Serializers from materialized trees (and flat export rows) to the
// document shapes handed to a download sink.

pub mod flat;
pub mod sheet;
pub mod xml;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use flat::{DeviceSheetRecord, RackSheetRecord, flatten_devices, flatten_sites};
pub use sheet::{
    AccessLogRecord, CableRecord, Cell, PowerFeedRecord, PowerPanelRecord, Sheet, SheetRecord,
};
pub use xml::{device_document, site_document};

/// Which export a document belongs to. Drives the download file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportKind {
    Racks,
    Devices,
    Cables,
    Access,
    Power,
}

/// Document container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentFormat {
    Xlsx,
    Xml,
}

/// `<prefix>-<kind>-<YYYY-MM-DD>.<ext>`, e.g. `dcim-racks-2024-05-01.xlsx`.
pub fn export_filename(prefix: &str, kind: ExportKind, date: NaiveDate, format: DocumentFormat) -> String {
    format!("{prefix}-{kind}-{}.{format}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            export_filename("dcim", ExportKind::Racks, date, DocumentFormat::Xlsx),
            "dcim-racks-2024-05-01.xlsx"
        );
        assert_eq!(
            export_filename("acme", ExportKind::Devices, date, DocumentFormat::Xml),
            "acme-devices-2024-05-01.xml"
        );
    }

    #[test]
    fn export_kind_parses_lowercase() {
        assert_eq!("access".parse::<ExportKind>().unwrap(), ExportKind::Access);
        assert!("Racks".parse::<ExportKind>().is_err());
    }
}
