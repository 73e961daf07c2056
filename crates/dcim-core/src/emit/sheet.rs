// ── Flat sheets ──
//
// A worksheet is a name, a header row and typed data rows. Each export
// record type knows its sheet name, its headers and how to lay itself
// out as cells; writers (xlsx, terminal tables) only see `Sheet`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rows::{AccessLogRow, CableRow, PowerFeedRow, PowerPanelRow};

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// A record that occupies one row of a named worksheet.
pub trait SheetRecord {
    const SHEET: &'static str;
    const HEADERS: &'static [&'static str];

    /// Cells in `HEADERS` order.
    fn cells(&self) -> Vec<Cell>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn from_records<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Self
    where
        R: SheetRecord + 'a,
    {
        Self {
            name: R::SHEET.to_owned(),
            headers: R::HEADERS.iter().map(|h| (*h).to_owned()).collect(),
            rows: records.into_iter().map(SheetRecord::cells).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn text(value: Option<&String>) -> Cell {
    Cell::Text(value.cloned().unwrap_or_default())
}

// ── Cables ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CableRecord {
    pub label: String,
    pub cable_type: String,
    pub status: String,
    pub side_a_type: String,
    pub side_a_id: String,
    pub side_b_type: String,
    pub side_b_id: String,
    pub length: Option<String>,
    pub color: Option<String>,
    pub tenant: Option<String>,
}

impl From<CableRow> for CableRecord {
    fn from(row: CableRow) -> Self {
        Self {
            label: row.label,
            cable_type: row.cable_type,
            status: row.status,
            side_a_type: row.termination_a_type,
            side_a_id: row.termination_a_id,
            side_b_type: row.termination_b_type,
            side_b_id: row.termination_b_id,
            length: row.length,
            color: row.color,
            tenant: row.tenant_name,
        }
    }
}

impl SheetRecord for CableRecord {
    const SHEET: &'static str = "Cables";
    const HEADERS: &'static [&'static str] = &[
        "Label",
        "Type",
        "Status",
        "Side A Type",
        "Side A ID",
        "Side B Type",
        "Side B ID",
        "Length",
        "Color",
        "Tenant",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.label.as_str().into(),
            self.cable_type.as_str().into(),
            self.status.as_str().into(),
            self.side_a_type.as_str().into(),
            self.side_a_id.as_str().into(),
            self.side_b_type.as_str().into(),
            self.side_b_id.as_str().into(),
            text(self.length.as_ref()),
            text(self.color.as_ref()),
            text(self.tenant.as_ref()),
        ]
    }
}

// ── Access logs ──────────────────────────────────────────────────────

const ACCESS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn access_time(at: &DateTime<Utc>) -> String {
    at.format(ACCESS_TIME_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessLogRecord {
    pub personnel: String,
    pub company: String,
    pub access_type: String,
    pub status: String,
    pub site: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub check_in: String,
    /// Blank while the visitor is still on site.
    pub check_out: String,
    pub purpose: String,
    pub badge: String,
}

impl From<AccessLogRow> for AccessLogRecord {
    fn from(row: AccessLogRow) -> Self {
        Self {
            personnel: row.personnel_name,
            company: row.company.unwrap_or_default(),
            access_type: row.access_type,
            status: row.status,
            site: row.site_name,
            check_in: access_time(&row.check_in_at),
            check_out: row
                .actual_check_out_at
                .as_ref()
                .map(access_time)
                .unwrap_or_default(),
            purpose: row.purpose.unwrap_or_default(),
            badge: row.badge_number.unwrap_or_default(),
        }
    }
}

impl SheetRecord for AccessLogRecord {
    const SHEET: &'static str = "Access Logs";
    const HEADERS: &'static [&'static str] = &[
        "Personnel",
        "Company",
        "Access Type",
        "Status",
        "Site",
        "Check In",
        "Check Out",
        "Purpose",
        "Badge",
    ];

    fn cells(&self) -> Vec<Cell> {
        [
            &self.personnel,
            &self.company,
            &self.access_type,
            &self.status,
            &self.site,
            &self.check_in,
            &self.check_out,
            &self.purpose,
            &self.badge,
        ]
        .into_iter()
        .map(|s| Cell::Text(s.clone()))
        .collect()
    }
}

// ── Power ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerPanelRecord {
    pub name: String,
    pub site: String,
    pub location: String,
    pub rated_kw: f64,
    pub voltage: f64,
    pub phase: String,
}

impl From<PowerPanelRow> for PowerPanelRecord {
    fn from(row: PowerPanelRow) -> Self {
        Self {
            name: row.name,
            site: row.site_name,
            location: row.location.unwrap_or_default(),
            rated_kw: row.rated_capacity_kw,
            voltage: row.voltage_v,
            phase: row.phase_type,
        }
    }
}

impl SheetRecord for PowerPanelRecord {
    const SHEET: &'static str = "Panels";
    const HEADERS: &'static [&'static str] =
        &["Panel Name", "Site", "Location", "Rated KW", "Voltage", "Phase"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.name.as_str().into(),
            self.site.as_str().into(),
            self.location.as_str().into(),
            self.rated_kw.into(),
            self.voltage.into(),
            self.phase.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerFeedRecord {
    pub name: String,
    pub panel: String,
    pub rack: String,
    pub feed_type: String,
    pub max_amps: f64,
    pub rated_kw: f64,
}

impl From<PowerFeedRow> for PowerFeedRecord {
    fn from(row: PowerFeedRow) -> Self {
        Self {
            name: row.name,
            panel: row.panel_name,
            rack: row.rack_name.unwrap_or_default(),
            feed_type: row.feed_type,
            max_amps: row.max_amps,
            rated_kw: row.rated_kw,
        }
    }
}

impl SheetRecord for PowerFeedRecord {
    const SHEET: &'static str = "Feeds";
    const HEADERS: &'static [&'static str] =
        &["Feed Name", "Panel", "Rack", "Feed Type", "Max Amps", "Rated KW"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.name.as_str().into(),
            self.panel.as_str().into(),
            self.rack.as_str().into(),
            self.feed_type.as_str().into(),
            self.max_amps.into(),
            self.rated_kw.into(),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn access_row() -> AccessLogRow {
        AccessLogRow {
            personnel_name: "J. Doe".into(),
            company: None,
            access_type: "visitor".into(),
            status: "checked_in".into(),
            site_id: None,
            site_name: "AMS1".into(),
            check_in_at: Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap(),
            actual_check_out_at: None,
            purpose: Some("audit".into()),
            badge_number: None,
        }
    }

    #[test]
    fn access_record_formats_times_and_blanks() {
        let record = AccessLogRecord::from(access_row());
        assert_eq!(record.check_in, "2024-03-09 07:05:00");
        assert_eq!(record.check_out, "");
        assert_eq!(record.company, "");

        let mut row = access_row();
        row.actual_check_out_at = Some(Utc.with_ymd_and_hms(2024, 3, 9, 17, 30, 15).unwrap());
        assert_eq!(AccessLogRecord::from(row).check_out, "2024-03-09 17:30:15");
    }

    #[test]
    fn cells_follow_header_order() {
        let record = AccessLogRecord::from(access_row());
        let cells = record.cells();
        assert_eq!(cells.len(), AccessLogRecord::HEADERS.len());
        assert_eq!(cells[0], Cell::Text("J. Doe".into()));
        assert_eq!(cells[7], Cell::Text("audit".into()));
    }

    #[test]
    fn sheet_from_cable_records() {
        let cable = CableRecord::from(CableRow {
            label: "C-001".into(),
            cable_type: "cat6".into(),
            status: "connected".into(),
            termination_a_type: "interface".into(),
            termination_a_id: "11".into(),
            termination_b_type: "interface".into(),
            termination_b_id: "42".into(),
            length: Some("3.5".into()),
            color: None,
            tenant_name: None,
        });
        let sheet = Sheet::from_records(&[cable]);
        assert_eq!(sheet.name, "Cables");
        assert_eq!(sheet.headers[3], "Side A Type");
        assert_eq!(sheet.rows[0][7], Cell::Text("3.5".into()));
        assert_eq!(sheet.rows[0][8], Cell::Text(String::new()));
    }

    #[test]
    fn power_records_keep_numbers_numeric() {
        let feed = PowerFeedRecord::from(PowerFeedRow {
            name: "F-A".into(),
            panel_name: "PP-1".into(),
            rack_name: None,
            feed_type: "primary".into(),
            max_amps: 32.0,
            rated_kw: 7.4,
        });
        let cells = feed.cells();
        assert_eq!(cells[2], Cell::Text(String::new()));
        assert_eq!(cells[4], Cell::Number(32.0));
        assert_eq!(cells[5].to_string(), "7.4");
    }

    #[test]
    fn empty_sheet_keeps_headers() {
        let sheet = Sheet::from_records::<PowerPanelRecord>(&[]);
        assert!(sheet.is_empty());
        assert_eq!(sheet.headers.len(), 6);
        assert_eq!(sheet.name, "Panels");
    }
}
