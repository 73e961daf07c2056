// ── Row source types ──
//
// One struct per result-set shape produced by the query layer. Column
// names follow the query aliases; every join-derived column is nullable.
// Rows are plain data: interpreting nulls is the extractor's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::EntityId;

/// One row of the site hierarchy join:
/// sites ⟕ locations ⟕ racks ⟕ devices ⟕ device_types ⟕ interfaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteHierarchyRow {
    pub site_id: Option<EntityId>,
    pub site_name: Option<String>,

    pub location_id: Option<EntityId>,
    pub location_name: Option<String>,

    pub rack_id: Option<EntityId>,
    pub rack_name: Option<String>,
    pub rack_u_height: Option<u32>,

    pub device_id: Option<EntityId>,
    pub device_name: Option<String>,
    pub device_status: Option<String>,
    pub device_position: Option<String>,
    pub device_type_u_height: Option<u32>,
    pub device_type_model: Option<String>,

    pub interface_name: Option<String>,
    pub interface_type: Option<String>,
}

/// One row of the device inventory join:
/// devices ⋈ device_types ⋈ manufacturers ⟕ racks ⟕ tenants ⟕ interfaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInventoryRow {
    pub device_id: Option<EntityId>,
    pub device_name: Option<String>,
    pub device_status: Option<String>,
    pub serial_number: Option<String>,
    pub asset_tag: Option<String>,

    pub device_type_model: Option<String>,
    pub manufacturer_name: Option<String>,
    pub device_type_u_height: Option<u32>,

    pub rack_name: Option<String>,
    pub device_position: Option<String>,

    pub tenant_id: Option<EntityId>,
    pub tenant_name: Option<String>,

    pub interface_name: Option<String>,
    pub interface_type: Option<String>,
}

// ── Flat export rows ─────────────────────────────────────────────────
//
// These shapes are exported one row per record; no tree is involved.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableRow {
    pub label: String,
    pub cable_type: String,
    pub status: String,
    pub termination_a_type: String,
    pub termination_a_id: String,
    pub termination_b_type: String,
    pub termination_b_id: String,
    pub length: Option<String>,
    pub color: Option<String>,
    pub tenant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLogRow {
    pub personnel_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub access_type: String,
    pub status: String,
    #[serde(default)]
    pub site_id: Option<EntityId>,
    pub site_name: String,
    pub check_in_at: DateTime<Utc>,
    #[serde(default)]
    pub actual_check_out_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub badge_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerPanelRow {
    pub name: String,
    pub site_name: String,
    pub location: Option<String>,
    pub rated_capacity_kw: f64,
    pub voltage_v: f64,
    pub phase_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerFeedRow {
    pub name: String,
    pub panel_name: String,
    pub rack_name: Option<String>,
    pub feed_type: String,
    pub max_amps: f64,
    pub rated_kw: f64,
}
