// ── Device-centric node types ──
//
// Device → Interface. Rack and tenant are references carried as leaf
// attributes, not nesting levels.

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::interface::Interface;

/// Canonical device node for the device-centric export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceNode {
    pub id: EntityId,
    pub name: String,
    pub status: String,
    pub serial_number: String,
    pub asset_tag: String,
    pub device_type: DeviceTypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<RackRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTypeRef {
    pub model: String,
    pub manufacturer: String,
    pub u_height: u32,
}

/// Where a device is mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackRef {
    pub name: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRef {
    /// Present when the row source selected the tenant key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
}
