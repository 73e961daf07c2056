// ── Site hierarchy node types ──
//
// Site → Location → Rack → Device → Interface. One named type per level,
// each with a fixed attribute set and an ordered child collection.

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::interface::Interface;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteNode {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<LocationNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub racks: Vec<RackNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackNode {
    pub id: EntityId,
    pub name: String,
    /// Rack capacity in rack units.
    pub u_height: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<RackDeviceNode>,
}

/// A device as seen from inside a rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackDeviceNode {
    pub id: EntityId,
    pub name: String,
    pub status: String,
    /// Mounting position inside the rack (empty when unmounted).
    pub position: String,
    /// Height of the device type in rack units.
    pub height: u32,
    /// Device type model name.
    pub model: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
}

impl SiteNode {
    /// Total number of racks below this site.
    pub fn rack_count(&self) -> usize {
        self.locations.iter().map(|l| l.racks.len()).sum()
    }
}
