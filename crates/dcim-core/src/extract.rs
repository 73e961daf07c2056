// ── Level key extraction ──
//
// Turns one raw join row into an explicit per-level view: each hierarchy
// level is either `Some(Keyed)` or `None`. A level is present iff its
// identifier column is non-null. Absence is monotonic: once a level is
// absent every deeper level is dropped, whatever the raw row says, and
// the dropped levels are reported as a `Truncation`.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumString};

use crate::model::{DeviceTypeRef, EntityId, Interface, RackRef, TenantRef};
use crate::rows::{DeviceInventoryRow, SiteHierarchyRow};

/// Rank in a materialized hierarchy, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HierarchyLevel {
    Site,
    Location,
    Rack,
    Device,
    Interface,
}

/// A present level: its origin key plus the attributes observed on this row.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<A> {
    pub id: EntityId,
    pub attrs: A,
}

/// Levels dropped from a row because a shallower level was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// The first absent level.
    pub missing: HierarchyLevel,
    /// Deeper levels that carried data and were ignored.
    pub ignored: Vec<HierarchyLevel>,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ignored: Vec<String> = self.ignored.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} missing, ignored {}",
            self.missing,
            ignored.join(", ")
        )
    }
}

/// Result of extracting one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<L> {
    pub levels: L,
    pub truncation: Option<Truncation>,
}

/// Count the leading present levels and report anything present past them.
fn present_depth(presence: &[(HierarchyLevel, bool)]) -> (usize, Option<Truncation>) {
    let depth = presence.iter().take_while(|(_, present)| *present).count();
    let Some(&(missing, _)) = presence.get(depth) else {
        return (depth, None);
    };
    let ignored: Vec<HierarchyLevel> = presence
        .iter()
        .skip(depth + 1)
        .filter(|(_, present)| *present)
        .map(|(level, _)| *level)
        .collect();
    let truncation = (!ignored.is_empty()).then_some(Truncation { missing, ignored });
    (depth, truncation)
}

fn keyed<A>(id: Option<EntityId>, keep: bool, attrs: impl FnOnce() -> A) -> Option<Keyed<A>> {
    id.filter(|_| keep).map(|id| Keyed { id, attrs: attrs() })
}

fn interface(name: Option<String>, interface_type: Option<String>, keep: bool) -> Option<Interface> {
    name.filter(|_| keep).map(|name| Interface {
        name,
        interface_type: interface_type.unwrap_or_default(),
    })
}

// ── Site hierarchy ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAttrs {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationAttrs {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackAttrs {
    pub name: String,
    pub u_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackDeviceAttrs {
    pub name: String,
    pub status: String,
    pub position: String,
    pub height: u32,
    pub model: String,
}

/// Per-level view of a [`SiteHierarchyRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLevels {
    pub site: Option<Keyed<SiteAttrs>>,
    pub location: Option<Keyed<LocationAttrs>>,
    pub rack: Option<Keyed<RackAttrs>>,
    pub device: Option<Keyed<RackDeviceAttrs>>,
    pub interface: Option<Interface>,
}

pub fn extract_site_levels(row: SiteHierarchyRow) -> Extracted<SiteLevels> {
    let (depth, truncation) = present_depth(&[
        (HierarchyLevel::Site, row.site_id.is_some()),
        (HierarchyLevel::Location, row.location_id.is_some()),
        (HierarchyLevel::Rack, row.rack_id.is_some()),
        (HierarchyLevel::Device, row.device_id.is_some()),
        (HierarchyLevel::Interface, row.interface_name.is_some()),
    ]);

    let levels = SiteLevels {
        site: keyed(row.site_id, depth > 0, || SiteAttrs {
            name: row.site_name.unwrap_or_default(),
        }),
        location: keyed(row.location_id, depth > 1, || LocationAttrs {
            name: row.location_name.unwrap_or_default(),
        }),
        rack: keyed(row.rack_id, depth > 2, || RackAttrs {
            name: row.rack_name.unwrap_or_default(),
            u_height: row.rack_u_height.unwrap_or_default(),
        }),
        device: keyed(row.device_id, depth > 3, || RackDeviceAttrs {
            name: row.device_name.unwrap_or_default(),
            status: row.device_status.unwrap_or_default(),
            position: row.device_position.unwrap_or_default(),
            height: row.device_type_u_height.unwrap_or_default(),
            model: row.device_type_model.unwrap_or_default(),
        }),
        interface: interface(row.interface_name, row.interface_type, depth > 4),
    };

    Extracted { levels, truncation }
}

// ── Device inventory ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttrs {
    pub name: String,
    pub status: String,
    pub serial_number: String,
    pub asset_tag: String,
    pub device_type: DeviceTypeRef,
    pub rack: Option<RackRef>,
    pub tenant: Option<TenantRef>,
}

/// Per-level view of a [`DeviceInventoryRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceLevels {
    pub device: Option<Keyed<DeviceAttrs>>,
    pub interface: Option<Interface>,
}

pub fn extract_device_levels(row: DeviceInventoryRow) -> Extracted<DeviceLevels> {
    let (depth, truncation) = present_depth(&[
        (HierarchyLevel::Device, row.device_id.is_some()),
        (HierarchyLevel::Interface, row.interface_name.is_some()),
    ]);

    let position = row.device_position;
    let rack = row.rack_name.map(|name| RackRef {
        name,
        position: position.unwrap_or_default(),
    });
    let tenant_id = row.tenant_id;
    let tenant = row.tenant_name.map(|name| TenantRef {
        id: tenant_id,
        name,
    });

    let levels = DeviceLevels {
        device: keyed(row.device_id, depth > 0, || DeviceAttrs {
            name: row.device_name.unwrap_or_default(),
            status: row.device_status.unwrap_or_default(),
            serial_number: row.serial_number.unwrap_or_default(),
            asset_tag: row.asset_tag.unwrap_or_default(),
            device_type: DeviceTypeRef {
                model: row.device_type_model.unwrap_or_default(),
                manufacturer: row.manufacturer_name.unwrap_or_default(),
                u_height: row.device_type_u_height.unwrap_or_default(),
            },
            rack,
            tenant,
        }),
        interface: interface(row.interface_name, row.interface_type, depth > 1),
    };

    Extracted { levels, truncation }
}
