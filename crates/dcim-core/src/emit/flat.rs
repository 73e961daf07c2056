// ── Tree flattening ──
//
// One record per deepest reachable node, with ancestor attributes copied
// in by name. The rack sheet is rack-driven: a rack without devices
// still yields a row, a location without racks does not.

use serde::Serialize;

use crate::model::{DeviceNode, SiteNode};

use super::sheet::{Cell, SheetRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RackSheetRecord {
    pub rack: String,
    pub location: String,
    pub site: String,
    pub u_height: u32,
    pub device: String,
    pub position: String,
    pub device_type: String,
    pub status: String,
}

impl SheetRecord for RackSheetRecord {
    const SHEET: &'static str = "Racks";
    const HEADERS: &'static [&'static str] = &[
        "Rack Name",
        "Location",
        "Site",
        "U-Height",
        "Device Name",
        "Position",
        "Device Type",
        "Status",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.rack.as_str().into(),
            self.location.as_str().into(),
            self.site.as_str().into(),
            self.u_height.into(),
            self.device.as_str().into(),
            self.position.as_str().into(),
            self.device_type.as_str().into(),
            self.status.as_str().into(),
        ]
    }
}

pub fn flatten_sites(sites: &[SiteNode]) -> Vec<RackSheetRecord> {
    let mut out = Vec::new();
    for site in sites {
        for location in &site.locations {
            for rack in &location.racks {
                let record = |device: &str, position: &str, model: &str, status: &str| {
                    RackSheetRecord {
                        rack: rack.name.clone(),
                        location: location.name.clone(),
                        site: site.name.clone(),
                        u_height: rack.u_height,
                        device: device.to_owned(),
                        position: position.to_owned(),
                        device_type: model.to_owned(),
                        status: status.to_owned(),
                    }
                };
                if rack.devices.is_empty() {
                    out.push(record("", "", "", ""));
                }
                out.extend(
                    rack.devices
                        .iter()
                        .map(|d| record(&d.name, &d.position, &d.model, &d.status)),
                );
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSheetRecord {
    pub name: String,
    pub device_type: String,
    pub manufacturer: String,
    pub rack: String,
    pub position: String,
    pub status: String,
    pub serial: String,
    pub asset_tag: String,
    pub tenant: String,
}

impl From<&DeviceNode> for DeviceSheetRecord {
    fn from(device: &DeviceNode) -> Self {
        let (rack, position) = device
            .rack
            .as_ref()
            .map(|r| (r.name.clone(), r.position.clone()))
            .unwrap_or_default();
        Self {
            name: device.name.clone(),
            device_type: device.device_type.model.clone(),
            manufacturer: device.device_type.manufacturer.clone(),
            rack,
            position,
            status: device.status.clone(),
            serial: device.serial_number.clone(),
            asset_tag: device.asset_tag.clone(),
            tenant: device
                .tenant
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
        }
    }
}

impl SheetRecord for DeviceSheetRecord {
    const SHEET: &'static str = "Devices";
    const HEADERS: &'static [&'static str] = &[
        "Name",
        "Type",
        "Manufacturer",
        "Rack",
        "Position",
        "Status",
        "Serial",
        "Asset Tag",
        "Tenant",
    ];

    fn cells(&self) -> Vec<Cell> {
        [
            &self.name,
            &self.device_type,
            &self.manufacturer,
            &self.rack,
            &self.position,
            &self.status,
            &self.serial,
            &self.asset_tag,
            &self.tenant,
        ]
        .into_iter()
        .map(|s| Cell::Text(s.clone()))
        .collect()
    }
}

/// One record per device; interfaces are not part of the sheet.
pub fn flatten_devices(devices: &[DeviceNode]) -> Vec<DeviceSheetRecord> {
    devices.iter().map(DeviceSheetRecord::from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        DeviceTypeRef, EntityId, LocationNode, RackDeviceNode, RackNode, RackRef, TenantRef,
    };
    use pretty_assertions::assert_eq;

    fn rack(id: &str, devices: Vec<RackDeviceNode>) -> RackNode {
        RackNode {
            id: id.into(),
            name: id.to_owned(),
            u_height: 42,
            devices,
        }
    }

    fn device(name: &str, position: &str) -> RackDeviceNode {
        RackDeviceNode {
            id: name.into(),
            name: name.to_owned(),
            status: "active".into(),
            position: position.to_owned(),
            height: 2,
            model: "R740".into(),
            interfaces: Vec::new(),
        }
    }

    #[test]
    fn racks_flatten_with_inherited_names() {
        let sites = vec![SiteNode {
            id: "S1".into(),
            name: "Amsterdam".into(),
            locations: vec![
                LocationNode {
                    id: "L1".into(),
                    name: "Hall A".into(),
                    racks: vec![
                        rack("A01", vec![device("db-1", "10"), device("db-2", "12")]),
                        rack("A02", vec![]),
                    ],
                },
                LocationNode {
                    id: "L2".into(),
                    name: "Hall B".into(),
                    racks: vec![],
                },
            ],
        }];

        let records = flatten_sites(&sites);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].site, "Amsterdam");
        assert_eq!(records[0].location, "Hall A");
        assert_eq!(records[1].device, "db-2");
        assert_eq!(records[1].position, "12");
        assert_eq!(records[2].rack, "A02");
        assert_eq!(records[2].device, "");
        assert_eq!(records[2].u_height, 42);
    }

    #[test]
    fn device_record_uses_references() {
        let node = DeviceNode {
            id: EntityId::Numeric(5),
            name: "edge-1".into(),
            status: "planned".into(),
            serial_number: "SN5".into(),
            asset_tag: String::new(),
            device_type: DeviceTypeRef {
                model: "MX204".into(),
                manufacturer: "Juniper".into(),
                u_height: 1,
            },
            rack: Some(RackRef {
                name: "B03".into(),
                position: "40".into(),
            }),
            tenant: Some(TenantRef {
                id: None,
                name: "Acme".into(),
            }),
            interfaces: Vec::new(),
        };
        let records = flatten_devices(&[node]);
        let cells: Vec<String> = records[0].cells().iter().map(ToString::to_string).collect();
        assert_eq!(
            cells,
            vec!["edge-1", "MX204", "Juniper", "B03", "40", "planned", "SN5", "", "Acme"]
        );
    }
}
