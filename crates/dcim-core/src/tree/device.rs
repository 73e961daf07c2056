// ── Device inventory builder ──

use crate::extract::{Extracted, extract_device_levels};
use crate::grouping::GroupingTable;
use crate::model::{DeviceNode, EntityId};
use crate::rows::DeviceInventoryRow;

use super::{Materialized, RowAnomaly, TreeBuilder};

/// Builds Device → Interface. Devices are roots; rack and tenant ride
/// along as first-seen reference attributes.
#[derive(Debug, Default)]
pub struct DeviceTreeBuilder {
    devices: GroupingTable<EntityId, DeviceNode>,
    rows_read: usize,
    anomalies: Vec<RowAnomaly>,
}

impl DeviceTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeBuilder for DeviceTreeBuilder {
    type Row = DeviceInventoryRow;
    type Node = DeviceNode;

    fn push(&mut self, row: DeviceInventoryRow) {
        let index = self.rows_read;
        self.rows_read += 1;

        let Extracted { levels, truncation } = extract_device_levels(row);
        if let Some(truncation) = truncation {
            self.anomalies.push(RowAnomaly::new(index, truncation));
        }

        let Some(device) = levels.device else { return };
        let key = device.id.clone();
        let slot = self.devices.get_or_create(key, || {
            let attrs = device.attrs;
            DeviceNode {
                id: device.id,
                name: attrs.name,
                status: attrs.status,
                serial_number: attrs.serial_number,
                asset_tag: attrs.asset_tag,
                device_type: attrs.device_type,
                rack: attrs.rack,
                tenant: attrs.tenant,
                interfaces: Vec::new(),
            }
        });

        if let Some(interface) = levels.interface {
            slot.value.interfaces.push(interface);
        }
    }

    fn finish(self) -> Materialized<DeviceNode> {
        Materialized {
            roots: self.devices.into_ordered_values().collect(),
            rows_read: self.rows_read,
            anomalies: self.anomalies,
        }
    }
}
