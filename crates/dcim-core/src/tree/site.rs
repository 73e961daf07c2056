// ── Site hierarchy builder ──

use crate::extract::{
    Extracted, Keyed, LocationAttrs, RackAttrs, SiteAttrs, extract_site_levels,
};
use crate::grouping::GroupingTable;
use crate::model::{EntityId, LocationNode, RackDeviceNode, RackNode, SiteNode};
use crate::rows::SiteHierarchyRow;

use super::{Materialized, RowAnomaly, TreeBuilder, take_children};

/// A non-leaf node while the build is running: attributes plus the
/// positions of its children in the next level's table.
#[derive(Debug)]
struct Branch<A> {
    id: EntityId,
    attrs: A,
    children: Vec<usize>,
}

impl<A> Branch<A> {
    fn new(Keyed { id, attrs }: Keyed<A>) -> Self {
        Self {
            id,
            attrs,
            children: Vec::new(),
        }
    }
}

/// Look up or create `child` in `children`; on creation, append it to the
/// parent at `parent` in `parents`.
fn get_or_attach<P, C>(
    parents: &mut GroupingTable<EntityId, Branch<P>>,
    parent: usize,
    children: &mut GroupingTable<EntityId, C>,
    id: EntityId,
    create: impl FnOnce(EntityId) -> C,
) -> usize {
    let key = id.clone();
    let slot = children.get_or_create(key, || create(id));
    let (position, created) = (slot.position, slot.created);
    if created {
        if let Some(branch) = parents.get_index_mut(parent) {
            branch.children.push(position);
        }
    }
    position
}

/// Builds Site → Location → Rack → Device → Interface.
///
/// Each level has a single table keyed by origin id: ids are unique in
/// the source, so a location is never looked up through its site.
#[derive(Debug, Default)]
pub struct SiteTreeBuilder {
    sites: GroupingTable<EntityId, Branch<SiteAttrs>>,
    locations: GroupingTable<EntityId, Branch<LocationAttrs>>,
    racks: GroupingTable<EntityId, Branch<RackAttrs>>,
    devices: GroupingTable<EntityId, RackDeviceNode>,
    rows_read: usize,
    anomalies: Vec<RowAnomaly>,
}

impl SiteTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeBuilder for SiteTreeBuilder {
    type Row = SiteHierarchyRow;
    type Node = SiteNode;

    fn push(&mut self, row: SiteHierarchyRow) {
        let index = self.rows_read;
        self.rows_read += 1;

        let Extracted { levels, truncation } = extract_site_levels(row);
        if let Some(truncation) = truncation {
            self.anomalies.push(RowAnomaly::new(index, truncation));
        }

        let Some(site) = levels.site else { return };
        let site_pos = self
            .sites
            .get_or_create(site.id.clone(), || Branch::new(site))
            .position;

        let Some(location) = levels.location else { return };
        let location_pos = get_or_attach(
            &mut self.sites,
            site_pos,
            &mut self.locations,
            location.id,
            |id| Branch::new(Keyed { id, attrs: location.attrs }),
        );

        let Some(rack) = levels.rack else { return };
        let rack_pos = get_or_attach(
            &mut self.locations,
            location_pos,
            &mut self.racks,
            rack.id,
            |id| Branch::new(Keyed { id, attrs: rack.attrs }),
        );

        let Some(device) = levels.device else { return };
        let device_pos = get_or_attach(
            &mut self.racks,
            rack_pos,
            &mut self.devices,
            device.id,
            |id| RackDeviceNode {
                id,
                name: device.attrs.name,
                status: device.attrs.status,
                position: device.attrs.position,
                height: device.attrs.height,
                model: device.attrs.model,
                interfaces: Vec::new(),
            },
        );

        if let Some(interface) = levels.interface {
            if let Some(node) = self.devices.get_index_mut(device_pos) {
                node.interfaces.push(interface);
            }
        }
    }

    fn finish(self) -> Materialized<SiteNode> {
        let mut devices: Vec<Option<RackDeviceNode>> =
            self.devices.into_ordered_values().map(Some).collect();

        let mut racks: Vec<Option<RackNode>> = self
            .racks
            .into_ordered_values()
            .map(|b| {
                Some(RackNode {
                    devices: take_children(&mut devices, &b.children),
                    id: b.id,
                    name: b.attrs.name,
                    u_height: b.attrs.u_height,
                })
            })
            .collect();

        let mut locations: Vec<Option<LocationNode>> = self
            .locations
            .into_ordered_values()
            .map(|b| {
                Some(LocationNode {
                    racks: take_children(&mut racks, &b.children),
                    id: b.id,
                    name: b.attrs.name,
                })
            })
            .collect();

        let roots = self
            .sites
            .into_ordered_values()
            .map(|b| SiteNode {
                locations: take_children(&mut locations, &b.children),
                id: b.id,
                name: b.attrs.name,
            })
            .collect();

        Materialized {
            roots,
            rows_read: self.rows_read,
            anomalies: self.anomalies,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::extract::HierarchyLevel;
    use crate::model::Interface;
    use crate::tree::build_site_tree;
    use pretty_assertions::assert_eq;

    /// Row builder: ids are used as names so assertions stay short.
    fn row(path: &[&str], interface: Option<&str>) -> SiteHierarchyRow {
        let id = |i: usize| path.get(i).map(|s| EntityId::from(*s));
        let name = |i: usize| path.get(i).map(|s| (*s).to_owned());
        SiteHierarchyRow {
            site_id: id(0),
            site_name: name(0),
            location_id: id(1),
            location_name: name(1),
            rack_id: id(2),
            rack_name: name(2),
            rack_u_height: path.get(2).map(|_| 42),
            device_id: id(3),
            device_name: name(3),
            device_status: path.get(3).map(|_| "active".to_owned()),
            device_position: path.get(3).map(|_| "1".to_owned()),
            device_type_u_height: path.get(3).map(|_| 1),
            device_type_model: path.get(3).map(|_| "M1".to_owned()),
            interface_name: interface.map(str::to_owned),
            interface_type: interface.map(|_| "1000base-t".to_owned()),
        }
    }

    fn build(rows: Vec<SiteHierarchyRow>) -> Materialized<SiteNode> {
        build_site_tree(rows.into_iter().map(Ok::<_, CoreError>)).unwrap()
    }

    fn ids<'a>(names: impl Iterator<Item = &'a EntityId>) -> Vec<String> {
        names.map(ToString::to_string).collect()
    }

    #[test]
    fn empty_stream_yields_empty_roots() {
        let tree = build(vec![]);
        assert!(tree.roots.is_empty());
        assert_eq!(tree.rows_read, 0);
    }

    #[test]
    fn duplicate_site_rows_collapse() {
        // [(S1,"Alpha"), (S1,"Alpha")]
        let alpha = SiteHierarchyRow {
            site_id: Some("S1".into()),
            site_name: Some("Alpha".into()),
            ..SiteHierarchyRow::default()
        };
        let tree = build(vec![alpha.clone(), alpha]);
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].name, "Alpha");
        assert!(tree.roots[0].locations.is_empty());
    }

    #[test]
    fn interfaces_collect_under_one_device_chain() {
        let tree = build(vec![
            row(&["S1", "L1", "R1", "D1"], Some("eth0")),
            row(&["S1", "L1", "R1", "D1"], Some("eth1")),
        ]);
        assert_eq!(tree.roots.len(), 1);
        let location = &tree.roots[0].locations;
        assert_eq!(location.len(), 1);
        let racks = &location[0].racks;
        assert_eq!(racks.len(), 1);
        let devices = &racks[0].devices;
        assert_eq!(devices.len(), 1);
        assert_eq!(
            devices[0].interfaces,
            vec![
                Interface::new("eth0", "1000base-t"),
                Interface::new("eth1", "1000base-t")
            ]
        );
    }

    #[test]
    fn racks_without_devices_are_kept_empty() {
        let tree = build(vec![
            row(&["S1", "L1", "R1"], None),
            row(&["S1", "L1", "R2"], None),
        ]);
        let racks = &tree.roots[0].locations[0].racks;
        assert_eq!(ids(racks.iter().map(|r| &r.id)), vec!["R1", "R2"]);
        assert!(racks.iter().all(|r| r.devices.is_empty()));
    }

    #[test]
    fn roots_follow_arrival_not_key_order() {
        let tree = build(vec![row(&["S2"], None), row(&["S1"], None)]);
        assert_eq!(ids(tree.roots.iter().map(|s| &s.id)), vec!["S2", "S1"]);
    }

    #[test]
    fn each_level_keeps_first_appearance_order() {
        let tree = build(vec![
            row(&["S1", "L2", "R9", "D5"], None),
            row(&["S1", "L1", "R3", "D2"], None),
            row(&["S1", "L2", "R1", "D1"], None),
            row(&["S1", "L2", "R9", "D0"], None),
        ]);
        let site = &tree.roots[0];
        assert_eq!(ids(site.locations.iter().map(|l| &l.id)), vec!["L2", "L1"]);
        let l2 = &site.locations[0];
        assert_eq!(ids(l2.racks.iter().map(|r| &r.id)), vec!["R9", "R1"]);
        assert_eq!(ids(l2.racks[0].devices.iter().map(|d| &d.id)), vec!["D5", "D0"]);
        assert_eq!(site.rack_count(), 3);
    }

    #[test]
    fn first_write_wins_for_attributes() {
        let mut later = row(&["S1", "L1"], None);
        later.site_name = Some("Renamed".into());
        later.location_name = Some("Renamed".into());
        let tree = build(vec![row(&["S1", "L1"], None), later]);
        assert_eq!(tree.roots[0].name, "S1");
        assert_eq!(tree.roots[0].locations[0].name, "L1");
    }

    #[test]
    fn interface_leaf_list_is_not_deduplicated() {
        let tree = build(vec![
            row(&["S1", "L1", "R1", "D1"], Some("eth0")),
            row(&["S1", "L1", "R1", "D1"], Some("eth0")),
        ]);
        let device = &tree.roots[0].locations[0].racks[0].devices[0];
        assert_eq!(device.interfaces.len(), 2);
    }

    #[test]
    fn interleaved_devices_keep_their_own_interfaces() {
        let tree = build(vec![
            row(&["S1", "L1", "R1", "D1"], Some("eth0")),
            row(&["S1", "L1", "R1", "D2"], Some("eth0")),
            row(&["S1", "L1", "R1", "D1"], Some("eth1")),
        ]);
        let devices = &tree.roots[0].locations[0].racks[0].devices;
        assert_eq!(ids(devices.iter().map(|d| &d.id)), vec!["D1", "D2"]);
        assert_eq!(
            devices[0].interfaces,
            vec![
                Interface::new("eth0", "1000base-t"),
                Interface::new("eth1", "1000base-t")
            ]
        );
        assert_eq!(devices[1].interfaces, vec![Interface::new("eth0", "1000base-t")]);
    }

    #[test]
    fn uuid_shaped_keys_are_not_normalized() {
        let rows: Vec<SiteHierarchyRow> = serde_json::from_str(
            r#"[
                {"site_id": "550E8400-E29B-41D4-A716-446655440000", "site_name": "Upper"},
                {"site_id": "550e8400-e29b-41d4-a716-446655440000", "site_name": "Lower"},
                {"site_id": "0123456789abcdef0123456789abcdef", "site_name": "Hex"}
            ]"#,
        )
        .unwrap();
        let tree = build(rows);
        assert_eq!(
            ids(tree.roots.iter().map(|s| &s.id)),
            vec![
                "550E8400-E29B-41D4-A716-446655440000",
                "550e8400-e29b-41d4-a716-446655440000",
                "0123456789abcdef0123456789abcdef"
            ]
        );
        let names: Vec<&str> = tree.roots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Upper", "Lower", "Hex"]);
    }

    #[test]
    fn device_without_interface_still_created() {
        let tree = build(vec![row(&["S1", "L1", "R1", "D1"], None)]);
        let device = &tree.roots[0].locations[0].racks[0].devices[0];
        assert_eq!(device.name, "D1");
        assert!(device.interfaces.is_empty());
    }

    #[test]
    fn malformed_row_is_truncated_and_reported() {
        let mut broken = row(&["S1", "L1", "R1", "D9"], Some("eth0"));
        broken.rack_id = None;
        let tree = build(vec![row(&["S1", "L1", "R1", "D1"], None), broken]);

        let location = &tree.roots[0].locations[0];
        assert_eq!(location.racks.len(), 1);
        assert_eq!(ids(location.racks[0].devices.iter().map(|d| &d.id)), vec!["D1"]);
        assert_eq!(
            tree.anomalies,
            vec![RowAnomaly {
                row: 1,
                missing: HierarchyLevel::Rack,
                ignored: vec![HierarchyLevel::Device, HierarchyLevel::Interface],
            }]
        );
    }

    #[test]
    fn absent_site_row_does_not_disturb_earlier_nodes() {
        let mut orphan = row(&["S9", "L9"], None);
        orphan.site_id = None;
        let tree = build(vec![row(&["S1", "L1"], None), orphan, row(&["S1", "L2"], None)]);
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(
            ids(tree.roots[0].locations.iter().map(|l| &l.id)),
            vec!["L1", "L2"]
        );
        assert_eq!(tree.rows_read, 3);
    }

    #[test]
    fn row_read_failure_aborts_the_build() {
        let rows: Vec<Result<SiteHierarchyRow, std::io::Error>> = vec![
            Ok(row(&["S1"], None)),
            Err(std::io::Error::other("connection reset")),
            Ok(row(&["S2"], None)),
        ];
        let err = build_site_tree(rows).unwrap_err();
        match err {
            CoreError::RowRead { row, source } => {
                assert_eq!(row, 1);
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn push_and_finish_directly() {
        let mut builder = SiteTreeBuilder::new();
        builder.push(row(&["S1", "L1", "R1"], None));
        builder.push(row(&["S2"], None));
        let tree = builder.finish();
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].locations[0].racks[0].u_height, 42);
    }
}
