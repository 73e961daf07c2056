//! Row-to-tree materialization for DCIM inventory exports.
//!
//! The query layer hands back flat outer-join rows; this crate turns them
//! into nested, ordered, deduplicated trees and serializes those trees:
//!
//! - **[`extract`]** — Per-row level extraction. Each hierarchy level is
//!   present or absent, and absence is monotonic with depth: anything
//!   below an absent level is dropped and reported as a [`RowAnomaly`].
//!
//! - **[`GroupingTable`]** — Keyed lookup-or-create that preserves
//!   first-insertion order. One per hierarchy level per build.
//!
//! - **Tree builders** ([`tree`]) — [`SiteTreeBuilder`] (Site → Location →
//!   Rack → Device → Interface) and [`DeviceTreeBuilder`] (Device →
//!   Interface). Children are attached to their parent once, at creation;
//!   [`build_site_tree`] / [`build_device_tree`] drive them over a
//!   fallible row stream and fail the whole build on a row-read error.
//!
//! - **Emission** ([`emit`]) — Nested XML documents and flattened
//!   worksheets for download sinks.
//!
//! - **Power readings** ([`power`]) — Batch validation, synthetic series
//!   and a cancellable stream of simulated live readings.

pub mod emit;
pub mod error;
pub mod extract;
pub mod filter;
pub mod grouping;
pub mod model;
pub mod power;
pub mod rows;
pub mod tree;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, SourceError};
pub use filter::{AccessFilter, DeviceFilter};
pub use grouping::GroupingTable;
pub use tree::{
    DeviceTreeBuilder, Materialized, RowAnomaly, SiteTreeBuilder, TreeBuilder, build_device_tree,
    build_site_tree, materialize,
};

pub use model::{
    DeviceNode, DeviceTypeRef, EntityId, Interface, LocationNode, RackDeviceNode, RackNode,
    RackRef, SiteNode, TenantRef,
};
pub use rows::{
    AccessLogRow, CableRow, DeviceInventoryRow, PowerFeedRow, PowerPanelRow, SiteHierarchyRow,
};
