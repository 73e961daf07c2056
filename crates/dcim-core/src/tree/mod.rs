// ── Tree materialization ──
//
// Drives the extractor and one grouping table per level over a row
// stream, then folds the tables into owned nested nodes. Children are
// attached to their parent exactly once, when they are first created.

mod device;
mod site;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CoreError, SourceError};
use crate::extract::{HierarchyLevel, Truncation};

pub use device::DeviceTreeBuilder;
pub use site::SiteTreeBuilder;

/// A row that violated absence-monotonicity and was truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAnomaly {
    /// Zero-based index of the row in the source stream.
    pub row: usize,
    pub missing: HierarchyLevel,
    pub ignored: Vec<HierarchyLevel>,
}

impl RowAnomaly {
    pub(crate) fn new(row: usize, truncation: Truncation) -> Self {
        warn!(row, %truncation, "malformed row truncated");
        Self {
            row,
            missing: truncation.missing,
            ignored: truncation.ignored,
        }
    }
}

/// The outcome of one build: root nodes in discovery order plus what the
/// builder had to truncate along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Materialized<N> {
    pub roots: Vec<N>,
    pub rows_read: usize,
    pub anomalies: Vec<RowAnomaly>,
}

impl<N> Materialized<N> {
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            rows_read: 0,
            anomalies: Vec::new(),
        }
    }

    /// Merge trees built independently over disjoint top-level entities.
    ///
    /// Parts are ordered by the caller's `key` (stable for equal keys),
    /// never by the order they finished in. Each part keeps its internal
    /// order; anomaly row indices are rebased onto the merged stream.
    pub fn merge_ordered<K: Ord>(parts: impl IntoIterator<Item = (K, Self)>) -> Self {
        let mut parts: Vec<(K, Self)> = parts.into_iter().collect();
        parts.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged = Self::empty();
        for (_, part) in parts {
            let offset = merged.rows_read;
            merged.roots.extend(part.roots);
            merged
                .anomalies
                .extend(part.anomalies.into_iter().map(|mut a| {
                    a.row += offset;
                    a
                }));
            merged.rows_read += part.rows_read;
        }
        merged
    }
}

/// A single-use, single-threaded builder fed one row at a time.
pub trait TreeBuilder {
    type Row;
    type Node;

    /// Fold one row into the tables.
    fn push(&mut self, row: Self::Row);

    /// Consume the builder and produce the nested tree.
    fn finish(self) -> Materialized<Self::Node>;
}

/// Run `builder` over a fallible row stream.
///
/// A row-read failure aborts the build: the partial tree is dropped, the
/// error returned, and no further rows are pulled. A source cancels by
/// yielding an error; callers driving [`TreeBuilder::push`] themselves
/// cancel by dropping the builder before `finish`. Nothing partial escapes.
pub fn materialize<B, I, E>(mut builder: B, rows: I) -> Result<Materialized<B::Node>, CoreError>
where
    B: TreeBuilder,
    I: IntoIterator<Item = Result<B::Row, E>>,
    E: Into<SourceError>,
{
    for (index, row) in rows.into_iter().enumerate() {
        let row = row.map_err(|e| CoreError::RowRead {
            row: index,
            source: e.into(),
        })?;
        builder.push(row);
    }
    let tree = builder.finish();
    debug!(
        rows = tree.rows_read,
        roots = tree.roots.len(),
        anomalies = tree.anomalies.len(),
        "tree materialized"
    );
    Ok(tree)
}

/// Build the Site → Location → Rack → Device → Interface tree.
pub fn build_site_tree<I, E>(rows: I) -> Result<Materialized<crate::model::SiteNode>, CoreError>
where
    I: IntoIterator<Item = Result<crate::rows::SiteHierarchyRow, E>>,
    E: Into<SourceError>,
{
    materialize(SiteTreeBuilder::new(), rows)
}

/// Build the Device → Interface tree.
pub fn build_device_tree<I, E>(rows: I) -> Result<Materialized<crate::model::DeviceNode>, CoreError>
where
    I: IntoIterator<Item = Result<crate::rows::DeviceInventoryRow, E>>,
    E: Into<SourceError>,
{
    materialize(DeviceTreeBuilder::new(), rows)
}

/// Move the nodes at `positions` out of `pool`, in that order.
///
/// Every child has exactly one parent, so each slot is taken once.
fn take_children<T>(pool: &mut [Option<T>], positions: &[usize]) -> Vec<T> {
    positions
        .iter()
        .filter_map(|&p| pool.get_mut(p).and_then(Option::take))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn part(names: &[&str], rows: usize, anomaly_row: Option<usize>) -> Materialized<String> {
        Materialized {
            roots: names.iter().map(|s| (*s).to_owned()).collect(),
            rows_read: rows,
            anomalies: anomaly_row
                .map(|row| RowAnomaly {
                    row,
                    missing: HierarchyLevel::Location,
                    ignored: vec![HierarchyLevel::Rack],
                })
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn merge_orders_by_caller_key_not_arrival() {
        let merged = Materialized::merge_ordered([
            ("site-b", part(&["B"], 3, None)),
            ("site-a", part(&["A1", "A2"], 2, None)),
        ]);
        assert_eq!(merged.roots, vec!["A1", "A2", "B"]);
        assert_eq!(merged.rows_read, 5);
    }

    #[test]
    fn merge_rebases_anomaly_rows() {
        let merged = Materialized::merge_ordered([
            (1, part(&["A"], 4, Some(1))),
            (2, part(&["B"], 3, Some(0))),
        ]);
        let rows: Vec<usize> = merged.anomalies.iter().map(|a| a.row).collect();
        assert_eq!(rows, vec![1, 4]);
    }

    #[test]
    fn cancelled_source_stops_the_build() {
        use crate::rows::SiteHierarchyRow;
        use std::cell::Cell;

        let pulled = Cell::new(0);
        let rows = std::iter::from_fn(|| {
            pulled.set(pulled.get() + 1);
            Some(match pulled.get() {
                1 => Ok(SiteHierarchyRow {
                    site_id: Some("S1".into()),
                    site_name: Some("Alpha".into()),
                    ..SiteHierarchyRow::default()
                }),
                _ => Err(std::io::Error::other("cancelled")),
            })
        });

        let err = build_site_tree(rows).unwrap_err();
        assert!(matches!(err, CoreError::RowRead { row: 1, .. }));
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn take_children_moves_each_slot_once() {
        let mut pool = vec![Some("a"), Some("b"), Some("c")];
        assert_eq!(take_children(&mut pool, &[2, 0]), vec!["c", "a"]);
        assert_eq!(take_children(&mut pool, &[0, 1]), vec!["b"]);
    }
}
