// ── Ordered grouping table ──
//
// Keyed lookup-or-create that remembers first-insertion order.
// One table per hierarchy level per build; nothing is ever removed, so
// the position handed out on creation stays valid for the table's life.

use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::Entry;

/// A mapping from key to node that also records first-seen order.
///
/// Backed by `IndexMap`: O(1) lookups, iteration in insertion order.
#[derive(Debug, Clone)]
pub struct GroupingTable<K, V> {
    entries: IndexMap<K, V>,
}

/// The entry returned by [`GroupingTable::get_or_create`].
#[derive(Debug)]
pub struct Slot<'a, V> {
    /// First-seen position of the key.
    pub position: usize,
    pub value: &'a mut V,
    /// `true` if the entry was built by this call.
    pub created: bool,
}

impl<K: Hash + Eq, V> GroupingTable<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Return the entry for `key`, building it with `factory` on first sight.
    ///
    /// `factory` only runs when the key is new; an existing entry is never
    /// replaced (first-write-wins).
    pub fn get_or_create(&mut self, key: K, factory: impl FnOnce() -> V) -> Slot<'_, V> {
        match self.entries.entry(key) {
            Entry::Occupied(e) => Slot {
                position: e.index(),
                value: e.into_mut(),
                created: false,
            },
            Entry::Vacant(e) => {
                let position = e.index();
                Slot {
                    position,
                    value: e.insert(factory()),
                    created: true,
                }
            }
        }
    }

    /// Values in first-seen order. The iterator is cheap to clone, so the
    /// sequence can be restarted.
    pub fn ordered_values(&self) -> indexmap::map::Values<'_, K, V> {
        self.entries.values()
    }

    /// Consume the table, yielding values in first-seen order.
    pub fn into_ordered_values(self) -> indexmap::map::IntoValues<K, V> {
        self.entries.into_values()
    }

    pub fn get_index_mut(&mut self, position: usize) -> Option<&mut V> {
        self.entries.get_index_mut(position).map(|(_, v)| v)
    }
}

impl<K: Hash + Eq, V> Default for GroupingTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
