//! Ordered, keyed row storage bound to list widgets by the UI layer.
//!
//! # Invariants
//! - Keys are generated once and never reused by the same `RowList`.
//! - `index` maps every live key to its current position.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Stable identifier of one row within a [`RowList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey(u64);

impl Display for RowKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// Ordered sequence of fixed-shape rows addressed by stable keys.
#[derive(Debug, Clone)]
pub struct RowList<R> {
    rows: Vec<(RowKey, R)>,
    index: HashMap<RowKey, usize>,
    next_key: u64,
}

impl<R> Default for RowList<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            next_key: 0,
        }
    }
}

impl<R> RowList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and returns its key.
    pub fn append(&mut self, row: R) -> RowKey {
        let key = RowKey(self.next_key);
        self.next_key += 1;
        self.index.insert(key, self.rows.len());
        self.rows.push((key, row));
        key
    }

    /// Replaces the row stored under `key`. Returns `false` for unknown keys.
    pub fn update(&mut self, key: RowKey, row: R) -> bool {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the row stored under `key`.
    pub fn remove(&mut self, key: RowKey) -> Option<R> {
        let position = self.index.remove(&key)?;
        let (_, row) = self.rows.remove(position);
        for (shifted, (moved_key, _)) in self.rows.iter().enumerate().skip(position) {
            self.index.insert(*moved_key, shifted);
        }
        Some(row)
    }

    /// Drops every row. Keys handed out before stay invalid afterwards.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.index.clear();
    }

    pub fn get(&self, key: RowKey) -> Option<&R> {
        let position = *self.index.get(&key)?;
        self.rows.get(position).map(|(_, row)| row)
    }

    pub fn get_mut(&mut self, key: RowKey) -> Option<&mut R> {
        let position = *self.index.get(&key)?;
        self.rows.get_mut(position).map(|(_, row)| row)
    }

    /// Current position of `key`, for widgets addressed by index.
    pub fn position(&self, key: RowKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// Row at `position` together with its key.
    pub fn nth(&self, position: usize) -> Option<(RowKey, &R)> {
        self.rows.get(position).map(|(key, row)| (*key, row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates rows in display order.
    pub fn iter(&self) -> impl Iterator<Item = (RowKey, &R)> + '_ {
        self.rows.iter().map(|(key, row)| (*key, row))
    }
}

#[cfg(test)]
mod tests {
    use super::RowList;

    #[test]
    fn append_assigns_distinct_keys_in_order() {
        let mut rows = RowList::new();
        let a = rows.append("a");
        let b = rows.append("b");
        assert_ne!(a, b);
        assert_eq!(rows.position(a), Some(0));
        assert_eq!(rows.position(b), Some(1));
        assert_eq!(rows.iter().map(|(_, row)| *row).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn remove_reindexes_following_rows() {
        let mut rows = RowList::new();
        let a = rows.append("a");
        let b = rows.append("b");
        let c = rows.append("c");

        assert_eq!(rows.remove(a), Some("a"));
        assert_eq!(rows.get(a), None);
        assert_eq!(rows.position(b), Some(0));
        assert_eq!(rows.position(c), Some(1));
        assert_eq!(rows.nth(1), Some((c, &"c")));

        assert!(rows.update(c, "c2"));
        assert_eq!(rows.get(c), Some(&"c2"));
        assert_eq!(rows.remove(a), None);
    }

    #[test]
    fn keys_are_not_reused_after_clear() {
        let mut rows = RowList::new();
        let first = rows.append(1);
        rows.clear();
        assert!(rows.is_empty());
        assert!(!rows.update(first, 2));

        let second = rows.append(3);
        assert_ne!(first, second);
        assert_eq!(rows.len(), 1);
    }
}
