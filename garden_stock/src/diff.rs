//! Snapshot comparison

use std::collections::BTreeMap;

use crate::model::{Category, CategoryItems, ItemRecord, Snapshot};

/// One item whose stock differs from the previous cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChange {
    pub name: String,
    /// `None` if the item was not listed last cycle
    pub previous: Option<i64>,
    /// `None` if the item is no longer listed
    pub current: Option<i64>,
}

impl ItemChange {
    pub fn is_new(&self) -> bool {
        self.previous.is_none() && self.current.is_some()
    }

    /// The item as it stands after the change
    pub fn record(&self) -> ItemRecord {
        ItemRecord::new(self.name.clone(), self.current)
    }
}

/// Changed items per category; categories without changes are not present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    categories: BTreeMap<Category, Vec<ItemChange>>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, category: Category) -> Option<&[ItemChange]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    /// Total number of changed items
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ItemChange])> {
        self.categories.iter().map(|(c, changes)| (*c, changes.as_slice()))
    }
}

/// Result of comparing a fresh snapshot against the last known one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Nothing was known before; the snapshot only establishes the baseline
    Baseline,
    Changes(ChangeSet),
}

/// Compare `current` against `previous`, item by item.
///
/// A category missing from a non-empty `previous` compares as empty, so all of its
/// current items count as new.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> DiffOutcome {
    if previous.is_empty() {
        return DiffOutcome::Baseline;
    }

    let empty = CategoryItems::new();
    let mut changes = ChangeSet::default();

    for category in Category::ALL {
        let before = previous.get(category).unwrap_or(&empty);
        let after = current.get(category).unwrap_or(&empty);

        let changed = diff_items(before, after);
        if !changed.is_empty() {
            changes.categories.insert(category, changed);
        }
    }

    DiffOutcome::Changes(changes)
}

fn diff_items(before: &CategoryItems, after: &CategoryItems) -> Vec<ItemChange> {
    let mut changed: Vec<ItemChange> = after
        .values()
        .filter_map(|item| {
            let previous = before.get(&item.name).and_then(|p| p.stock);
            let listed_before = before.contains_key(&item.name);
            (!listed_before || previous != item.stock).then(|| ItemChange {
                name: item.name.clone(),
                previous,
                current: item.stock,
            })
        })
        .collect();

    changed.extend(
        before
            .values()
            .filter(|item| !after.contains_key(&item.name))
            .map(|item| ItemChange {
                name: item.name.clone(),
                previous: item.stock,
                current: None,
            }),
    );

    changed.sort_by(|a, b| a.name.cmp(&b.name));
    changed
}
