//! Identity-based diffing of two collections.

use std::collections::HashSet;
use std::hash::Hash;

use docseal_core::{Entity, EntityId};

/// The elements added and removed between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<T> {
    /// In the replacement but not the original, in replacement order.
    pub added: Vec<T>,
    /// In the original but not the replacement, in original order.
    pub removed: Vec<T>,
}

impl<T> Diff<T> {
    /// Whether the two snapshots have the same membership.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Participant lists diffed by entity id.
pub type ParticipantDiff = Diff<Entity>;

impl ParticipantDiff {
    /// Diff two entity lists by id.
    pub fn between(original: &[Entity], replacement: &[Entity]) -> Self {
        diff_by(original, replacement, |e: &Entity| e.id.clone())
    }

    /// Ids of the added entities.
    pub fn added_ids(&self) -> Vec<&EntityId> {
        self.added.iter().map(|e| &e.id).collect()
    }

    /// Ids of the removed entities.
    pub fn removed_ids(&self) -> Vec<&EntityId> {
        self.removed.iter().map(|e| &e.id).collect()
    }
}

/// Set difference between `original` and `replacement`, by `key`.
///
/// Each key appears at most once on each side of the result.
pub fn diff_by<T, K, F>(original: &[T], replacement: &[T], key: F) -> Diff<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let original_keys: HashSet<K> = original.iter().map(&key).collect();
    let replacement_keys: HashSet<K> = replacement.iter().map(&key).collect();

    let mut seen = HashSet::new();
    let added = replacement
        .iter()
        .filter(|item| {
            let k = key(*item);
            !original_keys.contains(&k) && seen.insert(k)
        })
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let removed = original
        .iter()
        .filter(|item| {
            let k = key(*item);
            !replacement_keys.contains(&k) && seen.insert(k)
        })
        .cloned()
        .collect();

    Diff { added, removed }
}
