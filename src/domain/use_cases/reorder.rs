//! Drag-and-drop reordering shared by every ordered collection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::entry::Entry;
use crate::errors::AppError;

/// A single drag gesture: the entry at `source_index` is dropped at
/// `destination_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragMove {
    pub source_index: usize,
    pub destination_index: usize,
}

/// One ordinal write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrdinalUpdate {
    pub id: Uuid,
    pub ordinal: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReorderOutcome {
    Unchanged,
    Persisted { writes: usize },
}

/// Removes the element at `source` and re-inserts it at `destination`.
pub fn move_entry<T>(items: &mut Vec<T>, source: usize, destination: usize) -> Result<(), AppError> {
    let len = items.len();
    if source >= len || destination >= len {
        return Err(AppError::InvalidInput(format!(
            "Cannot move position {source} to {destination} in a list of {len}"
        )));
    }

    let moved = items.remove(source);
    items.insert(destination, moved);
    Ok(())
}

/// Rewrites ordinals to `base, base + 1, ...` following list order.
pub fn assign_ordinals<E: Entry>(entries: &mut [E], base: i32) {
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.set_ordinal(base + position as i32);
    }
}

/// The writes needed to persist the current ordinals, in list order. Entries
/// without an id have nothing to write yet.
pub fn ordinal_updates<E: Entry>(entries: &[E]) -> Vec<OrdinalUpdate> {
    entries
        .iter()
        .filter_map(|entry| {
            entry.id().map(|id| OrdinalUpdate {
                id,
                ordinal: entry.ordinal(),
            })
        })
        .collect()
}
