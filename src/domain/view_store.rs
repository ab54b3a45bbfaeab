//! Ordered in-memory list of camera views.
//!
//! [`ViewStore`] holds every [`ViewRecord`] accepted since the last wipe,
//! in arrival order. It has no interior locking: the relay service owns
//! it behind a single mutex so that appends, wipes and replay snapshots
//! are serialized.

use serde::Serialize;

/// Opaque camera view supplied by a client.
///
/// The relay never looks inside the value; it is stored and forwarded
/// exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewRecord(serde_json::Value);

impl ViewRecord {
    /// Wraps a raw JSON value.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the wrapped JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Append-only (until wiped) sequence of [`ViewRecord`]s.
///
/// No uniqueness constraint and no eviction: the list grows until
/// [`ViewStore::clear`] is called.
#[derive(Debug, Default)]
pub struct ViewStore {
    views: Vec<ViewRecord>,
}

impl ViewStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the end of the list.
    pub fn push(&mut self, view: ViewRecord) {
        self.views.push(view);
    }

    /// Removes every record, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.views.len();
        self.views.clear();
        removed
    }

    /// Returns a copy of all records in store order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ViewRecord> {
        self.views.clone()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
