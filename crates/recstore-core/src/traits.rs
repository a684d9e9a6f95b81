//! Read-side abstraction traits shared by fixed and dynamic stores.

use crate::id::RecordId;

/// Read-only view of a single record.
///
/// Implemented by both the inline (fixed-capacity) and heap-backed
/// (dynamic) record types so comparison code is written once.
pub trait RecordView {
    /// The record's identifier, equal to its creation position.
    fn id(&self) -> RecordId;

    /// The record's name, already truncated to the naming policy.
    fn name(&self) -> &str;

    /// The record's scalar value.
    fn value(&self) -> f64;
}

/// Read-only access to a live store of records.
///
/// This trait decouples drivers and benchmarks from the storage mode.
/// It is object safe: config-selected code reads through
/// `&dyn RecordSource` rather than naming a concrete store.
pub trait RecordSource {
    /// Number of records in the store.
    fn len(&self) -> usize;

    /// Whether the store holds no records. Never true for a live store.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the record at `index`, or `None` if out of range.
    fn view(&self, index: usize) -> Option<&dyn RecordView>;

    /// Sum of `value` over all records, in index order.
    fn sum(&self) -> f64 {
        (0..self.len())
            .filter_map(|i| self.view(i))
            .map(|r| r.value())
            .sum()
    }
}
