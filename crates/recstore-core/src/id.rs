//! Strongly-typed record identifiers.

use std::fmt;

/// Identifies a record within a store.
///
/// Records are populated in order and assigned sequential IDs, so
/// `RecordId(n)` is also the record's position at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u32);

impl RecordId {
    /// Position of this record within its store.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RecordId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
