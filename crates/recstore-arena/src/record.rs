//! Record representations for the two storage modes.
//!
//! - [`Record`] owns a separately allocated, ledger-tracked name.
//! - [`FixedRecord`] carries its name inline and owns no heap memory.
//!
//! Both apply the same naming policy from [`recstore_core::record`].

use recstore_core::{generated_value, InlineName, RecordId, RecordView, Result, NAME_CAPACITY};

use crate::ledger::{AllocLedger, Tracked};

/// A record whose name lives in its own heap allocation.
///
/// Exactly [`NAME_CAPACITY`] bytes are reserved for the name. Dropping the
/// record releases the name.
#[derive(Debug)]
pub struct Record {
    id: RecordId,
    name: Tracked<String>,
    value: f64,
}

impl Record {
    /// Build the generated record for `id`, allocating its name.
    ///
    /// Returns `AllocationFailed` if the name cannot be allocated; nothing
    /// is left registered with the ledger in that case.
    pub fn generated(id: RecordId, ledger: &AllocLedger) -> Result<Self> {
        let mut name = ledger.alloc_string(NAME_CAPACITY)?;
        name.push_str(InlineName::generated(id).as_str());
        Ok(Self {
            id,
            name,
            value: generated_value(id),
        })
    }

    /// Bytes reserved for the name allocation.
    pub fn name_capacity(&self) -> usize {
        self.name.tracked_bytes()
    }
}

impl RecordView for Record {
    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// A record stored entirely inline, for fixed-capacity stores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRecord {
    id: RecordId,
    name: InlineName,
    value: f64,
}

impl FixedRecord {
    /// Placeholder occupying unpopulated slots of a fixed store.
    pub const VACANT: Self = Self {
        id: RecordId(0),
        name: InlineName::new(),
        value: 0.0,
    };

    /// Build the generated record for `id`.
    pub fn generated(id: RecordId) -> Self {
        Self {
            id,
            name: InlineName::generated(id),
            value: generated_value(id),
        }
    }
}

impl RecordView for FixedRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn value(&self) -> f64 {
        self.value
    }
}
