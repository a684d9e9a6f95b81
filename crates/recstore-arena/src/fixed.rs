//! Fixed-capacity record store with scope-bound storage.
//!
//! [`FixedStore`] holds its records in an inline `[FixedRecord; N]` array,
//! names included. It makes no heap allocation, so there is nothing to
//! release explicitly: the store is reclaimed when it leaves scope, and it
//! cannot leak or be released twice.
//!
//! Records borrow from the store, so a view into a function-local store
//! cannot be handed back to the caller:
//!
//! ```compile_fail
//! use recstore_arena::{FixedRecord, FixedStore};
//!
//! fn first_record() -> &'static FixedRecord {
//!     let store = FixedStore::<16>::create(4).unwrap();
//!     store.get(0).unwrap() // returns a value referencing a local
//! }
//! ```

use recstore_core::{RecordId, RecordSource, RecordView, Result, StoreError};

use crate::config::StoreMode;
use crate::ledger::AllocLedger;
use crate::record::FixedRecord;
use crate::store::{RecordStore, ReleaseSummary};

/// A store of at most `N` records held inline.
///
/// Slots past `len` hold [`FixedRecord::VACANT`] and are never exposed.
#[derive(Clone, Debug)]
pub struct FixedStore<const N: usize> {
    records: [FixedRecord; N],
    len: usize,
}

impl<const N: usize> FixedStore<N> {
    /// Compile-time bound on the record count.
    pub const CAPACITY: usize = N;

    /// Create and populate `count` generated records.
    ///
    /// Returns `InvalidCount` for zero and `CapacityExceeded` if `count`
    /// is above `N`.
    pub fn create(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(StoreError::InvalidCount);
        }
        if count > N {
            return Err(StoreError::CapacityExceeded {
                requested: count,
                capacity: N,
            });
        }
        let records = std::array::from_fn(|i| {
            if i < count {
                FixedRecord::generated(RecordId(i as u32))
            } else {
                FixedRecord::VACANT
            }
        });
        Ok(Self {
            records,
            len: count,
        })
    }

    /// The populated records in id order.
    pub fn records(&self) -> &[FixedRecord] {
        &self.records[..self.len]
    }

    /// The record at `index`, if populated.
    pub fn get(&self, index: usize) -> Option<&FixedRecord> {
        self.records().get(index)
    }

    /// Size of the inline storage in bytes, vacant slots included.
    pub fn memory_bytes(&self) -> usize {
        std::mem::size_of::<[FixedRecord; N]>()
    }
}

impl<const N: usize> RecordSource for FixedStore<N> {
    fn len(&self) -> usize {
        self.len
    }

    fn view(&self, index: usize) -> Option<&dyn RecordView> {
        self.get(index).map(|r| r as &dyn RecordView)
    }

    fn sum(&self) -> f64 {
        self.records().iter().map(RecordView::value).sum()
    }
}

impl<const N: usize> RecordStore for FixedStore<N> {
    const MODE: StoreMode = StoreMode::Fixed;

    /// The ledger is not consulted: fixed stores never touch the heap.
    fn create(count: usize, _ledger: &AllocLedger) -> Result<Self> {
        FixedStore::create(count)
    }

    fn release(self) -> ReleaseSummary {
        ReleaseSummary {
            records: self.len,
            allocations: 0,
        }
    }
}
