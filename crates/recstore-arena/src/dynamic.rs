//! Heap-backed record store with separately owned names.
//!
//! [`DynamicStore`] owns one tracked allocation for the record sequence and
//! one per record name. Creation is all-or-nothing: if any name allocation
//! fails, every record built so far is dropped together with the sequence
//! before the error is returned, so a failed `create` leaves nothing behind.
//!
//! Release order is names first, then the sequence. Dropping the store
//! performs the same release, so an early return from any function holding
//! a store cannot leak it.

use recstore_core::{RecordId, RecordSource, RecordView, Result, StoreError};
use tracing::debug;

use crate::config::StoreMode;
use crate::ledger::{AllocLedger, Tracked};
use crate::record::Record;
use crate::store::{RecordStore, ReleaseSummary};

/// A runtime-sized store of heap-backed records.
#[derive(Debug)]
pub struct DynamicStore {
    /// Exactly `capacity` records, populated in id order.
    records: Tracked<Vec<Record>>,
    capacity: usize,
}

impl DynamicStore {
    /// Largest record count whose ids fit in a [`RecordId`].
    pub const MAX_RECORDS: usize = u32::MAX as usize;

    /// Create and populate `count` generated records.
    ///
    /// Returns `InvalidCount` for zero, `CapacityExceeded` if the ids would
    /// not fit, and `AllocationFailed` if the sequence or any name cannot be
    /// allocated. In every error case the ledger is left as it was.
    pub fn create(count: usize, ledger: &AllocLedger) -> Result<Self> {
        if count == 0 {
            return Err(StoreError::InvalidCount);
        }
        if count > Self::MAX_RECORDS {
            return Err(StoreError::CapacityExceeded {
                requested: count,
                capacity: Self::MAX_RECORDS,
            });
        }

        let mut records = ledger.alloc_vec::<Record>(count)?;
        for i in 0..count {
            // On failure `records` drops here, taking every earlier name with it.
            let record = Record::generated(RecordId(i as u32), ledger).inspect_err(|e| {
                debug!(count, built = i, error = %e, "dynamic store creation rolled back");
            })?;
            records.push(record);
        }

        debug!(
            count,
            bytes = ledger.outstanding_bytes(),
            "dynamic store created"
        );
        Ok(Self {
            records,
            capacity: count,
        })
    }

    /// Number of records the store was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All records in id order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Heap allocations owned by this store: one per name plus the sequence.
    pub fn allocation_count(&self) -> usize {
        self.records.len() + 1
    }

    /// Release every name, then the sequence.
    pub fn release(self) -> ReleaseSummary {
        let summary = ReleaseSummary {
            records: self.records.len(),
            allocations: self.allocation_count(),
        };
        drop(self);
        summary
    }
}

impl Drop for DynamicStore {
    fn drop(&mut self) {
        let records = self.records.len();
        // Names go first; the sequence itself is freed when the field drops.
        self.records.clear();
        debug!(records, "dynamic store released");
    }
}

impl RecordSource for DynamicStore {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn view(&self, index: usize) -> Option<&dyn RecordView> {
        self.records.get(index).map(|r| r as &dyn RecordView)
    }

    fn sum(&self) -> f64 {
        self.records.iter().map(RecordView::value).sum()
    }
}

impl RecordStore for DynamicStore {
    const MODE: StoreMode = StoreMode::Dynamic;

    fn create(count: usize, ledger: &AllocLedger) -> Result<Self> {
        DynamicStore::create(count, ledger)
    }

    fn release(self) -> ReleaseSummary {
        DynamicStore::release(self)
    }
}
