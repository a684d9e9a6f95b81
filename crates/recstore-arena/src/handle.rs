//! Slot+generation handle table for explicitly released stores.
//!
//! [`StoreTable`] is the procedural create / sum / release API. Callers
//! hold copyable [`StoreHandle`]s rather than the stores themselves, so the
//! compiler cannot stop a handle from being used after release. The table
//! detects it instead: releasing a store bumps its slot's generation, and a
//! handle carrying an older generation is rejected with `UseAfterRelease`
//! or `DoubleRelease` without touching the released store.

use std::fmt;

use recstore_core::{RecordSource, Result, StoreError};
use tracing::{debug, warn};

use crate::dynamic::DynamicStore;
use crate::ledger::AllocLedger;
use crate::record::Record;
use crate::store::ReleaseSummary;

/// Opaque handle to a store in a [`StoreTable`].
///
/// Encoding: upper 32 bits = slot index, lower 32 bits = generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreHandle(u64);

impl StoreHandle {
    fn new(slot: u32, generation: u32) -> Self {
        Self(((slot as u64) << 32) | (generation as u64))
    }

    /// Rebuild a handle from its raw value (e.g. received across FFI).
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw encoded value.
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Slot index component.
    pub fn slot(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Generation component.
    pub fn generation(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreHandle(slot={}, gen={})", self.slot(), self.generation())
    }
}

struct Slot {
    generation: u32,
    /// Set once the generation counter is exhausted; the slot is never reused.
    retired: bool,
    store: Option<DynamicStore>,
}

/// Which operation is resolving a handle, for stale-handle classification.
#[derive(Clone, Copy)]
enum Access {
    Read,
    Release,
}

/// A slot+generation table owning live [`DynamicStore`]s.
///
/// Reuses slots via a free list. Any stores still live when the table is
/// dropped are released at that point and reported with a warning.
pub struct StoreTable {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    ledger: AllocLedger,
}

impl StoreTable {
    /// Create an empty table with its own ledger.
    pub fn new() -> Self {
        Self::with_ledger(AllocLedger::new())
    }

    /// Create an empty table that tracks allocations in `ledger`.
    pub fn with_ledger(ledger: AllocLedger) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            ledger,
        }
    }

    /// The ledger tracking every store in this table.
    pub fn ledger(&self) -> &AllocLedger {
        &self.ledger
    }

    /// Create a store of `count` generated records and return its handle.
    ///
    /// On failure nothing is inserted and nothing remains allocated.
    pub fn create(&mut self, count: usize) -> Result<StoreHandle> {
        let store = DynamicStore::create(count, &self.ledger)?;
        let handle = if let Some(slot_idx) = self.free_list.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.store = Some(store);
            StoreHandle::new(slot_idx, slot.generation)
        } else {
            let slot_idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                retired: false,
                store: Some(store),
            });
            StoreHandle::new(slot_idx, 0)
        };
        debug!(%handle, count, "store created");
        Ok(handle)
    }

    /// Sum of `value` over every record of a live store.
    pub fn sum(&self, handle: StoreHandle) -> Result<f64> {
        Ok(self.get(handle)?.sum())
    }

    /// Number of records in a live store.
    pub fn len(&self, handle: StoreHandle) -> Result<usize> {
        Ok(self.get(handle)?.len())
    }

    /// The record at `index` of a live store, or `None` if out of range.
    pub fn record(&self, handle: StoreHandle, index: usize) -> Result<Option<&Record>> {
        Ok(self.get(handle)?.get(index))
    }

    /// Borrow a live store.
    pub fn get(&self, handle: StoreHandle) -> Result<&DynamicStore> {
        let slot_idx = self.resolve(handle, Access::Read)?;
        self.slots[slot_idx]
            .store
            .as_ref()
            .ok_or(StoreError::UnknownHandle { handle: handle.raw() })
    }

    /// Release a live store: every name, then the sequence.
    ///
    /// Releasing the same handle again returns `DoubleRelease` and has no
    /// other effect.
    pub fn release(&mut self, handle: StoreHandle) -> Result<ReleaseSummary> {
        let slot_idx = self.resolve(handle, Access::Release)?;
        let slot = &mut self.slots[slot_idx];
        let store = slot
            .store
            .take()
            .ok_or(StoreError::UnknownHandle { handle: handle.raw() })?;
        // An exhausted generation would let a future handle collide with a
        // stale one, so the slot is retired instead of recycled.
        if slot.generation == u32::MAX {
            slot.retired = true;
        } else {
            slot.generation += 1;
            self.free_list.push(slot_idx as u32);
        }
        let summary = store.release();
        debug!(%handle, records = summary.records, "store released");
        Ok(summary)
    }

    /// Number of stores currently live.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.store.is_some()).count()
    }

    /// Map a handle to its slot index, classifying stale handles.
    fn resolve(&self, handle: StoreHandle, access: Access) -> Result<usize> {
        let raw = handle.raw();
        let slot_idx = handle.slot() as usize;
        let Some(slot) = self.slots.get(slot_idx) else {
            return Err(StoreError::UnknownHandle { handle: raw });
        };
        let generation = handle.generation();
        if slot.retired || generation < slot.generation {
            warn!(%handle, current = slot.generation, "stale store handle");
            return Err(match access {
                Access::Read => StoreError::UseAfterRelease { handle: raw },
                Access::Release => StoreError::DoubleRelease { handle: raw },
            });
        }
        if generation > slot.generation || slot.store.is_none() {
            return Err(StoreError::UnknownHandle { handle: raw });
        }
        Ok(slot_idx)
    }
}

impl Default for StoreTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StoreTable {
    fn drop(&mut self) {
        let live = self.live_count();
        if live > 0 {
            warn!(live, "store table dropped with unreleased stores; reclaiming");
        }
    }
}
