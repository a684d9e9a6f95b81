//! The capability set shared by fixed and dynamic stores.

use recstore_core::{RecordSource, Result};

use crate::config::StoreMode;
use crate::ledger::AllocLedger;

/// What a release reclaimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Records dropped.
    pub records: usize,
    /// Tracked heap allocations freed (names plus the sequence).
    /// Always zero for fixed-mode stores.
    pub allocations: usize,
}

/// A store of generated records: create, read, release.
///
/// Implemented by [`FixedStore`](crate::FixedStore) and
/// [`DynamicStore`](crate::DynamicStore) so comparison code is written
/// once against this trait. `release` takes `self` by value: a released
/// store cannot be named again, and a store that is never released is
/// reclaimed when it goes out of scope.
///
/// ```compile_fail
/// use recstore_arena::{AllocLedger, DynamicStore, RecordStore};
///
/// let ledger = AllocLedger::new();
/// let store = DynamicStore::create(10, &ledger).unwrap();
/// store.release();
/// store.release(); // use of moved value
/// ```
pub trait RecordStore: RecordSource + Sized {
    /// The storage strategy this type implements.
    const MODE: StoreMode;

    /// Create and populate `count` generated records.
    ///
    /// Either every record is created or nothing remains allocated.
    fn create(count: usize, ledger: &AllocLedger) -> Result<Self>;

    /// Release every owned resource. Consumes the store.
    fn release(self) -> ReleaseSummary;
}
