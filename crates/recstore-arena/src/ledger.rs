//! Allocation accounting for owned store resources.
//!
//! Every heap allocation made on behalf of a dynamic store or a scratch
//! buffer is paired with a [`LedgerToken`]. The token is registered when
//! the allocation is made and deregistered when it is dropped, so
//! [`AllocLedger::outstanding`] reports exactly the allocations that are
//! still reachable. A ledger can also carry a failure budget, making the
//! next allocation past the budget fail deterministically.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use recstore_core::{Result, StoreError};
use tracing::trace;

/// Budget sentinel meaning "no limit".
const UNLIMITED: usize = usize::MAX;

#[derive(Debug)]
struct LedgerState {
    outstanding: AtomicUsize,
    outstanding_bytes: AtomicUsize,
    total_allocations: AtomicU64,
    total_releases: AtomicU64,
    /// Allocations still permitted before injected failure.
    budget: AtomicUsize,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            outstanding: AtomicUsize::new(0),
            outstanding_bytes: AtomicUsize::new(0),
            total_allocations: AtomicU64::new(0),
            total_releases: AtomicU64::new(0),
            budget: AtomicUsize::new(UNLIMITED),
        }
    }
}

/// Shared accounting handle for tracked allocations.
///
/// Clones share the same counters.
#[derive(Clone, Debug, Default)]
pub struct AllocLedger {
    state: Arc<LedgerState>,
}

impl AllocLedger {
    /// Create a ledger with no failure budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that permits `allocations` successful allocations
    /// and fails every one after that.
    pub fn with_budget(allocations: usize) -> Self {
        let ledger = Self::new();
        ledger.fail_after(allocations);
        ledger
    }

    /// Permit `allocations` more successful allocations, then fail.
    pub fn fail_after(&self, allocations: usize) {
        self.state.budget.store(allocations, Ordering::Relaxed);
    }

    /// Remove any failure budget.
    pub fn clear_budget(&self) {
        self.state.budget.store(UNLIMITED, Ordering::Relaxed);
    }

    /// Allocations still permitted by the budget, or `None` if unlimited.
    pub fn budget_remaining(&self) -> Option<usize> {
        match self.state.budget.load(Ordering::Relaxed) {
            UNLIMITED => None,
            n => Some(n),
        }
    }

    /// Number of tracked allocations that have not been released.
    pub fn outstanding(&self) -> usize {
        self.state.outstanding.load(Ordering::Acquire)
    }

    /// Bytes held by tracked allocations that have not been released.
    pub fn outstanding_bytes(&self) -> usize {
        self.state.outstanding_bytes.load(Ordering::Acquire)
    }

    /// Lifetime count of successful tracked allocations.
    pub fn total_allocations(&self) -> u64 {
        self.state.total_allocations.load(Ordering::Relaxed)
    }

    /// Lifetime count of tracked releases.
    pub fn total_releases(&self) -> u64 {
        self.state.total_releases.load(Ordering::Relaxed)
    }

    /// Whether every tracked allocation has been released.
    pub fn is_balanced(&self) -> bool {
        self.outstanding() == 0
    }

    /// Register an allocation of `bytes`, consuming one unit of budget.
    ///
    /// Returns `AllocationFailed` if the budget is exhausted. The caller
    /// must make the real allocation after this succeeds and hold the
    /// token for as long as the allocation lives.
    pub fn acquire(&self, bytes: usize) -> Result<LedgerToken> {
        let permitted = self
            .state
            .budget
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |b| match b {
                UNLIMITED => Some(UNLIMITED),
                0 => None,
                n => Some(n - 1),
            })
            .is_ok();
        if !permitted {
            trace!(bytes, "allocation refused by budget");
            return Err(StoreError::AllocationFailed {
                requested_bytes: bytes,
            });
        }
        self.state.outstanding.fetch_add(1, Ordering::AcqRel);
        self.state.outstanding_bytes.fetch_add(bytes, Ordering::AcqRel);
        self.state.total_allocations.fetch_add(1, Ordering::Relaxed);
        trace!(bytes, outstanding = self.outstanding(), "allocation tracked");
        Ok(LedgerToken {
            state: Arc::clone(&self.state),
            bytes,
        })
    }

    /// Allocate an empty `Vec` with room for exactly `capacity` elements.
    pub fn alloc_vec<T>(&self, capacity: usize) -> Result<Tracked<Vec<T>>> {
        let bytes = capacity.saturating_mul(std::mem::size_of::<T>());
        let token = self.acquire(bytes)?;
        let mut value = Vec::new();
        value
            .try_reserve_exact(capacity)
            .map_err(|_| StoreError::AllocationFailed {
                requested_bytes: bytes,
            })?;
        Ok(Tracked { value, token })
    }

    /// Allocate an empty `String` with room for exactly `capacity` bytes.
    pub fn alloc_string(&self, capacity: usize) -> Result<Tracked<String>> {
        let token = self.acquire(capacity)?;
        let mut value = String::new();
        value
            .try_reserve_exact(capacity)
            .map_err(|_| StoreError::AllocationFailed {
                requested_bytes: capacity,
            })?;
        Ok(Tracked { value, token })
    }
}

/// Registration of one live allocation. Deregisters on drop.
#[derive(Debug)]
#[must_use]
pub struct LedgerToken {
    state: Arc<LedgerState>,
    bytes: usize,
}

impl LedgerToken {
    /// Size of the tracked allocation in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl Drop for LedgerToken {
    fn drop(&mut self) {
        self.state.outstanding.fetch_sub(1, Ordering::AcqRel);
        self.state
            .outstanding_bytes
            .fetch_sub(self.bytes, Ordering::AcqRel);
        self.state.total_releases.fetch_add(1, Ordering::Relaxed);
        trace!(bytes = self.bytes, "allocation released");
    }
}

/// An owned value paired with the ledger token for its allocation.
///
/// The value is dropped before the token, so the ledger never reports
/// an allocation as released while its memory is still held.
#[derive(Debug)]
pub struct Tracked<T> {
    value: T,
    token: LedgerToken,
}

impl<T> Tracked<T> {
    /// Bytes registered with the ledger for this allocation.
    pub fn tracked_bytes(&self) -> usize {
        self.token.bytes()
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}
