//! Error types for recstore.
//!
//! One enum covers the whole store lifecycle. `AllocationFailed` is the
//! only condition a well-behaved caller is expected to recover from; the
//! remaining variants report ownership-discipline violations that the
//! handle API turns into deterministic failures instead of memory access.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while creating, reading or releasing a store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An allocation could not be satisfied. Nothing partially created is
    /// left reachable when this is returned.
    #[error("allocation failed: {requested_bytes} bytes requested")]
    AllocationFailed {
        /// Size of the allocation that failed.
        requested_bytes: usize,
    },
    /// A store was requested with zero records.
    #[error("record count must be greater than zero")]
    InvalidCount,
    /// More records were requested than the store can hold.
    #[error("capacity exceeded: requested {requested} records, capacity {capacity}")]
    CapacityExceeded {
        /// Number of records requested.
        requested: usize,
        /// Maximum number of records the store supports.
        capacity: usize,
    },
    /// A released store was read through a stale handle.
    #[error("use after release: handle {handle:#018x}")]
    UseAfterRelease {
        /// Raw value of the stale handle.
        handle: u64,
    },
    /// A released store was released again.
    #[error("double release: handle {handle:#018x}")]
    DoubleRelease {
        /// Raw value of the stale handle.
        handle: u64,
    },
    /// The handle was never issued by this table.
    #[error("unknown handle {handle:#018x}")]
    UnknownHandle {
        /// Raw value of the unrecognised handle.
        handle: u64,
    },
}

impl StoreError {
    /// Whether this error is a programmer error in ownership discipline
    /// rather than a resource condition.
    pub fn is_ownership_violation(&self) -> bool {
        matches!(
            self,
            Self::UseAfterRelease { .. } | Self::DoubleRelease { .. } | Self::UnknownHandle { .. }
        )
    }
}
