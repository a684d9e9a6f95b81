//! C-compatible status codes.
//!
//! [`RecstoreStatus`] is a `repr(i32)` enum covering every outcome of the
//! FFI surface. `Ok` is zero and all errors are negative; values are
//! ABI-stable.

use recstore_core::StoreError;

/// Status code returned by every FFI function.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecstoreStatus {
    /// Success.
    Ok = 0,
    /// Handle was never issued by the store table.
    InvalidHandle = -1,
    /// Record storage could not be allocated. Nothing was created.
    AllocationFailed = -2,
    /// Handle refers to a store that was already released.
    UseAfterRelease = -3,
    /// Handle was already released.
    DoubleRelease = -4,
    /// An argument is null, zero, or otherwise invalid.
    InvalidArgument = -5,
    /// Requested more records than the store supports.
    CapacityExceeded = -6,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -7,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&StoreError> for RecstoreStatus {
    fn from(e: &StoreError) -> Self {
        match e {
            StoreError::AllocationFailed { .. } => RecstoreStatus::AllocationFailed,
            StoreError::InvalidCount => RecstoreStatus::InvalidArgument,
            StoreError::CapacityExceeded { .. } => RecstoreStatus::CapacityExceeded,
            StoreError::UseAfterRelease { .. } => RecstoreStatus::UseAfterRelease,
            StoreError::DoubleRelease { .. } => RecstoreStatus::DoubleRelease,
            StoreError::UnknownHandle { .. } => RecstoreStatus::InvalidHandle,
        }
    }
}
