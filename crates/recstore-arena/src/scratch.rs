//! Tracked temporary buffers and the early-return processing path.
//!
//! [`ScratchBuffer`] is a ledger-tracked byte buffer for work that needs
//! temporary space. [`process_with_scratch`] allocates one, may bail out
//! early on an injected error condition, and relies on the buffer's drop to
//! release it on every exit path.

use recstore_core::StoreError;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ledger::{AllocLedger, Tracked};

/// Default scratch size in bytes.
pub const DEFAULT_SCRATCH_BYTES: usize = 1024;

/// Errors from [`process_with_scratch`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// The scratch buffer could not be allocated.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The caller asked for the error path to be taken.
    #[error("processing aborted by injected error condition")]
    Injected,
}

/// A zero-initialised, ledger-tracked byte buffer.
#[derive(Debug)]
pub struct ScratchBuffer {
    data: Tracked<Vec<u8>>,
}

impl ScratchBuffer {
    /// Allocate `len` zeroed bytes.
    pub fn new(ledger: &AllocLedger, len: usize) -> Result<Self, StoreError> {
        let mut data = ledger.alloc_vec::<u8>(len)?;
        data.resize(len, 0);
        Ok(Self { data })
    }

    /// The buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable buffer contents.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Buffer length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer has zero length.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes registered with the ledger.
    pub fn memory_bytes(&self) -> usize {
        self.data.tracked_bytes()
    }
}

/// Fill a scratch buffer, optionally bail out early, and return a checksum.
///
/// The buffer is released on both the success and the error path.
pub fn process_with_scratch(ledger: &AllocLedger, error_condition: bool) -> Result<u64, ProcessError> {
    let mut scratch = ScratchBuffer::new(ledger, DEFAULT_SCRATCH_BYTES)?;
    debug!(bytes = scratch.len(), "scratch buffer allocated");

    for (i, byte) in scratch.as_mut_slice().iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }

    if error_condition {
        warn!("error condition raised; returning early");
        return Err(ProcessError::Injected);
    }

    let checksum = scratch.as_slice().iter().map(|&b| u64::from(b)).sum();
    debug!(checksum, "processing finished");
    Ok(checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_checksum() -> u64 {
        (0..DEFAULT_SCRATCH_BYTES).map(|i| (i % 251) as u64).sum()
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let ledger = AllocLedger::new();
        let scratch = ScratchBuffer::new(&ledger, 64).unwrap();
        assert_eq!(scratch.len(), 64);
        assert!(scratch.as_slice().iter().all(|&b| b == 0));
        assert_eq!(scratch.memory_bytes(), 64);
        assert_eq!(ledger.outstanding(), 1);
    }

    #[test]
    fn zero_length_buffer_is_valid() {
        let ledger = AllocLedger::new();
        let scratch = ScratchBuffer::new(&ledger, 0).unwrap();
        assert!(scratch.is_empty());
    }

    #[test]
    fn success_path_releases_buffer() {
        let ledger = AllocLedger::new();
        assert_eq!(process_with_scratch(&ledger, false), Ok(expected_checksum()));
        assert!(ledger.is_balanced());
        assert_eq!(ledger.total_allocations(), 1);
    }

    #[test]
    fn early_return_releases_buffer() {
        let ledger = AllocLedger::new();
        assert_eq!(
            process_with_scratch(&ledger, true),
            Err(ProcessError::Injected)
        );
        assert!(ledger.is_balanced());
        assert_eq!(ledger.total_releases(), 1);
    }

    #[test]
    fn both_paths_leave_nothing_outstanding() {
        for error_condition in [false, true] {
            let ledger = AllocLedger::new();
            let _ = process_with_scratch(&ledger, error_condition);
            assert_eq!(ledger.outstanding(), 0, "error_condition={error_condition}");
        }
    }

    #[test]
    fn allocation_failure_is_propagated() {
        let ledger = AllocLedger::with_budget(0);
        assert!(matches!(
            process_with_scratch(&ledger, false),
            Err(ProcessError::Store(StoreError::AllocationFailed { .. }))
        ));
        assert!(ledger.is_balanced());
    }
}
