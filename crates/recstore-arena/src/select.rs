//! Config-selected store construction.
//!
//! [`with_store`] builds the store named by a [`StoreConfig`], lends it to a
//! closure as `&dyn RecordSource`, and releases it when the closure returns.
//! The lent reference is tied to the call, so it cannot outlive the store:
//!
//! ```compile_fail
//! use recstore_arena::{with_store, AllocLedger, StoreConfig};
//! use recstore_core::RecordSource;
//!
//! let ledger = AllocLedger::new();
//! let mut escaped: Option<&dyn RecordSource> = None;
//! with_store(&StoreConfig::default(), &ledger, |store| {
//!     escaped = Some(store); // borrowed value does not live long enough
//! })
//! .unwrap();
//! ```

use recstore_core::RecordSource;
use tracing::debug;

use crate::config::{ConfigError, StoreConfig, StoreMode, FIXED_CAPACITY};
use crate::dynamic::DynamicStore;
use crate::fixed::FixedStore;
use crate::ledger::AllocLedger;
use crate::store::RecordStore;

/// Run `f` against a freshly created store of the configured mode.
///
/// The store is released before this returns, whatever `f` does.
/// Dynamic-mode allocations are tracked in `ledger`.
pub fn with_store<R>(
    config: &StoreConfig,
    ledger: &AllocLedger,
    f: impl FnOnce(&dyn RecordSource) -> R,
) -> Result<R, ConfigError> {
    config.validate()?;
    debug!(mode = %config.mode, count = config.count, "building config-selected store");
    match config.mode {
        StoreMode::Fixed => run::<FixedStore<FIXED_CAPACITY>, R>(config.count, ledger, f),
        StoreMode::Dynamic => run::<DynamicStore, R>(config.count, ledger, f),
    }
}

fn run<S: RecordStore, R>(
    count: usize,
    ledger: &AllocLedger,
    f: impl FnOnce(&dyn RecordSource) -> R,
) -> Result<R, ConfigError> {
    let store = S::create(count, ledger)?;
    let out = f(&store);
    let summary = store.release();
    debug!(mode = %S::MODE, records = summary.records, "config-selected store released");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recstore_core::{RecordView, StoreError};

    #[test]
    fn both_modes_produce_same_sum() {
        let ledger = AllocLedger::new();
        for mode in [StoreMode::Fixed, StoreMode::Dynamic] {
            let sum = with_store(&StoreConfig::new(mode, 1000), &ledger, |s| s.sum()).unwrap();
            assert_eq!(sum, 749_250.0, "mode={mode}");
        }
        assert!(ledger.is_balanced());
    }

    #[test]
    fn fixed_mode_does_not_allocate() {
        let ledger = AllocLedger::new();
        with_store(&StoreConfig::new(StoreMode::Fixed, 10), &ledger, |s| {
            assert_eq!(s.len(), 10);
        })
        .unwrap();
        assert_eq!(ledger.total_allocations(), 0);
    }

    #[test]
    fn dynamic_store_is_live_inside_and_released_after() {
        let ledger = AllocLedger::new();
        let inside = with_store(&StoreConfig::new(StoreMode::Dynamic, 10), &ledger, |_| {
            ledger.outstanding()
        })
        .unwrap();
        assert_eq!(inside, 11);
        assert!(ledger.is_balanced());
    }

    #[test]
    fn invalid_config_fails_before_allocating() {
        let ledger = AllocLedger::new();
        let err = with_store(&StoreConfig::new(StoreMode::Fixed, 5000), &ledger, |_| ()).unwrap_err();
        assert!(matches!(err, ConfigError::FixedCapacityExceeded { .. }));
        assert_eq!(ledger.total_allocations(), 0);
    }

    #[test]
    fn allocation_failure_is_wrapped() {
        let ledger = AllocLedger::with_budget(2);
        let err = with_store(&StoreConfig::new(StoreMode::Dynamic, 10), &ledger, |_| ()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Store(StoreError::AllocationFailed { .. })
        ));
        assert!(ledger.is_balanced());
    }

    #[test]
    fn views_agree_across_modes() {
        let ledger = AllocLedger::new();
        let collect = |mode| {
            with_store(&StoreConfig::new(mode, 25), &ledger, |s| {
                (0..s.len())
                    .map(|i| {
                        let r = s.view(i).unwrap();
                        (r.id(), r.name().to_string(), r.value())
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap()
        };
        assert_eq!(collect(StoreMode::Fixed), collect(StoreMode::Dynamic));
    }
}
