//! Integration test: ownership contract of the record stores.
//!
//! Runs with a counting global allocator so "no leak" is checked against
//! real heap traffic, not only the ledger. Each measured operation is run
//! once beforehand so lazily initialised statics (e.g. tracing callsites)
//! are not mistaken for leaks.

use proptest::prelude::*;
use recstore_arena::{
    process_with_scratch, with_store, AllocLedger, DynamicStore, FixedStore, ProcessError,
    RecordStore, StoreConfig, StoreMode, StoreTable,
};
use recstore_core::{RecordSource, RecordView, StoreError};
use recstore_test_utils::{expected_name, expected_sum, measure, CountingAlloc};

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

// ── No leak ─────────────────────────────────────────────────────────

#[test]
fn create_release_returns_every_byte() {
    let run = || {
        let ledger = AllocLedger::new();
        let store = DynamicStore::create(1000, &ledger).unwrap();
        assert_eq!(store.sum(), 749_250.0);
        store.release();
        assert!(ledger.is_balanced());
    };
    run();
    let delta = measure(run);
    assert!(delta.is_balanced(), "leaked: {delta:?}");
}

#[test]
fn failed_creation_returns_every_byte() {
    let run = || {
        let ledger = AllocLedger::with_budget(500);
        let err = DynamicStore::create(1000, &ledger).unwrap_err();
        assert!(matches!(err, StoreError::AllocationFailed { .. }));
        assert!(ledger.is_balanced());
    };
    run();
    let delta = measure(run);
    assert!(delta.is_balanced(), "partial creation leaked: {delta:?}");
}

#[test]
fn fixed_store_makes_no_heap_allocation() {
    let run = || {
        let store = FixedStore::<1000>::create(1000).unwrap();
        store.sum()
    };
    run();
    let delta = measure(run);
    assert_eq!(delta.live_blocks, 0);
    assert_eq!(delta.net_bytes, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn no_leak_for_any_count(count in 1usize..2000) {
        let ledger = AllocLedger::new();
        let store = DynamicStore::create(count, &ledger).unwrap();
        prop_assert_eq!(ledger.outstanding(), count + 1);
        let summary = store.release();
        prop_assert_eq!(summary.allocations, count + 1);
        prop_assert_eq!(ledger.outstanding(), 0);
        prop_assert_eq!(ledger.outstanding_bytes(), 0);
    }

    #[test]
    fn handle_api_no_leak_for_any_count(count in 1usize..500) {
        let mut table = StoreTable::new();
        let h = table.create(count).unwrap();
        prop_assert_eq!(table.sum(h).unwrap(), expected_sum(count));
        table.release(h).unwrap();
        prop_assert!(table.ledger().is_balanced());
    }
}

// ── Early-return safety ─────────────────────────────────────────────

#[test]
fn early_return_path_releases_scratch() {
    for error_condition in [false, true] {
        let ledger = AllocLedger::new();
        let run = || process_with_scratch(&ledger, error_condition);
        let _ = run();
        let delta = measure(run);
        assert!(delta.is_balanced(), "error_condition={error_condition}: {delta:?}");
        assert_eq!(ledger.outstanding(), 0);
    }
}

#[test]
fn early_return_while_holding_a_store() {
    fn build_then_bail(ledger: &AllocLedger, bail: bool) -> Result<f64, ProcessError> {
        let store = DynamicStore::create(100, ledger)?;
        if bail {
            return Err(ProcessError::Injected);
        }
        Ok(store.release().records as f64)
    }

    for bail in [false, true] {
        let ledger = AllocLedger::new();
        let _ = build_then_bail(&ledger, bail);
        assert!(ledger.is_balanced(), "bail={bail}");
    }
}

#[test]
fn panic_while_holding_a_store_still_releases() {
    let ledger = AllocLedger::new();
    let inner = ledger.clone();
    let result = std::panic::catch_unwind(move || {
        let _store = DynamicStore::create(10, &inner).unwrap();
        panic!("boom");
    });
    assert!(result.is_err());
    assert!(ledger.is_balanced());
}

// ── Guarded release ─────────────────────────────────────────────────

#[test]
fn double_release_is_reported_not_executed() {
    let mut table = StoreTable::new();
    let h = table.create(10).unwrap();
    table.release(h).unwrap();
    let releases_before = table.ledger().total_releases();
    assert_eq!(
        table.release(h).unwrap_err(),
        StoreError::DoubleRelease { handle: h.raw() }
    );
    assert_eq!(table.ledger().total_releases(), releases_before);
}

#[test]
fn use_after_release_is_reported() {
    let mut table = StoreTable::new();
    let h = table.create(10).unwrap();
    table.release(h).unwrap();
    let err = table.sum(h).unwrap_err();
    assert_eq!(err, StoreError::UseAfterRelease { handle: h.raw() });
    assert!(err.is_ownership_violation());
}

#[test]
fn stale_handle_cannot_reach_a_reused_slot() {
    let mut table = StoreTable::new();
    let old = table.create(5).unwrap();
    table.release(old).unwrap();
    let new = table.create(7).unwrap();
    assert_eq!(old.slot(), new.slot());
    assert!(matches!(
        table.release(old),
        Err(StoreError::DoubleRelease { .. })
    ));
    assert_eq!(table.len(new).unwrap(), 7);
}

// ── Aggregation and mode parity ─────────────────────────────────────

#[test]
fn thousand_record_sum_in_both_modes() {
    let ledger = AllocLedger::new();
    let fixed = FixedStore::<1000>::create(1000).unwrap();
    let dynamic = DynamicStore::create(1000, &ledger).unwrap();
    assert_eq!(fixed.sum(), 749_250.0);
    assert_eq!(dynamic.sum(), 749_250.0);
}

fn snapshot<S: RecordStore>(count: usize, ledger: &AllocLedger) -> Vec<(u32, String, f64)> {
    let store = S::create(count, ledger).unwrap();
    let rows = (0..store.len())
        .map(|i| {
            let r = store.view(i).unwrap();
            (r.id().0, r.name().to_string(), r.value())
        })
        .collect();
    store.release();
    rows
}

#[test]
fn modes_agree_record_by_record() {
    let ledger = AllocLedger::new();
    let fixed = snapshot::<FixedStore<256>>(200, &ledger);
    let dynamic = snapshot::<DynamicStore>(200, &ledger);
    assert_eq!(fixed, dynamic);
    for (i, (id, name, value)) in fixed.iter().enumerate() {
        assert_eq!(*id as usize, i);
        assert_eq!(*name, expected_name(i));
        assert_eq!(*value, i as f64 * 1.5);
    }
    assert!(ledger.is_balanced());
}

#[test]
fn config_selected_modes_agree() {
    let ledger = AllocLedger::new();
    let sums: Vec<f64> = [StoreMode::Fixed, StoreMode::Dynamic]
        .into_iter()
        .map(|mode| with_store(&StoreConfig::new(mode, 1000), &ledger, |s| s.sum()).unwrap())
        .collect();
    assert_eq!(sums, vec![749_250.0, 749_250.0]);
    assert!(ledger.is_balanced());
}
