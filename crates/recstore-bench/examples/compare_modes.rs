//! Fixed vs dynamic mode comparison driver.
//!
//! Creates, sums and releases a store in each requested mode, runs the
//! scratch-buffer path with and without its early return, then times the
//! comparator at the reference sizes.
//!
//! ```text
//! cargo run -p recstore-bench --example compare_modes [fixed|dynamic ...]
//! RUST_LOG=recstore=trace cargo run -p recstore-bench --example compare_modes
//! ```

use recstore_arena::{
    process_with_scratch, with_store, AllocLedger, DynamicStore, FixedStore, StoreConfig,
    StoreMode, FIXED_CAPACITY,
};
use recstore_bench::{run_comparison, time_store, REFERENCE_RECORD_COUNT, REFERENCE_SIZES};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recstore=debug")),
        )
        .init();

    let modes: Vec<StoreMode> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            vec![StoreMode::Fixed, StoreMode::Dynamic]
        } else {
            args.iter()
                .filter_map(|a| match a.parse() {
                    Ok(mode) => Some(mode),
                    Err(e) => {
                        warn!(%e, "skipping argument");
                        None
                    }
                })
                .collect()
        }
    };

    let ledger = AllocLedger::new();

    println!("=== Store lifecycle ({REFERENCE_RECORD_COUNT} records) ===");
    for &mode in &modes {
        let sample = match mode {
            StoreMode::Fixed => {
                time_store::<FixedStore<FIXED_CAPACITY>>(REFERENCE_RECORD_COUNT, &ledger)
            }
            StoreMode::Dynamic => time_store::<DynamicStore>(REFERENCE_RECORD_COUNT, &ledger),
        };
        match sample {
            Ok(s) => println!(
                "  {:<8} sum={:>10.1} allocations={:>5} time={:>8.3} ms",
                s.mode,
                s.sum,
                s.allocations,
                s.elapsed.as_secs_f64() * 1000.0,
            ),
            Err(e) => println!("  {mode:<8} failed: {e}"),
        }
    }

    println!("\n=== Config-selected view ===");
    for &mode in &modes {
        let config = StoreConfig::new(mode, 5);
        let shown = with_store(&config, &ledger, |store| {
            (0..store.len())
                .filter_map(|i| store.view(i).map(|r| r.name().to_string()))
                .collect::<Vec<_>>()
                .join(", ")
        });
        match shown {
            Ok(names) => println!("  {mode:<8} {names}"),
            Err(e) => println!("  {mode:<8} failed: {e}"),
        }
    }

    println!("\n=== Scratch buffer ===");
    for error_condition in [false, true] {
        let outcome = process_with_scratch(&ledger, error_condition);
        println!("  error_condition={error_condition:<5} -> {outcome:?}");
    }

    println!("\n=== Comparator ===");
    for sample in run_comparison(&REFERENCE_SIZES) {
        println!(
            "  Size: {}, Result: {}, Time: {:.2} ms",
            sample.size,
            sample.result,
            sample.elapsed_ms()
        );
    }

    info!(
        outstanding = ledger.outstanding(),
        allocations = ledger.total_allocations(),
        releases = ledger.total_releases(),
        "ledger at exit"
    );
    assert!(ledger.is_balanced(), "allocations left outstanding");
}
