//! Benchmark utilities for recstore.
//!
//! Two independent measurements live here:
//!
//! - [`even_doubled_sum`]: the numeric comparator. A pure function over
//!   `0..n`, timed by [`run_comparison`] at [`REFERENCE_SIZES`].
//! - [`time_store`]: create, sum and release one store of either mode,
//!   written once against [`RecordStore`].
//!
//! Timings are taken locally and returned as sample values; nothing here
//! keeps global counters.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::{Duration, Instant};

use recstore_arena::{AllocLedger, RecordStore, StoreMode};
use recstore_core::Result;
use tracing::debug;

/// Input sizes used by the comparator benchmark and the demo driver.
pub const REFERENCE_SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Record count used by the store benchmarks.
pub const REFERENCE_RECORD_COUNT: usize = 1_000;

/// Sum of `x * 2` over every even `x` in `0..n`.
///
/// `even_doubled_sum(6)` is `0 + 4 + 8 = 12`. Accumulates in `i64`, which
/// holds the result for every `n` below roughly six billion.
pub fn even_doubled_sum(n: usize) -> i64 {
    (0..n as i64).filter(|x| x % 2 == 0).map(|x| x * 2).sum()
}

/// One timed comparator run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchSample {
    /// Input size `n`.
    pub size: usize,
    /// `even_doubled_sum(size)`.
    pub result: i64,
    /// Wall time spent computing `result`.
    pub elapsed: Duration,
}

impl BenchSample {
    /// Elapsed time in fractional milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Time [`even_doubled_sum`] once per size, in order.
pub fn run_comparison(sizes: &[usize]) -> Vec<BenchSample> {
    sizes
        .iter()
        .map(|&size| {
            let start = Instant::now();
            let result = std::hint::black_box(even_doubled_sum(std::hint::black_box(size)));
            let elapsed = start.elapsed();
            debug!(size, result, ?elapsed, "comparator sample");
            BenchSample {
                size,
                result,
                elapsed,
            }
        })
        .collect()
}

/// One timed create, sum, release cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoreSample {
    /// Storage strategy measured.
    pub mode: StoreMode,
    /// Records created.
    pub count: usize,
    /// Sum over the created records.
    pub sum: f64,
    /// Tracked allocations freed by the release.
    pub allocations: usize,
    /// Wall time for the whole cycle.
    pub elapsed: Duration,
}

/// Create a store of type `S`, sum it, release it, and time the cycle.
///
/// Fails only if creation fails, in which case nothing is left allocated.
pub fn time_store<S: RecordStore>(count: usize, ledger: &AllocLedger) -> Result<StoreSample> {
    let start = Instant::now();
    let store = S::create(count, ledger)?;
    let sum = store.sum();
    let summary = store.release();
    let elapsed = start.elapsed();
    debug!(mode = %S::MODE, count, sum, ?elapsed, "store sample");
    Ok(StoreSample {
        mode: S::MODE,
        count,
        sum,
        allocations: summary.allocations,
        elapsed,
    })
}
