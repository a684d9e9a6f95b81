//! Closed-form expectations for generated datasets.

use recstore_core::{generated_value, RecordId, NAME_PREFIX};

/// Sum of generated values for a store of `count` records:
/// `count * (count - 1) / 2 * 1.5`.
pub fn expected_sum(count: usize) -> f64 {
    let n = count as f64;
    n * (n - 1.0) / 2.0 * generated_value(RecordId(1))
}

/// Name of record `index` in a generated store.
pub fn expected_name(index: usize) -> String {
    format!("{NAME_PREFIX}{index}")
}

/// Sum of `2x` over the even `x` in `0..n`, computed without iteration.
pub fn expected_even_doubled_sum(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    // Evens are 0, 2, ..., 2(k-1) with k = ceil(n / 2); their sum is k(k-1).
    let k = (n + 1) / 2;
    2 * k * (k - 1)
}
