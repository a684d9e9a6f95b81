//! Store lifecycle FFI: create, sum, len, release.
//!
//! All stores live in one process-wide [`StoreTable`]. The table lock is
//! held only for the duration of a single call.

use std::sync::{LazyLock, Mutex};

use recstore_arena::{StoreHandle, StoreTable};

use crate::status::RecstoreStatus;

static STORES: LazyLock<Mutex<StoreTable>> = LazyLock::new(|| Mutex::new(StoreTable::new()));

/// Create a store of `count` generated records.
///
/// On success, writes the store handle to `handle_out` and returns
/// `RECSTORE_STATUS_OK`. On failure nothing is created and `handle_out` is
/// left untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn recstore_create(count: usize, handle_out: *mut u64) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return RecstoreStatus::InvalidArgument as i32;
        }
        let handle = match ffi_lock!(STORES).create(count) {
            Ok(h) => h,
            Err(e) => return RecstoreStatus::from(&e) as i32,
        };
        // SAFETY: handle_out is non-null and valid per caller contract.
        unsafe { *handle_out = handle.raw() };
        RecstoreStatus::Ok as i32
    })
}

/// Sum of `value` over every record of a live store, written to `sum_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn recstore_sum(handle: u64, sum_out: *mut f64) -> i32 {
    ffi_guard!({
        if sum_out.is_null() {
            return RecstoreStatus::InvalidArgument as i32;
        }
        let sum = match ffi_lock!(STORES).sum(StoreHandle::from_raw(handle)) {
            Ok(s) => s,
            Err(e) => return RecstoreStatus::from(&e) as i32,
        };
        // SAFETY: sum_out is non-null and valid per caller contract.
        unsafe { *sum_out = sum };
        RecstoreStatus::Ok as i32
    })
}

/// Number of records in a live store, written to `len_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn recstore_len(handle: u64, len_out: *mut usize) -> i32 {
    ffi_guard!({
        if len_out.is_null() {
            return RecstoreStatus::InvalidArgument as i32;
        }
        let len = match ffi_lock!(STORES).len(StoreHandle::from_raw(handle)) {
            Ok(n) => n,
            Err(e) => return RecstoreStatus::from(&e) as i32,
        };
        // SAFETY: len_out is non-null and valid per caller contract.
        unsafe { *len_out = len };
        RecstoreStatus::Ok as i32
    })
}

/// Release a store and every name it owns.
///
/// Releasing the same handle twice returns `RECSTORE_STATUS_DOUBLE_RELEASE`
/// and frees nothing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn recstore_release(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(STORES).release(StoreHandle::from_raw(handle)) {
            Ok(_) => RecstoreStatus::Ok as i32,
            Err(e) => RecstoreStatus::from(&e) as i32,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create(count: usize) -> u64 {
        let mut h: u64 = 0;
        assert_eq!(recstore_create(count, &mut h), RecstoreStatus::Ok as i32);
        h
    }

    #[test]
    fn create_sum_release_round_trip() {
        let h = create(1000);
        let mut sum = 0.0f64;
        assert_eq!(recstore_sum(h, &mut sum), RecstoreStatus::Ok as i32);
        assert_eq!(sum, 749_250.0);
        let mut len = 0usize;
        assert_eq!(recstore_len(h, &mut len), RecstoreStatus::Ok as i32);
        assert_eq!(len, 1000);
        assert_eq!(recstore_release(h), RecstoreStatus::Ok as i32);
    }

    #[test]
    fn double_release_returns_double_release() {
        let h = create(10);
        assert_eq!(recstore_release(h), RecstoreStatus::Ok as i32);
        assert_eq!(recstore_release(h), RecstoreStatus::DoubleRelease as i32);
    }

    #[test]
    fn use_after_release_returns_use_after_release() {
        let h = create(10);
        recstore_release(h);
        let mut sum = -1.0f64;
        assert_eq!(
            recstore_sum(h, &mut sum),
            RecstoreStatus::UseAfterRelease as i32
        );
        assert_eq!(sum, -1.0, "out pointer must be untouched on error");
        let mut len = 0usize;
        assert_eq!(
            recstore_len(h, &mut len),
            RecstoreStatus::UseAfterRelease as i32
        );
    }

    #[test]
    fn never_issued_handle_is_invalid() {
        let bogus = u64::from(u32::MAX - 1) << 32;
        let mut sum = 0.0f64;
        assert_eq!(recstore_sum(bogus, &mut sum), RecstoreStatus::InvalidHandle as i32);
        assert_eq!(recstore_release(bogus), RecstoreStatus::InvalidHandle as i32);
    }

    #[test]
    fn zero_count_is_invalid_argument() {
        let mut h: u64 = 0xDEAD;
        assert_eq!(recstore_create(0, &mut h), RecstoreStatus::InvalidArgument as i32);
        assert_eq!(h, 0xDEAD);
    }

    #[test]
    fn null_out_pointers_are_invalid_argument() {
        assert_eq!(
            recstore_create(10, std::ptr::null_mut()),
            RecstoreStatus::InvalidArgument as i32
        );
        let h = create(3);
        assert_eq!(
            recstore_sum(h, std::ptr::null_mut()),
            RecstoreStatus::InvalidArgument as i32
        );
        assert_eq!(
            recstore_len(h, std::ptr::null_mut()),
            RecstoreStatus::InvalidArgument as i32
        );
        assert_eq!(recstore_release(h), RecstoreStatus::Ok as i32);
    }

    #[test]
    fn distinct_stores_are_independent() {
        let a = create(4);
        let b = create(6);
        assert_ne!(a, b);
        assert_eq!(recstore_release(a), RecstoreStatus::Ok as i32);
        let mut sum = 0.0f64;
        assert_eq!(recstore_sum(b, &mut sum), RecstoreStatus::Ok as i32);
        assert_eq!(sum, 22.5);
        assert_eq!(recstore_release(b), RecstoreStatus::Ok as i32);
    }

    proptest! {
        #[test]
        fn sum_matches_closed_form(count in 1usize..300) {
            let h = create(count);
            let mut sum = 0.0f64;
            prop_assert_eq!(recstore_sum(h, &mut sum), RecstoreStatus::Ok as i32);
            let n = count as f64;
            prop_assert_eq!(sum, 1.5 * n * (n - 1.0) / 2.0);
            prop_assert_eq!(recstore_release(h), RecstoreStatus::Ok as i32);
            prop_assert_eq!(recstore_release(h), RecstoreStatus::DoubleRelease as i32);
        }
    }
}
