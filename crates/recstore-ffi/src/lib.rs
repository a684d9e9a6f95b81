//! C FFI bindings for recstore.
//!
//! Exposes the handle-based store API (`create` / `sum` / `len` /
//! `release`) to C callers. Every function returns an `i32`
//! [`RecstoreStatus`]; results are written through caller-provided out
//! pointers. Stale and never-issued handles are reported, never followed.
//!
//! Panics are caught at the boundary and reported as
//! [`RecstoreStatus::Panicked`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into `Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(_) => {
                tracing::error!("panic caught at FFI boundary");
                $crate::status::RecstoreStatus::Panicked as i32
            }
        }
    };
}

/// Lock a mutex, returning `InternalError` from the enclosing body if it
/// is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::error!("store table mutex poisoned");
                return $crate::status::RecstoreStatus::InternalError as i32;
            }
        }
    };
}

pub mod status;
pub mod store;

pub use status::RecstoreStatus;
pub use store::{recstore_create, recstore_len, recstore_release, recstore_sum};

#[cfg(test)]
mod tests {
    use super::*;

    fn panicking_entry_point() -> i32 {
        ffi_guard!({
            panic!("injected");
        })
    }

    fn poisoned_entry_point(lock: &std::sync::Mutex<u32>) -> i32 {
        ffi_guard!({
            let _guard = ffi_lock!(lock);
            RecstoreStatus::Ok as i32
        })
    }

    #[test]
    fn panic_is_reported_as_status() {
        assert_eq!(panicking_entry_point(), RecstoreStatus::Panicked as i32);
    }

    #[test]
    fn poisoned_lock_is_internal_error() {
        let lock = std::sync::Mutex::new(0u32);
        let _ = std::panic::catch_unwind(|| {
            let _guard = lock.lock().unwrap();
            panic!("poison");
        });
        assert!(lock.is_poisoned());
        assert_eq!(poisoned_entry_point(&lock), RecstoreStatus::InternalError as i32);
    }

    #[test]
    fn healthy_lock_passes_through() {
        let lock = std::sync::Mutex::new(0u32);
        assert_eq!(poisoned_entry_point(&lock), RecstoreStatus::Ok as i32);
    }
}
