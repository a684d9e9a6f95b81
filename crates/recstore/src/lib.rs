//! recstore: owned collections of owned records, in two storage modes.
//!
//! This is the facade crate that re-exports the public API from the
//! recstore sub-crates. For most users, adding `recstore` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use recstore::prelude::*;
//!
//! let ledger = AllocLedger::new();
//!
//! // Dynamic mode: heap owned, released explicitly (or on drop).
//! let store = DynamicStore::create(1000, &ledger).unwrap();
//! assert_eq!(store.sum(), 749_250.0);
//! assert_eq!(store.get(42).unwrap().name(), "Record_42");
//! store.release();
//! assert!(ledger.is_balanced());
//!
//! // Fixed mode: inline storage, released at scope exit.
//! let fixed = FixedStore::<1000>::create(1000).unwrap();
//! assert_eq!(fixed.sum(), 749_250.0);
//!
//! // Handle API: stale handles are reported, not followed.
//! let mut table = StoreTable::new();
//! let h = table.create(10).unwrap();
//! table.release(h).unwrap();
//! assert_eq!(
//!     table.release(h),
//!     Err(StoreError::DoubleRelease { handle: h.raw() })
//! );
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `recstore-core` | Record ids, inline names, errors, read traits |
//! | [`store`] | `recstore-arena` | Fixed and dynamic stores, ledger, handle table, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Record ids, names, errors and read traits (`recstore-core`).
///
/// Contains [`types::StoreError`], [`types::InlineName`] and the
/// [`types::RecordView`] / [`types::RecordSource`] traits.
pub use recstore_core as types;

/// Record stores and their accounting (`recstore-arena`).
///
/// [`store::FixedStore`] and [`store::DynamicStore`] implement
/// [`store::RecordStore`]; [`store::StoreTable`] hands out checked
/// handles; [`store::with_store`] picks a mode from a
/// [`store::StoreConfig`].
pub use recstore_arena as store;

/// Common imports for typical recstore usage.
///
/// ```rust
/// use recstore::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use recstore_core::{RecordId, RecordSource, RecordView, Result, StoreError};

    // Stores
    pub use recstore_arena::{DynamicStore, FixedStore, RecordStore, ReleaseSummary};

    // Handles and accounting
    pub use recstore_arena::{AllocLedger, StoreHandle, StoreTable};

    // Configuration
    pub use recstore_arena::{with_store, ConfigError, StoreConfig, StoreMode, FIXED_CAPACITY};
}
