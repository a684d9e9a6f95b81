//! Record storage for recstore: fixed-capacity and dynamic stores.
//!
//! Provides two interchangeable implementations of one capability set
//! (create, sum, release) plus the accounting needed to prove that every
//! owned allocation is released exactly once.
//!
//! # Architecture
//!
//! ```text
//! RecordStore (trait: create / sum / release)
//! ├── FixedStore<N>     inline [FixedRecord; N], no heap, scope-released
//! └── DynamicStore      Tracked<Vec<Record>> + one Tracked<String> per name
//!
//! StoreTable            slot+generation handles over DynamicStore
//! AllocLedger           outstanding-allocation counters + failure budget
//! ScratchBuffer         tracked temporary bytes for early-return paths
//! with_store()          StoreConfig-selected store lent as &dyn RecordSource
//! ```
//!
//! # Release guarantees
//!
//! - **Owned API:** `release(self)` consumes the store; using it afterwards
//!   does not compile. Dropping an unreleased store releases it.
//! - **Handle API:** stale handles are detected by generation and reported
//!   as `UseAfterRelease` / `DoubleRelease`; released memory is never read.
//! - **Creation:** all-or-nothing. A failed name allocation rolls back every
//!   record built so far.
//!
//! No `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dynamic;
pub mod fixed;
pub mod handle;
pub mod ledger;
pub mod record;
pub mod scratch;
pub mod select;
pub mod store;

// Public re-exports for the primary API surface.
pub use config::{ConfigError, StoreConfig, StoreMode, FIXED_CAPACITY};
pub use dynamic::DynamicStore;
pub use fixed::FixedStore;
pub use handle::{StoreHandle, StoreTable};
pub use ledger::{AllocLedger, LedgerToken, Tracked};
pub use record::{FixedRecord, Record};
pub use scratch::{process_with_scratch, ProcessError, ScratchBuffer, DEFAULT_SCRATCH_BYTES};
pub use select::with_store;
pub use store::{RecordStore, ReleaseSummary};
