//! Core types and traits for recstore.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the record shape shared by every storage mode, the name truncation
//! policy, the error taxonomy, and the read-side traits used by
//! benchmark and driver code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod record;
pub mod traits;

pub use error::{Result, StoreError};
pub use id::RecordId;
pub use record::{generated_value, InlineName, NAME_CAPACITY, NAME_MAX_LEN, NAME_PREFIX};
pub use traits::{RecordSource, RecordView};
