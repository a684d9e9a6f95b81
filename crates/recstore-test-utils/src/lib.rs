//! Test utilities for recstore development.
//!
//! Provides a [`CountingAlloc`] global allocator for byte-level leak
//! checks and closed-form [`fixtures`] for asserting store contents.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod counting;
pub mod fixtures;

pub use counting::{measure, AllocDelta, AllocSnapshot, CountingAlloc};
pub use fixtures::{expected_even_doubled_sum, expected_name, expected_sum};
