//! Record naming and value policy shared by every storage mode.
//!
//! Each record name is provisioned with exactly [`NAME_CAPACITY`] bytes of
//! storage, one of which is reserved for a terminator. Text longer than
//! [`NAME_MAX_LEN`] bytes is truncated on a character boundary. The
//! truncation is silent: it is the documented naming policy, not an error.

use std::fmt;

use crate::id::RecordId;

/// Bytes of storage provisioned for every record name, terminator included.
pub const NAME_CAPACITY: usize = 50;

/// Maximum number of content bytes a name can hold.
pub const NAME_MAX_LEN: usize = NAME_CAPACITY - 1;

/// Prefix of every generated record name.
pub const NAME_PREFIX: &str = "Record_";

/// Scale factor applied to the id to produce the generated value.
const VALUE_SCALE: f64 = 1.5;

/// Value assigned to record `id` in the generated dataset.
pub fn generated_value(id: RecordId) -> f64 {
    f64::from(id.0) * VALUE_SCALE
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a
/// UTF-8 sequence.
pub fn truncate_to_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// A record name stored inline in a fixed `[u8; NAME_CAPACITY]` buffer.
///
/// Used directly by fixed-capacity stores, and as the formatting scratch
/// for heap-backed names so both modes apply the same truncation.
/// Implements [`fmt::Write`]; writes past the capacity are dropped.
#[derive(Clone, Copy)]
pub struct InlineName {
    bytes: [u8; NAME_CAPACITY],
    /// Content length; `bytes[len]` is always the zero terminator.
    len: u8,
}

impl InlineName {
    /// An empty name.
    pub const fn new() -> Self {
        Self {
            bytes: [0; NAME_CAPACITY],
            len: 0,
        }
    }

    /// Build a name from `text`, truncating to [`NAME_MAX_LEN`] bytes.
    pub fn from_text(text: &str) -> Self {
        let mut name = Self::new();
        name.push_truncated(text);
        name
    }

    /// The generated name for record `id`: `"Record_<id>"`.
    pub fn generated(id: RecordId) -> Self {
        let mut name = Self::new();
        // Writing into an InlineName never fails; overflow is truncated.
        let _ = fmt::Write::write_fmt(&mut name, format_args!("{NAME_PREFIX}{id}"));
        name
    }

    /// The name content.
    pub fn as_str(&self) -> &str {
        // Only whole UTF-8 sequences are ever copied in.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }

    /// Content length in bytes, terminator excluded.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the name has no content.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remaining content bytes before truncation kicks in.
    pub fn remaining(&self) -> usize {
        NAME_MAX_LEN - self.len as usize
    }

    fn push_truncated(&mut self, text: &str) {
        let fitting = truncate_to_boundary(text, self.remaining());
        let start = self.len as usize;
        let end = start + fitting.len();
        self.bytes[start..end].copy_from_slice(fitting.as_bytes());
        self.bytes[end] = 0;
        self.len = end as u8;
    }
}

impl Default for InlineName {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for InlineName {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_truncated(s);
        Ok(())
    }
}

impl fmt::Debug for InlineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InlineName").field(&self.as_str()).finish()
    }
}

impl fmt::Display for InlineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for InlineName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for InlineName {}
