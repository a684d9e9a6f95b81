//! A counting global allocator for byte-level leak checks.
//!
//! Install it in a test binary:
//!
//! ```ignore
//! use recstore_test_utils::CountingAlloc;
//!
//! #[global_allocator]
//! static GLOBAL: CountingAlloc = CountingAlloc;
//! ```
//!
//! Counters are per thread, so tests running in parallel do not see each
//! other's allocations. Only allocations made on the measuring thread are
//! counted.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static NET_BYTES: Cell<isize> = const { Cell::new(0) };
    static LIVE_BLOCKS: Cell<isize> = const { Cell::new(0) };
}

fn record(bytes: isize, blocks: isize) {
    // Ignore allocations made while the thread-locals are being torn down.
    let _ = NET_BYTES.try_with(|c| c.set(c.get() + bytes));
    let _ = LIVE_BLOCKS.try_with(|c| c.set(c.get() + blocks));
}

/// Wraps [`System`] and counts net bytes and live blocks per thread.
pub struct CountingAlloc;

// SAFETY: every method forwards to `System` with the caller's arguments
// unchanged; the bookkeeping touches only const-initialised thread-locals,
// which never allocate.
#[allow(unsafe_code)]
unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded under the caller's contract.
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record(layout.size() as isize, 1);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded under the caller's contract.
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record(layout.size() as isize, 1);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: forwarded under the caller's contract.
        unsafe { System.dealloc(ptr, layout) };
        record(-(layout.size() as isize), -1);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: forwarded under the caller's contract.
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            record(new_size as isize - layout.size() as isize, 0);
        }
        new_ptr
    }
}

/// Net allocation change on the current thread between two points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocDelta {
    /// Bytes allocated minus bytes freed.
    pub net_bytes: isize,
    /// Blocks allocated minus blocks freed.
    pub live_blocks: isize,
}

impl AllocDelta {
    /// Whether everything allocated in the window was freed in it.
    pub fn is_balanced(&self) -> bool {
        self.net_bytes == 0 && self.live_blocks == 0
    }
}

/// Counter values for the current thread at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocSnapshot {
    net_bytes: isize,
    live_blocks: isize,
}

impl AllocSnapshot {
    /// Capture the current thread's counters.
    pub fn now() -> Self {
        Self {
            net_bytes: NET_BYTES.with(Cell::get),
            live_blocks: LIVE_BLOCKS.with(Cell::get),
        }
    }

    /// Change since this snapshot was taken.
    pub fn delta(&self) -> AllocDelta {
        let now = Self::now();
        AllocDelta {
            net_bytes: now.net_bytes - self.net_bytes,
            live_blocks: now.live_blocks - self.live_blocks,
        }
    }
}

/// Run `f` and report the net allocation change it caused on this thread.
///
/// Anything `f` returns is dropped before measuring, so a balanced delta
/// means `f` left nothing allocated behind its result.
pub fn measure<R>(f: impl FnOnce() -> R) -> AllocDelta {
    let before = AllocSnapshot::now();
    drop(f());
    before.delta()
}
