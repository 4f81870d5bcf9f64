//! Optional `GlobalAlloc` adapter.
//!
//! The core algorithm in [`crate::allocator::Allocator`] has no opinion
//! about Rust's `Layout`-based allocator traits — it only knows raw sizes.
//! This module is a thin bridge for callers who want to swap this crate in
//! as their process-wide `#[global_allocator]`, following the same
//! ecosystem convention other single-threaded allocator crates in this
//! family use. It adds no new algorithm: it normalizes `Layout` down to a
//! size (the allocator guarantees 16-byte alignment unconditionally, so
//! requests for a coarser alignment are rejected) and forwards to
//! `malloc`/`free`/`realloc`.

use std::alloc::{GlobalAlloc, Layout};
use std::sync::Mutex;

use crate::allocator::Allocator;
use crate::consts::A;
use crate::heap_provider::SbrkHeap;

/// A `GlobalAlloc`-compatible wrapper around an [`Allocator<SbrkHeap>`],
/// externally synchronized with a `Mutex` — this allocator itself has no
/// concurrency story of its own; the mutex is what makes it safe to
/// register as a `#[global_allocator]` in a multi-threaded program.
pub struct SyncAllocator {
    inner: Mutex<Allocator<SbrkHeap>>,
}

impl SyncAllocator {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Allocator::new(SbrkHeap::new())),
        }
    }
}

impl Default for SyncAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for SyncAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.align() > A {
            return std::ptr::null_mut();
        }
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        unsafe { guard.malloc(layout.size()) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        unsafe { guard.free(ptr) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if layout.align() > A {
            return std::ptr::null_mut();
        }
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        unsafe { guard.realloc(ptr, new_size) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if layout.align() > A {
            return std::ptr::null_mut();
        }
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        unsafe { guard.calloc(1, layout.size()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_alignment_coarser_than_sixteen() {
        let a = SyncAllocator::new();
        let layout = Layout::from_size_align(64, 32).unwrap();
        let p = unsafe { a.alloc(layout) };
        assert!(p.is_null());
    }
}
