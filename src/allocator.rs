//! Public allocator surface: initialization and the `malloc`/`free`/
//! `realloc`/`calloc` family over an explicit [`Allocator`] value.
//!
//! The allocator is not hidden global state: it is a value the caller
//! constructs once (`Allocator::new(provider)`) and owns for as long as it
//! wants a heap. Every public call runs the (debug-only) consistency checker
//! at entry and exit.

use std::ptr;

use tracing::{instrument, trace};

use crate::checker;
use crate::consts::{PROLOGUE_SIZE, W};
use crate::error::HeapError;
use crate::freelist::FreeLists;
use crate::header::{decode_size, encode_footer, encode_header};
use crate::heap_provider::HeapProvider;
use crate::navigator::{footer, header_of_payload, next_header, read_word, write_word};
use crate::placement::{find_fit, normalize, place};
use crate::release::free_hf;
use crate::extend::extend_heap;

/// A single-threaded segregated free-list allocator over a pluggable
/// [`HeapProvider`]. One value per heap; callers needing concurrent access
/// must supply their own external synchronization.
pub struct Allocator<P: HeapProvider> {
    provider: P,
    lists: FreeLists,
    prologue_header: *mut u8,
    epilogue_header: *mut u8,
    initialized: bool,
}

// The raw pointers above only ever address the provider's own region, which
// the provider itself is trusted to manage; the type has no thread-safety
// story of its own — callers must synchronize externally.
unsafe impl<P: HeapProvider + Send> Send for Allocator<P> {}

impl<P: HeapProvider> Allocator<P> {
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            lists: FreeLists::new(),
            prologue_header: ptr::null_mut(),
            epilogue_header: ptr::null_mut(),
            initialized: false,
        }
    }

    /// Lay out the prologue and epilogue sentinels on first use. Returns
    /// `false` if the provider refuses even this first, tiny request, in
    /// which case the allocator has no heap to operate on and the caller
    /// must treat the triggering public call as an ordinary miss.
    fn ensure_init(&mut self) -> bool {
        if self.initialized {
            return true;
        }
        let Some(base) = self.provider.sbrk(4 * W) else {
            tracing::warn!("heap provider refused the initial sentinel request");
            return false;
        };
        let prologue = unsafe { base.add(W) };
        unsafe {
            write_word(prologue, encode_header(PROLOGUE_SIZE, true, true));
            write_word(footer(prologue, PROLOGUE_SIZE), encode_footer(PROLOGUE_SIZE, true));
            let epilogue = next_header(prologue, PROLOGUE_SIZE);
            write_word(epilogue, encode_header(0, true, true));
            self.epilogue_header = epilogue;
        }
        self.prologue_header = prologue;
        self.initialized = true;
        true
    }

    fn debug_check(&self, where_: &'static str) {
        if !checker::enabled() || !self.initialized {
            return;
        }
        if let Err(e) = self.check() {
            panic!("heap consistency check failed ({where_}): {e}");
        }
    }

    /// Walk the heap and free lists, checking every structural invariant.
    /// Exposed for callers — tests in particular — who want to assert
    /// consistency explicitly rather than rely on the debug-only
    /// entry/exit checks `malloc`/`free` already perform internally.
    pub fn check(&self) -> Result<(), HeapError> {
        if !self.initialized {
            return Ok(());
        }
        let lo = self.provider.heap_lo();
        let hi = self.provider.heap_hi();
        unsafe { checker::check(self.prologue_header, lo, hi, &self.lists) }
    }

    /// Allocate at least `size` bytes, `A`-aligned. Returns null on miss.
    ///
    /// # Safety
    /// Must not be called concurrently with any other call on this value.
    #[instrument(level = "trace", skip(self))]
    pub unsafe fn malloc(&mut self, size: usize) -> *mut u8 {
        self.debug_check("malloc:entry");
        if !self.ensure_init() {
            return ptr::null_mut();
        }

        let n_prime = normalize(size);
        let result = if let Some((header, class)) = unsafe { find_fit(&self.lists, n_prime) } {
            unsafe { place(&mut self.lists, header, class, n_prime) }
        } else {
            match unsafe { extend_heap(&mut self.provider, self.epilogue_header, n_prime) } {
                Some((payload, new_epilogue)) => {
                    self.epilogue_header = new_epilogue;
                    payload
                }
                None => {
                    self.debug_check("malloc:exit");
                    return ptr::null_mut();
                }
            }
        };
        trace!(size, n_prime, ptr = ?result, "malloc");
        self.debug_check("malloc:exit");
        result
    }

    /// Release a previously-`malloc`/`realloc`/`calloc`-returned pointer.
    /// Null is a no-op.
    ///
    /// # Safety
    /// `p` must be null, or a currently-live pointer returned by this
    /// allocator and not already freed.
    #[instrument(level = "trace", skip(self))]
    pub unsafe fn free(&mut self, p: *mut u8) {
        if p.is_null() {
            return;
        }
        self.debug_check("free:entry");
        unsafe { free_hf(&mut self.lists, header_of_payload(p)) };
        trace!(ptr = ?p, "free");
        self.debug_check("free:exit");
    }

    /// Resize a previously-allocated block, preserving its content up to
    /// `min(size, old_payload_size)` bytes. Null `p` behaves as `malloc`;
    /// `size == 0` behaves as `free` and returns null.
    ///
    /// # Safety
    /// `p` must be null or a currently-live pointer returned by this
    /// allocator.
    pub unsafe fn realloc(&mut self, p: *mut u8, size: usize) -> *mut u8 {
        if p.is_null() {
            return unsafe { self.malloc(size) };
        }
        if size == 0 {
            unsafe { self.free(p) };
            return ptr::null_mut();
        }

        let old_header = header_of_payload(p);
        let old_size = decode_size(unsafe { read_word(old_header) });
        let old_payload_size = old_size - W;

        let new_p = unsafe { self.malloc(size) };
        if new_p.is_null() {
            // Standard realloc contract: on failure the original block is
            // left untouched and still owned by the caller.
            return ptr::null_mut();
        }

        let copy_len = size.min(old_payload_size);
        unsafe { ptr::copy_nonoverlapping(p, new_p, copy_len) };
        unsafe { self.free(p) };
        new_p
    }

    /// Allocate `nmemb * size` bytes, zeroed. A `usize` overflow of the
    /// product is hardened: it returns null rather than wrapping.
    ///
    /// # Safety
    /// Must not be called concurrently with any other call on this value.
    pub unsafe fn calloc(&mut self, nmemb: usize, size: usize) -> *mut u8 {
        let Some(total) = nmemb.checked_mul(size) else {
            return ptr::null_mut();
        };
        let p = unsafe { self.malloc(total) };
        if !p.is_null() {
            unsafe { ptr::write_bytes(p, 0, total) };
        }
        p
    }
}
