//! Consistency checker (debug-only).
//!
//! Walks the heap forward from the prologue to the epilogue, then walks all
//! sixteen free lists, cross-checking tiling, prev-alloc coherence,
//! no-adjacent-free-blocks, footer agreement, and list membership. Called
//! at entry and exit of every public operation when `debug_assertions` is
//! on or the `strict-checks` feature is enabled; a no-op otherwise. A
//! failure is logged and then fatal.

use std::collections::HashSet;

use tracing::error;

use crate::consts::{A, EPILOGUE_SIZE, MIN_BLOCK_SIZE};
use crate::error::HeapError;
use crate::freelist::FreeLists;
use crate::header::{decode_alloc, decode_prev_alloc, decode_size};
use crate::navigator::{footer, next_header, read_word};
use crate::size_class::get_index;

/// Whether the checker should actually run. Mirrors `debug_assert!`'s own
/// gating, plus an opt-in `strict-checks` feature for release builds that
/// still want the checker.
#[inline]
pub const fn enabled() -> bool {
    cfg!(debug_assertions) || cfg!(feature = "strict-checks")
}

/// Walk the heap and free lists, returning the first invariant violation
/// found, if any.
///
/// # Safety
/// `prologue_header` must point at the permanent prologue block and the
/// heap between `heap_lo`/`heap_hi` must be the allocator's own region.
pub unsafe fn check(
    prologue_header: *mut u8,
    heap_lo: *mut u8,
    heap_hi: *mut u8,
    lists: &FreeLists,
) -> Result<(), HeapError> {
    let mut free_headers: HashSet<usize> = HashSet::new();

    // --- forward walk: prologue -> epilogue ---
    let mut header = prologue_header;
    let mut prev_was_alloc = true; // nothing precedes the prologue
    loop {
        let word = unsafe { read_word(header) };
        let size = decode_size(word);
        let alloc = decode_alloc(word);
        let prev_alloc = decode_prev_alloc(word);

        if size == 0 {
            // Epilogue: must sit exactly at the last word of the heap.
            if (header as usize) + EPILOGUE_SIZE - 1 > heap_hi as usize {
                return Err(fail(HeapError::MalformedBlock { header: header as usize }));
            }
            break;
        }

        let is_sentinel = header == prologue_header;
        if size % A != 0 || (!is_sentinel && size < MIN_BLOCK_SIZE) {
            return Err(fail(HeapError::MalformedBlock { header: header as usize }));
        }
        if (header as usize) < heap_lo as usize || (header as usize) + size - 1 > heap_hi as usize
        {
            return Err(fail(HeapError::MalformedBlock { header: header as usize }));
        }

        if prev_alloc != prev_was_alloc && !is_sentinel {
            return Err(fail(HeapError::PrevAllocMismatch { header: header as usize }));
        }

        if !alloc {
            if !prev_was_alloc {
                let prev = unsafe { crate::navigator::prev_header(header) };
                return Err(fail(HeapError::AdjacentFreeBlocks {
                    first_header: prev as usize,
                    second_header: header as usize,
                }));
            }
            let f = footer(header, size);
            let fword = unsafe { read_word(f) };
            if decode_size(fword) != size || decode_alloc(fword) {
                return Err(fail(HeapError::FooterMismatch { header: header as usize }));
            }
            free_headers.insert(header as usize);
        }

        prev_was_alloc = alloc;
        header = next_header(header, size);
    }

    // --- free-list walk ---
    let mut remaining = free_headers.clone();
    for class in 0..crate::consts::NUM_CLASSES {
        for node in unsafe { lists.iter(class) } {
            if (node as usize) % A != 0
                || (node as usize) < heap_lo as usize
                || (node as usize) > heap_hi as usize
            {
                return Err(fail(HeapError::NodeOutOfBounds { node: node as usize }));
            }
            let block_header = crate::navigator::header_of_payload(node);
            let word = unsafe { read_word(block_header) };
            let size = decode_size(word);
            if decode_alloc(word) || !remaining.remove(&(block_header as usize)) {
                return Err(fail(HeapError::ListMembershipViolation {
                    header: block_header as usize,
                }));
            }
            if get_index(size) != class {
                return Err(fail(HeapError::ListMembershipViolation {
                    header: block_header as usize,
                }));
            }
        }
    }
    if !remaining.is_empty() {
        let header = *remaining.iter().next().unwrap();
        return Err(fail(HeapError::ListMembershipViolation { header }));
    }

    Ok(())
}

fn fail(err: HeapError) -> HeapError {
    error!(error = %err, "heap consistency check failed");
    err
}
