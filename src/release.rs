//! Release & coalesce (`free_hf`).
//!
//! Merges a newly-freed block with whichever physically adjacent neighbors
//! are also free, removing any neighbor from its old free list before the
//! merged block is (re)inserted into the list for its new size class — size
//! class membership can change across a coalesce, so remove-then-insert is
//! mandatory, never an in-place resize.

use tracing::debug;

use crate::freelist::FreeLists;
use crate::header::{
    decode_alloc, decode_prev_alloc, decode_size, encode_footer, encode_header, clear_prev_alloc,
};
use crate::navigator::{footer, next_header, payload, prev_header, read_word, write_word};
use crate::size_class::get_index;

/// Free the block at `header` (currently marked allocated), coalescing with
/// whichever neighbors are free, and insert the result into its class list.
///
/// # Safety
/// `header` must be the header of a currently-allocated block that tiles
/// correctly with its neighbors (the navigator's usual preconditions).
pub unsafe fn free_hf(lists: &mut FreeLists, header: *mut u8) {
    let word = unsafe { read_word(header) };
    let size = decode_size(word);
    let prev_alloc = decode_prev_alloc(word);
    let next = next_header(header, size);
    let next_alloc = decode_alloc(unsafe { read_word(next) });

    match (prev_alloc, next_alloc) {
        (true, true) => {
            debug!(size, "free: both neighbors allocated");
            unsafe {
                write_word(header, encode_header(size, true, false));
                write_word(footer(header, size), encode_footer(size, false));
                let next_word = read_word(next);
                write_word(next, clear_prev_alloc(next_word));
                lists.add(payload(header), get_index(size));
            }
        }
        (false, true) => {
            unsafe {
                let prev = prev_header(header);
                let prev_word = read_word(prev);
                let prev_size = decode_size(prev_word);
                let prev_prev_alloc = decode_prev_alloc(prev_word);
                lists.remove(payload(prev), get_index(prev_size));

                let merged_size = prev_size + size;
                debug!(size, prev_size, merged_size, "free: coalescing with previous");
                write_word(prev, encode_header(merged_size, prev_prev_alloc, false));
                write_word(footer(prev, merged_size), encode_footer(merged_size, false));
                let next_word = read_word(next);
                write_word(next, clear_prev_alloc(next_word));
                lists.add(payload(prev), get_index(merged_size));
            }
        }
        (true, false) => {
            unsafe {
                let next_word = read_word(next);
                let next_size = decode_size(next_word);
                lists.remove(payload(next), get_index(next_size));

                let merged_size = size + next_size;
                debug!(size, next_size, merged_size, "free: coalescing with next");
                write_word(header, encode_header(merged_size, true, false));
                write_word(footer(header, merged_size), encode_footer(merged_size, false));
                lists.add(payload(header), get_index(merged_size));
            }
        }
        (false, false) => {
            unsafe {
                let prev = prev_header(header);
                let prev_word = read_word(prev);
                let prev_size = decode_size(prev_word);
                let prev_prev_alloc = decode_prev_alloc(prev_word);
                lists.remove(payload(prev), get_index(prev_size));

                let next_word = read_word(next);
                let next_size = decode_size(next_word);
                lists.remove(payload(next), get_index(next_size));

                let merged_size = prev_size + size + next_size;
                debug!(size, prev_size, next_size, merged_size, "free: coalescing with both neighbors");
                write_word(prev, encode_header(merged_size, prev_prev_alloc, false));
                write_word(footer(prev, merged_size), encode_footer(merged_size, false));
                lists.add(payload(prev), get_index(merged_size));
            }
        }
    }
}
