//! Block navigator.
//!
//! Every block is addressed by a pointer to its header word. These helpers
//! turn a header pointer into the pointers to its neighbors, its footer, and
//! its payload, purely via byte-offset arithmetic over the single heap
//! region — no typed pointers are dereferenced except to read the one word
//! a given operation needs.

use crate::consts::W;
use crate::header::decode_size;

/// Read the metadata word at `ptr`.
///
/// # Safety
/// `ptr` must be a valid, aligned, readable `usize`-sized location inside
/// the heap region.
#[inline]
pub unsafe fn read_word(ptr: *mut u8) -> usize {
    unsafe { ptr.cast::<usize>().read() }
}

/// Write the metadata word `word` at `ptr`.
///
/// # Safety
/// `ptr` must be a valid, aligned, writable `usize`-sized location inside
/// the heap region.
#[inline]
pub unsafe fn write_word(ptr: *mut u8, word: usize) {
    unsafe { ptr.cast::<usize>().write(word) }
}

/// Footer address of a block whose header is at `header` with size `size`.
/// Valid only when the block is free.
#[inline]
pub fn footer(header: *mut u8, size: usize) -> *mut u8 {
    unsafe { header.add(size - W) }
}

/// Header of the block physically following this one.
#[inline]
pub fn next_header(header: *mut u8, size: usize) -> *mut u8 {
    unsafe { header.add(size) }
}

/// Address of the previous block's footer word. Valid only when this
/// block's `prev_alloc` bit is clear.
#[inline]
pub fn prev_footer(header: *mut u8) -> *mut u8 {
    unsafe { header.sub(W) }
}

/// Header of the block physically preceding this one.
///
/// # Safety
/// Must only be called when `prev_alloc` for `header` is clear — otherwise
/// the predecessor carries no footer and this reads an unrelated word.
#[inline]
pub unsafe fn prev_header(header: *mut u8) -> *mut u8 {
    let pf = prev_footer(header);
    let prev_size = decode_size(unsafe { read_word(pf) });
    unsafe { pf.sub(prev_size).add(W) }
}

/// Payload start for a block whose header is at `header`.
#[inline]
pub fn payload(header: *mut u8) -> *mut u8 {
    unsafe { header.add(W) }
}

/// Header for a block given its payload pointer (also the free-list node
/// address for free blocks).
#[inline]
pub fn header_of_payload(p: *mut u8) -> *mut u8 {
    unsafe { p.sub(W) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{decode_alloc, decode_prev_alloc, encode_footer, encode_header};

    /// Lay out two adjacent blocks in a local buffer and walk between them.
    #[test]
    fn navigation_round_trip_over_adjacent_blocks() {
        let mut buf = [0u8; 256];
        let base = buf.as_mut_ptr();

        let first_size = 64usize;
        let second_size = 96usize;

        unsafe {
            // `base` is a free block (so it carries a footer); `second`'s
            // prev_alloc bit reflects that.
            write_word(base, encode_header(first_size, true, false));
            write_word(footer(base, first_size), encode_footer(first_size, false));

            let second = next_header(base, first_size);
            write_word(second, encode_header(second_size, false, true));

            assert_eq!(payload(base), base.add(W));
            assert_eq!(header_of_payload(payload(base)), base);

            assert_eq!(next_header(base, first_size), second);
            assert!(decode_alloc(read_word(second)));
            assert!(!decode_prev_alloc(read_word(second)));

            let pf = prev_footer(second);
            assert_eq!(pf, footer(base, first_size));
            assert_eq!(decode_size(read_word(pf)), first_size);

            assert_eq!(prev_header(second), base);
        }
    }
}
