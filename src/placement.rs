//! Placement engine.
//!
//! Normalizes a caller-facing request size, searches the segregated
//! free-list registry starting at the request's own class and upward,
//! returning the **first** block that fits (plain first-fit — no
//! best-of-k tie-breaking), then either splits the chosen block or
//! consumes it whole.

use tracing::debug;

use crate::consts::{align_up, A, MIN_BLOCK_SIZE, NUM_CLASSES, W};
use crate::freelist::FreeLists;
use crate::header::{decode_prev_alloc, decode_size, encode_footer, encode_header, set_prev_alloc};
use crate::navigator::{footer, header_of_payload, next_header, payload, read_word, write_word};
use crate::size_class::get_index;

/// Normalize a caller-facing request size `n` into a block size: room for
/// the header, rounded up to `A`, floored at the minimum block size.
#[inline]
pub fn normalize(n: usize) -> usize {
    MIN_BLOCK_SIZE.max(align_up(n + W, A))
}

/// Search classes `get_index(n_prime)..NUM_CLASSES`, returning the first
/// free block (header pointer, its current class) whose size is >= `n_prime`.
///
/// # Safety
/// The free lists must be well-formed.
pub unsafe fn find_fit(lists: &FreeLists, n_prime: usize) -> Option<(*mut u8, usize)> {
    for class in get_index(n_prime)..NUM_CLASSES {
        for node in unsafe { lists.iter(class) } {
            let header = header_of_payload(node);
            let size = decode_size(unsafe { read_word(header) });
            if size >= n_prime {
                return Some((header, class));
            }
        }
    }
    None
}

/// Remove the chosen block from its list, split it if the remainder is at
/// least a minimum block, then mark it allocated (and the successor's
/// `prev_alloc`, if consumed whole). Returns the payload pointer.
///
/// # Safety
/// `header` must currently be the header of a free block that is a member
/// of `lists`'s `class` list, with size `>= n_prime`.
pub unsafe fn place(lists: &mut FreeLists, header: *mut u8, class: usize, n_prime: usize) -> *mut u8 {
    unsafe {
        lists.remove(payload(header), class);
    }

    let word = unsafe { read_word(header) };
    let size = decode_size(word);
    let prev_alloc = decode_prev_alloc(word);

    if size - n_prime >= MIN_BLOCK_SIZE {
        debug!(size, n_prime, remainder = size - n_prime, "splitting free block");
        unsafe {
            write_word(header, encode_header(n_prime, prev_alloc, true));
            let remainder = next_header(header, n_prime);
            let remainder_size = size - n_prime;
            write_word(remainder, encode_header(remainder_size, true, false));
            write_word(footer(remainder, remainder_size), encode_footer(remainder_size, false));
            lists.add(payload(remainder), get_index(remainder_size));
        }
    } else {
        debug!(size, n_prime, "consuming whole free block, no split");
        unsafe {
            write_word(header, encode_header(size, prev_alloc, true));
            let succ = next_header(header, size);
            let succ_word = read_word(succ);
            write_word(succ, set_prev_alloc(succ_word));
        }
    }

    payload(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::decode_alloc;

    #[test]
    fn normalize_floors_at_minimum_and_rounds_to_alignment() {
        assert_eq!(normalize(0), MIN_BLOCK_SIZE);
        assert_eq!(normalize(1), MIN_BLOCK_SIZE);
        assert_eq!(normalize(24), MIN_BLOCK_SIZE);
        assert_eq!(normalize(24 + W), MIN_BLOCK_SIZE); // exactly 32
        assert_eq!(normalize(200), align_up(200 + W, A));
    }

    #[test]
    fn place_splits_when_remainder_is_large_enough() {
        let mut buf = [0u8; 256];
        let base = buf.as_mut_ptr();
        let block_size = 128usize;
        unsafe {
            write_word(base, encode_header(block_size, true, false));
            write_word(footer(base, block_size), encode_footer(block_size, false));
        }
        let mut lists = FreeLists::new();
        unsafe { lists.add(payload(base), get_index(block_size)) };

        let n_prime = normalize(40); // 48
        let (header, class) = unsafe { find_fit(&lists, n_prime) }.unwrap();
        assert_eq!(header, base);

        unsafe { place(&mut lists, header, class, n_prime) };

        let word = unsafe { read_word(base) };
        assert_eq!(decode_size(word), n_prime);
        assert!(decode_alloc(word));

        let remainder = next_header(base, n_prime);
        let rword = unsafe { read_word(remainder) };
        assert_eq!(decode_size(rword), block_size - n_prime);
        assert!(!decode_alloc(rword));
        assert!(decode_prev_alloc(rword));
        assert!(!lists.is_empty(get_index(block_size - n_prime)));
    }

    #[test]
    fn place_consumes_whole_block_when_remainder_too_small() {
        let mut buf = [0u8; 256];
        let base = buf.as_mut_ptr();
        let block_size = 48usize; // n_prime(40)=48, remainder would be 0
        unsafe {
            write_word(base, encode_header(block_size, true, false));
            write_word(footer(base, block_size), encode_footer(block_size, false));
            let succ = next_header(base, block_size);
            write_word(succ, encode_header(64, false, true));
        }
        let mut lists = FreeLists::new();
        unsafe { lists.add(payload(base), get_index(block_size)) };

        let n_prime = normalize(40);
        assert_eq!(n_prime, block_size);
        let (header, class) = unsafe { find_fit(&lists, n_prime) }.unwrap();
        unsafe { place(&mut lists, header, class, n_prime) };

        let word = unsafe { read_word(base) };
        assert_eq!(decode_size(word), block_size);
        assert!(decode_alloc(word));

        let succ = next_header(base, block_size);
        let succ_word = unsafe { read_word(succ) };
        assert!(decode_prev_alloc(succ_word));
        assert!(lists.is_empty(get_index(block_size)));
    }
}
