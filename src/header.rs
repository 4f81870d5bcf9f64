//! Block metadata codec.
//!
//! A header or footer is a single machine word. Size occupies bits `[4..)`
//! (so it is always a clean multiple of 16), bit 0 is `alloc`, bit 1 is
//! `prev_alloc`. Because size never touches the low bits, the three fields
//! can be OR'd together with no arithmetic collisions.

const ALLOC_BIT: usize = 1 << 0;
const PREV_ALLOC_BIT: usize = 1 << 1;
const SIZE_MASK: usize = !0xF;

/// Pack a header word. `size` must already be a multiple of 16.
#[inline]
pub const fn encode_header(size: usize, prev_alloc: bool, alloc: bool) -> usize {
    debug_assert!(size & !SIZE_MASK == 0);
    (size & SIZE_MASK) | if prev_alloc { PREV_ALLOC_BIT } else { 0 } | if alloc { ALLOC_BIT } else { 0 }
}

/// Pack a footer word (free blocks only). Bit 1 is left clear — footers
/// never carry `prev_alloc`.
#[inline]
pub const fn encode_footer(size: usize, alloc: bool) -> usize {
    debug_assert!(size & !SIZE_MASK == 0);
    (size & SIZE_MASK) | if alloc { ALLOC_BIT } else { 0 }
}

#[inline]
pub const fn decode_size(word: usize) -> usize {
    word & SIZE_MASK
}

#[inline]
pub const fn decode_alloc(word: usize) -> bool {
    word & ALLOC_BIT != 0
}

#[inline]
pub const fn decode_prev_alloc(word: usize) -> bool {
    word & PREV_ALLOC_BIT != 0
}

/// Idempotently set the `prev_alloc` bit, leaving size and `alloc` untouched.
#[inline]
pub const fn set_prev_alloc(word: usize) -> usize {
    word | PREV_ALLOC_BIT
}

/// Idempotently clear the `prev_alloc` bit, leaving size and `alloc` untouched.
#[inline]
pub const fn clear_prev_alloc(word: usize) -> usize {
    word & !PREV_ALLOC_BIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        for size in [32usize, 48, 96, 4096] {
            for prev_alloc in [false, true] {
                for alloc in [false, true] {
                    let word = encode_header(size, prev_alloc, alloc);
                    assert_eq!(decode_size(word), size);
                    assert_eq!(decode_alloc(word), alloc);
                    assert_eq!(decode_prev_alloc(word), prev_alloc);
                }
            }
        }
    }

    #[test]
    fn footer_carries_no_prev_alloc() {
        let word = encode_footer(64, false);
        assert_eq!(decode_size(word), 64);
        assert!(!decode_alloc(word));
        assert!(!decode_prev_alloc(word));
    }

    #[test]
    fn prev_alloc_bit_mutations_are_idempotent_and_isolated() {
        let word = encode_header(128, false, true);
        let set_once = set_prev_alloc(word);
        let set_twice = set_prev_alloc(set_once);
        assert_eq!(set_once, set_twice);
        assert_eq!(decode_size(set_once), 128);
        assert!(decode_alloc(set_once));
        assert!(decode_prev_alloc(set_once));

        let cleared_once = clear_prev_alloc(set_once);
        let cleared_twice = clear_prev_alloc(cleared_once);
        assert_eq!(cleared_once, cleared_twice);
        assert_eq!(decode_size(cleared_once), 128);
        assert!(decode_alloc(cleared_once));
        assert!(!decode_prev_alloc(cleared_once));
    }
}
