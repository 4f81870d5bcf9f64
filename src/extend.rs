//! Heap extender.
//!
//! Called only by the placement engine on a search miss, and only with an
//! already-normalized size — there is no public entry point that can reach
//! this with a raw, unnormalized user size. The block it hands back is
//! **not** split and **not** inserted into any free list; it is returned
//! directly as the allocation.

use tracing::{debug, warn};

use crate::header::{decode_prev_alloc, encode_header};
use crate::heap_provider::HeapProvider;
use crate::navigator::{next_header, payload, read_word, write_word};

/// Grow the heap by exactly `n_prime` bytes, relocating the epilogue.
/// Returns the new block's payload pointer and the new epilogue's header
/// address, or `None` if the provider refused the request.
///
/// # Safety
/// `epilogue_header` must point at the current epilogue sentinel (a
/// single word of size 0, `alloc = 1`) at the current end of the heap.
pub unsafe fn extend_heap<P: HeapProvider>(
    provider: &mut P,
    epilogue_header: *mut u8,
    n_prime: usize,
) -> Option<(*mut u8, *mut u8)> {
    let q = decode_prev_alloc(unsafe { read_word(epilogue_header) });

    let base = match provider.sbrk(n_prime) {
        Some(base) => base,
        None => {
            warn!(n_prime, "heap provider refused extension request");
            return None;
        }
    };
    debug_assert_eq!(base, unsafe { payload(epilogue_header) }, "provider must place new segment immediately after the old epilogue");

    unsafe {
        write_word(epilogue_header, encode_header(n_prime, q, true));
        let new_epilogue = next_header(epilogue_header, n_prime);
        write_word(new_epilogue, encode_header(0, true, true));
        debug!(n_prime, base = ?base, "extended heap");
        Some((payload(epilogue_header), new_epilogue))
    }
}
