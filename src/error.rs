//! Typed error surface for internally-fatal conditions.
//!
//! Ordinary out-of-heap misses are never errors — they surface to callers as
//! null. `HeapError` exists only so the debug-only consistency checker can
//! log structured context before the process aborts; there is no recovery
//! path for a violated invariant.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// A forward heap walk found a block whose size is not a positive
    /// multiple of `A`, or that runs past `heap_hi`.
    MalformedBlock { header: usize },
    /// Two physically adjacent blocks are both free.
    AdjacentFreeBlocks { first_header: usize, second_header: usize },
    /// A block's `prev_alloc` bit disagrees with its predecessor's actual
    /// allocation state.
    PrevAllocMismatch { header: usize },
    /// A free block's footer size/alloc fields disagree with its header.
    FooterMismatch { header: usize },
    /// A free block is not present in its expected size class's list, or
    /// an allocated block is present in some list.
    ListMembershipViolation { header: usize },
    /// A free-list node's address is not `A`-aligned or lies outside the
    /// heap region.
    NodeOutOfBounds { node: usize },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::MalformedBlock { header } => {
                write!(f, "malformed block at header {header:#x}")
            }
            HeapError::AdjacentFreeBlocks { first_header, second_header } => write!(
                f,
                "uncoalesced adjacent free blocks at {first_header:#x} and {second_header:#x}"
            ),
            HeapError::PrevAllocMismatch { header } => {
                write!(f, "prev_alloc mismatch at header {header:#x}")
            }
            HeapError::FooterMismatch { header } => {
                write!(f, "footer/header mismatch for block at {header:#x}")
            }
            HeapError::ListMembershipViolation { header } => {
                write!(f, "free-list membership violation for block at {header:#x}")
            }
            HeapError::NodeOutOfBounds { node } => {
                write!(f, "free-list node {node:#x} is misaligned or out of bounds")
            }
        }
    }
}

impl std::error::Error for HeapError {}
