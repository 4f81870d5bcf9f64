//! # sfmalloc - A Segregated Free-List Memory Allocator
//!
//! This crate provides a general-purpose dynamic memory allocator that
//! services `malloc`/`free`/`realloc`/`calloc`-shaped requests against a
//! single, contiguous, monotonically-growable heap region supplied by a
//! pluggable [`HeapProvider`](heap_provider::HeapProvider).
//!
//! ## Overview
//!
//! The heap is partitioned into boundary-tagged blocks, each with a header
//! word (and a footer word, if free) encoding its size and allocation
//! state:
//!
//! ```text
//!   Allocated block                  Free block
//!   ┌──────────┬──────────┐          ┌──────────┬──────┬──────┬──────────┐
//!   │  header  │ payload  │          │  header  │ next │ prev │  footer  │
//!   └──────────┴──────────┘          └──────────┴──────┴──────┴──────────┘
//!    1 word      size - W              1 word     W      W       1 word
//! ```
//!
//! Freed blocks are threaded into one of sixteen size-classed circular
//! doubly-linked free lists (the list nodes live inside the block's own
//! payload, no separate node allocation), and are coalesced with
//! physically-adjacent free neighbors on release:
//!
//! ```text
//!   Segregated free lists (class 0..=15, by size upper bound):
//!
//!   head[0]  (<=32B)   ──► [node] ⇄ [node] ⇄ [node] ──┐
//!   head[1]  (<=48B)   ──► [node] ⇄ [node] ──────────┐│
//!     ...                                            ││
//!   head[15] (∞)       ──► (empty)                   ││
//!                                                     └┴─► back to head
//! ```
//!
//! ## Crate structure
//!
//! ```text
//!   sfmalloc
//!   ├── consts          - word size, alignment, size-class boundaries
//!   ├── header          - block metadata codec (encode/decode header words)
//!   ├── navigator        - header <-> footer <-> payload <-> neighbor math
//!   ├── size_class       - request size -> free-list class index
//!   ├── freelist         - the 16 intrusive circular doubly-linked lists
//!   ├── placement        - find-fit + split/consume on malloc
//!   ├── release          - four-case coalesce on free
//!   ├── extend           - heap growth + epilogue relocation
//!   ├── heap_provider     - the HeapProvider trait, SbrkHeap, BufferHeap
//!   ├── checker          - debug-only heap/free-list invariant walker
//!   ├── error            - HeapError, surfaced only by the checker
//!   ├── allocator        - Allocator<P>: malloc/free/realloc/calloc wiring
//!   └── global_alloc     - optional #[global_allocator]-compatible adapter
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use sfmalloc::{Allocator, BufferHeap};
//!
//! let mut allocator = Allocator::new(BufferHeap::with_capacity(1 << 16));
//!
//! unsafe {
//!     let p = allocator.malloc(64) as *mut u64;
//!     assert!(!p.is_null());
//!     p.write(42);
//!     assert_eq!(p.read(), 42);
//!     allocator.free(p as *mut u8);
//! }
//! ```
//!
//! ## How it works
//!
//! `malloc(n)` normalizes `n` to a block size (room for the header, rounded
//! up to 16 bytes, floored at the 32-byte minimum block), searches the free
//! lists starting at the request's own size class, and either splits an
//! oversized hit, consumes an exact one whole, or extends the heap on a
//! miss. `free(p)` merges the released block with whichever physically
//! adjacent neighbors are also free before reinserting it. `realloc` is
//! allocate-copy-release; `calloc` allocates and zeroes, with a checked
//! product so an overflowing `nmemb * size` misses instead of wrapping.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: an [`Allocator`] has no synchronization of
//!   its own; see [`global_alloc::SyncAllocator`] for a `Mutex`-wrapped
//!   adapter if you need a `#[global_allocator]`.
//! - **No memory unmapping**: blocks are never returned to the OS, only
//!   recycled within the process.
//! - **Fixed 16-byte alignment guarantee**: no support for coarser
//!   alignments.
//!
//! ## Safety
//!
//! This crate is inherently unsafe — it manages raw memory directly. Every
//! allocation and deallocation operation requires an `unsafe` block, and the
//! debug-only consistency checker (`checker`) is the only line of defense
//! against a caller violating its preconditions.

pub mod allocator;
pub mod checker;
pub mod consts;
pub mod error;
pub mod extend;
pub mod freelist;
pub mod global_alloc;
pub mod header;
pub mod heap_provider;
pub mod navigator;
pub mod placement;
pub mod release;
pub mod size_class;

pub use allocator::Allocator;
pub use error::HeapError;
pub use global_alloc::SyncAllocator;
pub use heap_provider::{AllocatorConfig, BufferHeap, HeapProvider, SbrkHeap};
