use std::io::Read;

use libc::sbrk;
use sfmalloc::{Allocator, SbrkHeap};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`, `htop`,
/// `gdb`, or just visually track how allocations change the program break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
/// The program break is the upper boundary of the heap managed via brk/sbrk.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() {
  // Surface the allocator's `tracing` events (extension, split/coalesce
  // decisions, checker failures) on stderr; set `RUST_LOG=trace` to see
  // every malloc/free call.
  tracing_subscriber::fmt::init();

  // Our allocator: a segregated free-list allocator backed by the real
  // process heap via `sbrk`. It holds 16 free-list heads plus the
  // prologue/epilogue sentinel state, lazily initialized on first use.
  let mut allocator = Allocator::new(SbrkHeap::new());

  unsafe {
    // Initial heap state
    print_program_break("start");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 1) Allocate space for a u32 (4 bytes).
    // --------------------------------------------------------------------
    let first_block = allocator.malloc(4);
    println!("\n[1] malloc(4) -> {:?}", first_block);

    let first_ptr = first_block as *mut u32;
    first_ptr.write(0xDEADBEEF);
    println!("[1] Value written to first_block = 0x{:X}", first_ptr.read());

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) Allocate 12 bytes.
    //    This shows how the allocator normalizes an "odd-sized" request
    //    up to a 16-byte-aligned block.
    // --------------------------------------------------------------------
    let second_block = allocator.malloc(12);
    println!("\n[2] malloc(12) -> {:?}", second_block);
    std::ptr::write_bytes(second_block, 0xAB, 12);
    println!("[2] Initialized second block with 0xAB");

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Allocate a u64 to observe the crate's 16-byte alignment guarantee.
    // --------------------------------------------------------------------
    let third_block = allocator.malloc(8);
    println!("\n[3] malloc(8) -> {:?}", third_block);

    let third_ptr = third_block as *mut u64;
    third_ptr.write(0x1122334455667788);
    println!("[3] Value written = 0x{:X}", third_ptr.read());
    println!(
      "[3] Address = {:#X}, addr % 16 = {}",
      third_block as usize,
      third_block as usize % 16
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) Allocate an array of 16 u16s (32 bytes) to force more splitting.
    // --------------------------------------------------------------------
    let fourth_block = allocator.malloc(32);
    println!("\n[4] malloc(32) for [u16; 16]");
    let fourth_ptr = fourth_block as *mut u16;
    for i in 0..16 {
      fourth_ptr.add(i).write(i as u16);
    }
    println!("[4] Wrote 0..15 into the u16 array");

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) Free the first block. Unlike a bump allocator, this one does
    //    reclaim the block: it is merged with any free neighbors and
    //    threaded into its size class's free list.
    // --------------------------------------------------------------------
    allocator.free(first_block);
    println!("\n[5] Freed first_block at {:?}", first_block);
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Allocate a small block (2 bytes) to see if the allocator
    //    reuses the just-freed block instead of extending the heap.
    // --------------------------------------------------------------------
    let fifth_block = allocator.malloc(2);
    println!("\n[6] malloc(2) -> {:?} (check reuse of freed block)", fifth_block);
    println!(
      "[6] fifth_block == first_block? {}",
      if fifth_block == first_block {
        "Yes, it reused the freed block"
      } else {
        "No, it allocated somewhere else"
      }
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 7) Allocate a large block to observe heap growth via the extender.
    //    This usually changes the result of `sbrk(0)`.
    // --------------------------------------------------------------------
    print_program_break("before large alloc");

    let big_block = allocator.malloc(64 * 1024);
    println!("\n[7] malloc(64 KiB) -> {:?}", big_block);

    print_program_break("after large alloc");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 8) Grow a block with realloc, then zero a fresh one with calloc.
    // --------------------------------------------------------------------
    let grown = allocator.realloc(second_block, 256);
    println!("\n[8] realloc(second_block, 256) -> {:?}", grown);
    assert_eq!((grown as *mut u8).add(0).read(), 0xAB, "realloc must preserve the prefix");

    let zeroed = allocator.calloc(16, 4);
    println!("[8] calloc(16, 4) -> {:?}", zeroed);
    for i in 0..64 {
      assert_eq!(zeroed.add(i).read(), 0, "calloc must zero every byte");
    }
    println!("[8] calloc block verified all-zero");

    allocator.free(grown);
    allocator.free(third_block);
    allocator.free(fourth_block);
    allocator.free(fifth_block);
    allocator.free(big_block);
    allocator.free(zeroed);

    println!("\n[9] End of walkthrough. Process will exit and the OS will reclaim all memory.");
  }
}
