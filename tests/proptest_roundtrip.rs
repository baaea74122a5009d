//! Property-based tests of the round-trip laws from spec.md §8, run over
//! randomized allocation sizes and sequences. Grounded on
//! `backtrace-labs-slitter`'s use of `proptest` for the same purpose in a
//! comparably-shaped slab allocator.

use std::sync::Mutex;

use proptest::prelude::*;

use buddyheap::{allocate, destroy, init, release};

static SERIAL: Mutex<()> = Mutex::new(());

fn with_allocator<R, F: FnOnce() -> R>(f: F) -> R {
    let _guard = SERIAL.lock().unwrap();
    init().expect("init");
    let result = f();
    let _ = destroy();
    result
}

proptest! {
    /// Allocating `n < THRESHOLD` bytes and immediately releasing it must
    /// leave the allocator able to grant the exact same size again at the
    /// exact same address (the buddy path is fully deterministic).
    #[test]
    fn alloc_then_release_then_realloc_same_size_yields_same_pointer(
        n in 1usize..(buddyheap::cfg::THRESHOLD - 1)
    ) {
        with_allocator(|| {
            let p1 = allocate(n).expect("first allocate");
            release(p1).expect("release");
            let p2 = allocate(n).expect("second allocate");
            prop_assert_eq!(p1, p2);
            release(p2).expect("release second");
            Ok(())
        })
    }

    /// A back-to-back run of allocate/release pairs of identical size
    /// always returns the same pointer on every iteration.
    #[test]
    fn repeated_same_size_cycles_are_stable(
        n in 1usize..(buddyheap::cfg::THRESHOLD - 1),
        iterations in 1usize..20
    ) {
        with_allocator(|| {
            let first = allocate(n).expect("allocate");
            release(first).expect("release");
            for _ in 0..iterations {
                let p = allocate(n).expect("allocate");
                prop_assert_eq!(p, first);
                release(p).expect("release");
            }
            Ok(())
        })
    }

    /// Writing a distinctive byte pattern across the full span of any
    /// returned allocation and reading it back yields the same pattern,
    /// for both the buddy and large paths.
    #[test]
    fn write_then_read_back_preserves_bytes(
        n in 1usize..8192usize,
        pattern in any::<u8>()
    ) {
        with_allocator(|| {
            let p = allocate(n).expect("allocate");
            unsafe {
                for i in 0..n {
                    p.as_ptr().add(i).write(pattern);
                }
                for i in 0..n {
                    prop_assert_eq!(p.as_ptr().add(i).read(), pattern);
                }
            }
            release(p).expect("release");
            Ok(())
        })
    }
}
