//! A two-tier general-purpose allocator for a single process.
//!
//! Small requests (below [`cfg::THRESHOLD`]) are served by a buddy engine
//! ([`buddy::BuddyHeap`]) backed by a packed bitmap over a fixed-size
//! managed region; everything else, and anything the buddy engine can't
//! satisfy, goes straight to the OS via [`large`]. [`release`] classifies a
//! pointer by whether it falls inside the managed region and routes it back
//! to whichever path produced it.
//!
//! The process-wide state lives behind a single [`spin::Mutex`], the same
//! pattern the teacher this crate is descended from uses to wrap its own
//! arena allocator (`Tallock`) for safe use from ordinary Rust call sites.
//! The lock exists to make `init`/`destroy`/`allocate`/`release` safe
//! functions, not to give the allocator a concurrent fast path: nothing
//! downstream of the lock is designed for parallel throughput.

pub mod bitmap;
pub mod buddy;
pub mod cfg;
pub mod error;
pub mod large;
pub mod os;
pub mod stack;

use core::ptr::NonNull;

use buddy::BuddyHeap;
pub use cfg::Params;
pub use error::Error;
pub use stack::Stack;

struct State {
    buddy: BuddyHeap,
}

impl State {
    fn allocate(&mut self, size: usize, threshold: usize) -> Option<NonNull<u8>> {
        if size == 0 {
            log::warn!("allocate(0) rejected");
            return None;
        }
        if size < threshold {
            if let Some(p) = self.buddy.allocate(size) {
                log::trace!("buddy allocated {size} bytes at {p:p}");
                return Some(p);
            }
            log::debug!("buddy engine exhausted for {size} bytes, falling back to large path");
        }
        let p = large::allocate(size);
        match p {
            Some(p) => log::trace!("large path allocated {size} bytes at {p:p}"),
            None => log::error!("large path failed to allocate {size} bytes"),
        }
        p
    }

    fn release(&mut self, ptr: NonNull<u8>) -> Result<(), Error> {
        let addr = ptr.as_ptr() as usize;
        let base = self.buddy.base_addr();
        if addr >= base && addr < base + self.buddy.region_len() {
            log::trace!("releasing {ptr:p} via buddy engine");
            self.buddy.release(ptr)
        } else {
            log::trace!("releasing {ptr:p} via large path");
            // SAFETY: any pointer outside the managed region that reaches
            // here was handed out by `large::allocate`, or the caller
            // violated `release`'s contract (caught downstream by the
            // header read, which will simply misbehave on garbage input,
            // same as the original's unchecked `free`-equivalent).
            unsafe { large::release(ptr) }
        }
    }
}

static STATE: spin::Mutex<Option<State>> = spin::Mutex::new(None);
static THRESHOLD: spin::Mutex<usize> = spin::Mutex::new(cfg::THRESHOLD);

/// Initializes the allocator with [`Params::default`] (the compile-time
/// defaults in [`cfg`]).
pub fn init() -> Result<(), Error> {
    init_with(Params::default())
}

/// Initializes the allocator with a custom [`Params`], reserving its
/// managed region from the OS. Returns [`Error::AlreadyInitialized`] if
/// called again before [`destroy`].
pub fn init_with(params: Params) -> Result<(), Error> {
    params.validate()?;
    cfg::check_host_page_size(params.min_block);

    let mut guard = STATE.lock();
    if guard.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    let base = os::reserve(params.region)?;
    let buddy = BuddyHeap::new(base, &params);
    *guard = Some(State { buddy });
    *THRESHOLD.lock() = params.threshold;
    log::debug!(
        "allocator initialized: region={} min_block={} threshold={}",
        params.region, params.min_block, params.threshold
    );
    Ok(())
}

/// Tears down the allocator, returning its managed region to the OS.
/// Outstanding large allocations are unaffected (they are independent OS
/// reservations); outstanding buddy allocations become dangling.
pub fn destroy() -> Result<(), Error> {
    let mut guard = STATE.lock();
    let state = guard.take().ok_or(Error::NotInitialized)?;
    let base = state.buddy.base_addr();
    let region = state.buddy.region_len();
    // SAFETY: `base`/`region` exactly match the reservation made in
    // `init_with`, and `state` (the only thing referencing it) is about to
    // be dropped.
    unsafe { os::unreserve(NonNull::new_unchecked(base as *mut u8), region)? };
    log::debug!("allocator destroyed");
    Ok(())
}

/// Allocates `size` bytes, returning `None` if `size` is zero or the
/// request cannot be satisfied by either path.
pub fn allocate(size: usize) -> Option<NonNull<u8>> {
    let threshold = *THRESHOLD.lock();
    let mut guard = STATE.lock();
    let state = guard.as_mut()?;
    state.allocate(size, threshold)
}

/// Releases a pointer previously returned by [`allocate`].
pub fn release(ptr: NonNull<u8>) -> Result<(), Error> {
    let mut guard = STATE.lock();
    let state = guard.as_mut().ok_or(Error::NotInitialized)?;
    state.release(ptr)
}

/// Raw-pointer entry point for FFI-shaped callers: `0` on success, `-1` on
/// any failure (including a null pointer or an uninitialized allocator),
/// matching spec.md's `release(null) == -1` convention.
///
/// # Safety
/// `ptr`, if non-null, must be a live pointer previously returned by
/// [`allocate`] and not already released.
pub unsafe fn release_raw(ptr: *mut u8) -> i32 {
    match NonNull::new(ptr) {
        None => -1,
        Some(p) => match release(p) {
            Ok(()) => 0,
            Err(_) => -1,
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_init_is_rejected() {
        test_support::with_test_allocator(|| {
            assert_eq!(init(), Err(Error::AlreadyInitialized));
        });
    }

    #[test]
    fn operations_before_init_report_not_initialized() {
        let _guard = test_support::TEST_LOCK.lock();
        assert_eq!(release(NonNull::dangling()), Err(Error::NotInitialized));
        assert_eq!(destroy(), Err(Error::NotInitialized));
        assert!(allocate(16).is_none());
    }

    #[test]
    fn small_request_round_trips_through_buddy_path() {
        test_support::with_test_allocator(|| {
            let p = allocate(64).expect("allocate");
            release(p).expect("release");
        });
    }

    #[test]
    fn large_request_round_trips_through_os_path() {
        test_support::with_test_allocator(|| {
            let p = allocate(cfg::THRESHOLD * 4).expect("allocate");
            release(p).expect("release");
        });
    }

    #[test]
    fn zero_size_allocate_returns_none() {
        test_support::with_test_allocator(|| {
            assert!(allocate(0).is_none());
        });
    }

    #[test]
    fn release_raw_of_null_is_minus_one() {
        test_support::with_test_allocator(|| {
            assert_eq!(unsafe { release_raw(core::ptr::null_mut()) }, -1);
        });
    }

    #[test]
    fn buddy_exhaustion_falls_back_to_large_path() {
        let params = Params { region: 1024, min_block: 64, threshold: 256 };
        test_support::with_test_allocator_params(params, || {
            let mut ptrs = Vec::new();
            for _ in 0..16 {
                ptrs.push(allocate(64).expect("buddy alloc"));
            }
            // Buddy region is now fully committed; a further small request
            // must still succeed via the large path rather than failing.
            let overflow = allocate(64).expect("fallback to large path");
            release(overflow).expect("release overflow");
            for p in ptrs {
                release(p).expect("release buddy block");
            }
        });
    }
}
