//! Large-object path: requests at or above the dispatcher's threshold go
//! straight to the OS, prefixed with a header recording the total
//! reservation length.
//!
//! Grounded directly on the original `large_alloc`/`large_free`: `mmap` for
//! `requested + size_of::<usize>()`, store the total length at the front of
//! the reservation, and hand the caller a pointer past the header.

use core::mem::size_of;
use core::ptr::NonNull;

use crate::error::Error;
use crate::os;

/// Allocates `size` bytes via the OS, returning a pointer past a hidden
/// header that records the total `mmap`'d length (header included).
pub fn allocate(size: usize) -> Option<NonNull<u8>> {
    if size == 0 {
        return None;
    }
    let total = size.checked_add(size_of::<usize>())?;
    let base = os::reserve(total).ok()?;
    // SAFETY: `base` was just mmap'd with room for a usize header.
    unsafe { base.as_ptr().cast::<usize>().write(total) };
    let user_ptr = unsafe { base.as_ptr().add(size_of::<usize>()) };
    // SAFETY: offsetting by the header size stays within the reservation.
    Some(unsafe { NonNull::new_unchecked(user_ptr) })
}

/// Releases a pointer previously returned by [`allocate`].
///
/// # Safety
/// `ptr` must be a live pointer returned by [`allocate`] and not already
/// released.
pub unsafe fn release(ptr: NonNull<u8>) -> Result<(), Error> {
    let header_ptr = ptr.as_ptr().sub(size_of::<usize>());
    let total = header_ptr.cast::<usize>().read();
    let base = NonNull::new_unchecked(header_ptr);
    os::unreserve(base, total)
}
