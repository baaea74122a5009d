//! OS memory gateway: anonymous, page-aligned reservations.
//!
//! Grounded on the teacher's habit of talking to the platform directly
//! rather than through an intermediate allocator (its `Talloc` is handed
//! arenas the kernel has already mapped); here userspace stands in for the
//! kernel and `libc::mmap`/`libc::munmap` stand in for the page tables.

use core::ffi::c_void;
use core::ptr::NonNull;

use crate::error::Error;

/// Reserves `len` bytes of zeroed, anonymous, read-write memory from the OS.
///
/// `len` should already be a multiple of the host page size; `mmap` rounds
/// up regardless, so this is a performance expectation, not a precondition.
pub fn reserve(len: usize) -> Result<NonNull<u8>, Error> {
    if len == 0 {
        return Err(Error::Invalid);
    }
    let ptr = unsafe {
        libc::mmap(
            core::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANON,
            -1,
            0,
        )
    };
    if ptr == libc::MAP_FAILED {
        log::error!("mmap({len}) failed: {}", std::io::Error::last_os_error());
        return Err(Error::OsFailure);
    }
    log::trace!("mmap reserved {len} bytes at {ptr:p}");
    // SAFETY: mmap succeeded and did not return null.
    Ok(unsafe { NonNull::new_unchecked(ptr as *mut u8) })
}

/// Returns a previous `reserve`d region to the OS.
///
/// # Safety
/// `ptr` and `len` must exactly match a prior successful `reserve` call, and
/// no references into the region may outlive this call.
pub unsafe fn unreserve(ptr: NonNull<u8>, len: usize) -> Result<(), Error> {
    let rc = libc::munmap(ptr.as_ptr() as *mut c_void, len);
    if rc != 0 {
        log::error!(
            "munmap({ptr:p}, {len}) failed: {}",
            std::io::Error::last_os_error()
        );
        return Err(Error::OsFailure);
    }
    log::trace!("munmap released {len} bytes at {ptr:p}");
    Ok(())
}
