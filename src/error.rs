//! Error type for the allocator's public API.
//!
//! The original implementation reported failures through a mix of `NULL`
//! returns, `-1` sentinels and an `errno`-style global. `allocate` keeps the
//! `Option<NonNull<u8>>` sentinel-on-exhaustion convention (out-of-memory is
//! routine, not exceptional), but everything else gets a real `Result`.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A request violated an API precondition (zero-sized allocation,
    /// misaligned or out-of-range pointer passed to `release`, malformed
    /// `Params`).
    #[error("invalid argument")]
    Invalid,

    /// The allocator could not satisfy a request: the buddy engine had no
    /// free block of sufficient size and the large-object fallback's `mmap`
    /// also failed, or a large request's `mmap` failed outright.
    #[error("out of memory")]
    OutOfMemory,

    /// An OS-level memory operation (`mmap`/`munmap`) failed.
    #[error("operating system memory request failed")]
    OsFailure,

    /// An operation that requires an initialized allocator was attempted
    /// before `init`/`init_with`.
    #[error("allocator has not been initialized")]
    NotInitialized,

    /// `init`/`init_with` was called while the allocator was already live.
    #[error("allocator is already initialized")]
    AlreadyInitialized,
}
