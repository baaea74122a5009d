//! Compile-time allocator parameters, plus a runtime `Params` override used by
//! tests (and any embedder) to exercise the allocator at sizes smaller than the
//! 1 MiB default without recompiling.
//!
//! Mirrors the teacher's `krnl_boot_cfg!`-style separation of "the numbers the
//! allocator is built around" from "the state initialised from them", but
//! since this crate runs in userspace rather than atop a parsed boot config
//! string, the override path is a plain constructor instead of a macro.

use crate::error::Error;

/// Host page size assumption. Only used to sanity-check `MIN_BLOCK` against
/// the actual host at `init()`; the managed region itself is obtained via an
/// anonymous `mmap`, so a mismatch here is a portability curiosity rather
/// than a correctness hazard.
pub const PAGE: usize = 4096;
/// Size of the pre-reserved region serviced by the buddy engine.
pub const REGION: usize = 1 << 20;
/// Smallest block the buddy engine will ever hand out.
pub const MIN_BLOCK: usize = PAGE / 16;
/// Number of `MIN_BLOCK`-sized leaves in the managed region.
pub const LEAVES: usize = REGION / MIN_BLOCK;
/// Number of nodes in the complete binary tree over `LEAVES` leaves.
pub const NODES: usize = 2 * LEAVES - 1;
/// Dispatch boundary: requests below this go to the buddy engine first.
pub const THRESHOLD: usize = PAGE / 4;

/// Runtime parameterisation of a `BuddyHeap`/dispatcher instance.
///
/// `Params::default()` reproduces the compile-time constants above. Tests
/// construct smaller instances directly to keep property tests fast and to
/// exercise boundary behaviour (exhausting a tiny region) cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub region: usize,
    pub min_block: usize,
    pub threshold: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self { region: REGION, min_block: MIN_BLOCK, threshold: THRESHOLD }
    }
}

impl Params {
    /// Validates the invariants spec.md §3 places on these parameters.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.region.is_power_of_two() || self.region == 0 {
            return Err(Error::Invalid);
        }
        if !self.min_block.is_power_of_two() || self.min_block == 0 {
            return Err(Error::Invalid);
        }
        if self.min_block < core::mem::size_of::<usize>() {
            return Err(Error::Invalid);
        }
        if self.min_block > self.region {
            return Err(Error::Invalid);
        }
        if self.threshold > self.region {
            return Err(Error::Invalid);
        }
        Ok(())
    }

    #[inline]
    pub fn leaves(&self) -> usize {
        self.region / self.min_block
    }

    #[inline]
    pub fn nodes(&self) -> usize {
        2 * self.leaves() - 1
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.region.trailing_zeros() - self.min_block.trailing_zeros()
    }
}

/// Logs a warning (does not fail) if the host's actual page size doesn't
/// evenly divide `MIN_BLOCK` (see SPEC_FULL.md §3).
pub fn check_host_page_size(min_block: usize) {
    let host_page = page_size::get();
    if host_page == 0 || min_block % host_page != 0 && host_page % min_block != 0 {
        log::warn!(
            "host page size {host_page} does not evenly divide/divide-into MIN_BLOCK {min_block}; \
             the managed region is mmap'd anonymously so this is not a correctness issue, \
             but allocation geometry will not align to host pages"
        );
    } else {
        log::trace!("host page size {host_page} is compatible with MIN_BLOCK {min_block}");
    }
}
