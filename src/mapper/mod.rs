//! The seam between the allocator and the operating system's page mapper.

mod error;
mod mmap;

pub use error::MapError;
pub use mmap::Mmap;

use std::ptr::NonNull;

/// Whether a [`Mapper::remap`] may move the region to a new base address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Relocate {
    Allowed,
    Denied,
}

/// A page-granular virtual memory mapper.
///
/// # Safety
///
/// Implementors must hand out regions that are page aligned, readable,
/// writable, zero filled when fresh, and never overlapping any region that
/// is still mapped. `remap` must preserve the first `min(old_len, new_len)`
/// bytes of the region and leave it untouched when it fails.
pub unsafe trait Mapper {
    /// The granularity every mapping is rounded up to.
    fn page_size(&self) -> usize;

    /// Map `len` bytes of fresh anonymous memory.
    fn map(&self, len: usize) -> Result<NonNull<u8>, MapError>;

    /// Unmap a region previously returned by `map` or `remap`.
    ///
    /// # Safety
    ///
    /// `base` and `len` must describe a live region from this mapper. No
    /// reference into the region may be used afterwards.
    unsafe fn unmap(&self, base: NonNull<u8>, len: usize) -> Result<(), MapError>;

    /// Grow or shrink a region, moving it if `relocate` allows and it can't be
    /// resized in place.
    ///
    /// # Safety
    ///
    /// Same as [`Mapper::unmap`]; on success the old base must no longer be
    /// used unless it equals the returned base.
    unsafe fn remap(
        &self,
        base: NonNull<u8>,
        old_len: usize,
        new_len: usize,
        relocate: Relocate,
    ) -> Result<NonNull<u8>, MapError>;
}
