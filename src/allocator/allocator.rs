use super::error::AllocError;
use super::header::{Header, HEADER_SIZE};
use crate::mapper::{Mapper, Mmap, Relocate};
use std::ptr::NonNull;

/// Maps every block straight from a [`Mapper`], one mapping per block.
///
/// The allocator holds nothing but its mapper. Each block carries its own
/// size in a header word right before the payload, so no two blocks share
/// any state and every operation is a single map, unmap or remap call.
#[derive(Debug, Default, Clone)]
pub struct Allocator<M: Mapper = Mmap> {
    mapper: M,
}

impl Allocator<Mmap> {
    pub const fn new() -> Self {
        Self { mapper: Mmap }
    }
}

impl<M: Mapper> Allocator<M> {
    pub const fn with_mapper(mapper: M) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Map a new block with room for `size` payload bytes.
    ///
    /// The payload is word aligned and reads as zero. `size` may be zero.
    pub fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        self.map_block(size, HEADER_SIZE)
    }

    /// Like [`Allocator::allocate`], with the payload aligned to `align`.
    ///
    /// Alignments up to the page size are supported; the header still sits in
    /// the word right before the payload, so `release` and `resize` need no
    /// extra information.
    pub fn allocate_aligned(&self, size: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        if !align.is_power_of_two() || align > self.mapper.page_size() {
            return Err(AllocError::Alignment);
        }

        self.map_block(size, align.max(HEADER_SIZE))
    }

    /// Allocate `count * element_size` zeroed bytes.
    ///
    /// The product is checked before anything is mapped. Fresh mappings are
    /// already zero filled so nothing is written.
    pub fn zero_allocate(
        &self,
        count: usize,
        element_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let size = count
            .checked_mul(element_size)
            .ok_or(AllocError::Overflow)?;

        self.allocate(size)
    }

    /// Unmap the block owning `ptr`. Null is ignored and the unmap status is
    /// discarded.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live payload returned by this allocator.
    /// Releasing twice, or releasing a foreign pointer, is undefined behaviour
    /// and is not detected.
    pub unsafe fn release(&self, ptr: *mut u8) {
        let Some(payload) = NonNull::new(ptr) else {
            return;
        };
        let (base, offset) = self.locate(payload);
        let len = offset + Header::read(payload);

        let _ = self.mapper.unmap(base, len);
    }

    /// Resize the block owning `ptr` to `new_size` payload bytes.
    ///
    /// A null `ptr` allocates. A `new_size` of zero releases the block and
    /// returns `Ok(None)`. Otherwise the mapping is resized, possibly moving,
    /// and the first `min(old, new)` payload bytes are preserved. When the
    /// mapper fails the original block is left untouched and still owned by
    /// the caller.
    ///
    /// # Safety
    ///
    /// Same contract as [`Allocator::release`]. On success `ptr` must not be
    /// used again.
    pub unsafe fn resize(
        &self,
        ptr: *mut u8,
        new_size: usize,
    ) -> Result<Option<NonNull<u8>>, AllocError> {
        let Some(payload) = NonNull::new(ptr) else {
            return self.allocate(new_size).map(Some);
        };

        if new_size == 0 {
            self.release(ptr);

            return Ok(None);
        }

        let (base, offset) = self.locate(payload);
        let old_len = offset + Header::read(payload);
        let new_len = offset
            .checked_add(new_size)
            .ok_or(AllocError::Overflow)?;
        let base = self
            .mapper
            .remap(base, old_len, new_len, Relocate::Allowed)?;
        let payload = NonNull::new_unchecked(base.as_ptr().add(offset));

        Header::write(payload, new_size);

        Ok(Some(payload))
    }

    /// The payload size last requested for a live block.
    ///
    /// # Safety
    ///
    /// `payload` must be a live payload returned by this allocator.
    pub unsafe fn payload_size(&self, payload: NonNull<u8>) -> usize {
        Header::read(payload)
    }

    fn map_block(&self, size: usize, offset: usize) -> Result<NonNull<u8>, AllocError> {
        let len = offset.checked_add(size).ok_or(AllocError::Overflow)?;
        let base = self.mapper.map(len)?;

        unsafe {
            let payload = NonNull::new_unchecked(base.as_ptr().add(offset));

            Header::write(payload, size);

            Ok(payload)
        }
    }

    // The header always lands in the first page of its mapping, so rounding
    // its address down to a page boundary gives the mapping base. For plain
    // blocks that is the header address itself.
    unsafe fn locate(&self, payload: NonNull<u8>) -> (NonNull<u8>, usize) {
        let header = Header::from_payload(payload).cast::<u8>();
        let misalignment = header as usize & (self.mapper.page_size() - 1);
        let base = NonNull::new_unchecked(header.sub(misalignment));

        (base, misalignment + HEADER_SIZE)
    }
}
