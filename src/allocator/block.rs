use super::allocator::Allocator;
use super::error::AllocError;
use crate::mapper::{Mapper, Mmap};
use std::fmt;
use std::mem::ManuallyDrop;
use std::num::NonZeroUsize;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

/// An owned block of mapped memory, released when dropped.
///
/// A `Block` is the sole owner of its pages, which makes it safe to move
/// between threads and to share by reference without any locking.
pub struct Block<'a, M: Mapper = Mmap> {
    payload: NonNull<u8>,
    allocator: &'a Allocator<M>,
}

unsafe impl<M: Mapper + Sync> Send for Block<'_, M> {}
unsafe impl<M: Mapper + Sync> Sync for Block<'_, M> {}

impl<'a, M: Mapper> Block<'a, M> {
    pub fn new(allocator: &'a Allocator<M>, size: usize) -> Result<Self, AllocError> {
        Ok(Block {
            payload: allocator.allocate(size)?,
            allocator,
        })
    }

    pub fn zeroed(
        allocator: &'a Allocator<M>,
        count: usize,
        element_size: usize,
    ) -> Result<Self, AllocError> {
        Ok(Block {
            payload: allocator.zero_allocate(count, element_size)?,
            allocator,
        })
    }

    /// Take ownership of a payload returned by `allocator`.
    ///
    /// # Safety
    ///
    /// `payload` must be live, owned by the caller, and come from `allocator`.
    pub unsafe fn from_raw(allocator: &'a Allocator<M>, payload: NonNull<u8>) -> Self {
        Block { payload, allocator }
    }

    /// Give up ownership without releasing; the caller must release it.
    pub fn into_raw(self) -> NonNull<u8> {
        ManuallyDrop::new(self).payload
    }

    pub fn len(&self) -> usize {
        unsafe { self.allocator.payload_size(self.payload) }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.payload.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.payload.as_ptr()
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.payload.as_ptr(), self.len()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.payload.as_ptr(), self.len()) }
    }

    /// Grow or shrink the payload. On error the block is left as it was.
    pub fn resize(&mut self, new_size: NonZeroUsize) -> Result<(), AllocError> {
        let resized = unsafe { self.allocator.resize(self.payload.as_ptr(), new_size.get())? };

        if let Some(payload) = resized {
            self.payload = payload;
        }

        Ok(())
    }
}

impl<M: Mapper> Deref for Block<'_, M> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<M: Mapper> DerefMut for Block<'_, M> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl<M: Mapper> fmt::Debug for Block<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("payload", &self.payload)
            .field("len", &self.len())
            .finish()
    }
}

impl<M: Mapper> Drop for Block<'_, M> {
    fn drop(&mut self) {
        unsafe { self.allocator.release(self.payload.as_ptr()) }
    }
}
