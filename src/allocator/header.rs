use std::mem::size_of;
use std::ptr::NonNull;

/// The word stored immediately before every payload.
#[repr(C)]
pub struct Header {
    size: usize,
}

pub const HEADER_SIZE: usize = size_of::<Header>();

// Payloads sit HEADER_SIZE past a page boundary, which keeps them word aligned
// only while the header is a power of two.
const _: () = assert!(HEADER_SIZE.is_power_of_two());

impl Header {
    pub fn new(size: usize) -> Self {
        Header { size }
    }

    pub fn get_size(&self) -> usize {
        self.size
    }

    pub fn from_payload(payload: NonNull<u8>) -> *mut Header {
        unsafe { payload.as_ptr().sub(HEADER_SIZE).cast() }
    }

    /// # Safety
    ///
    /// `payload` must be a live payload address handed out by the allocator.
    pub unsafe fn read(payload: NonNull<u8>) -> usize {
        (*Self::from_payload(payload)).get_size()
    }

    /// # Safety
    ///
    /// The `HEADER_SIZE` bytes before `payload` must be mapped and owned by
    /// the caller.
    pub unsafe fn write(payload: NonNull<u8>, size: usize) {
        Self::from_payload(payload).write(Header::new(size))
    }
}
