use crate::allocator::Allocator;
use crate::mapper::Mapper;
use std::alloc::{GlobalAlloc, Layout};
use std::ptr::{self, NonNull};

/// The allocator over the system mapper, ready for `#[global_allocator]`.
///
/// ```no_run
/// use mapalloc::MapAlloc;
///
/// #[global_allocator]
/// static GLOBAL: MapAlloc = MapAlloc::new();
///
/// fn main() {
///     let v = vec![1u8; 4096];
///     assert_eq!(v.len(), 4096);
/// }
/// ```
pub type MapAlloc = Allocator;

// Any AllocError becomes null, which the caller reports as out of memory.
unsafe impl<M: Mapper + Sync> GlobalAlloc for Allocator<M> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocate_aligned(layout.size(), layout.align())
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    // fresh mappings are already zeroed
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        self.release(ptr)
    }

    unsafe fn realloc(&self, ptr: *mut u8, _layout: Layout, new_size: usize) -> *mut u8 {
        match self.resize(ptr, new_size) {
            Ok(Some(payload)) => payload.as_ptr(),
            _ => ptr::null_mut(),
        }
    }
}
