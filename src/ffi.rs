//! C linkage for the allocator, enabled with the `c-abi` feature.
//!
//! Building the `cdylib` with this feature produces a library that can stand
//! in for the process allocator:
//!
//! ```text
//! cargo build --release --features c-abi
//! LD_PRELOAD=target/release/libmapalloc.so ./program
//! ```
//!
//! Every failure is reported the C way: a null return with `errno` set.
//! Alignments above the page size are rejected with `EINVAL`.

use crate::allocator::{AllocError, Allocator};
use crate::mapper::Mapper;
use libc::{c_int, c_void};
use std::mem::size_of;
use std::ptr::{self, NonNull};

static ALLOCATOR: Allocator = Allocator::new();

fn set_errno(errno: c_int) {
    unsafe { *libc::__errno_location() = errno }
}

fn errno_for(error: AllocError) -> c_int {
    match error {
        AllocError::Map(error) if error.errno() != 0 => error.errno(),
        AllocError::Map(_) | AllocError::Overflow => libc::ENOMEM,
        AllocError::Alignment => libc::EINVAL,
    }
}

fn into_c(result: Result<NonNull<u8>, AllocError>) -> *mut c_void {
    match result {
        Ok(payload) => payload.as_ptr().cast(),
        Err(error) => {
            set_errno(errno_for(error));

            ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn malloc(size: usize) -> *mut c_void {
    into_c(ALLOCATOR.allocate(size))
}

#[no_mangle]
pub extern "C" fn calloc(count: usize, size: usize) -> *mut c_void {
    into_c(ALLOCATOR.zero_allocate(count, size))
}

/// # Safety
///
/// `ptr` must be null or a live pointer from this allocator.
#[no_mangle]
pub unsafe extern "C" fn realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    match ALLOCATOR.resize(ptr.cast(), size) {
        Ok(Some(payload)) => payload.as_ptr().cast(),
        Ok(None) => ptr::null_mut(),
        Err(error) => {
            set_errno(errno_for(error));

            ptr::null_mut()
        }
    }
}

/// # Safety
///
/// Same as [`realloc`].
#[no_mangle]
pub unsafe extern "C" fn reallocarray(ptr: *mut c_void, count: usize, size: usize) -> *mut c_void {
    match count.checked_mul(size) {
        Some(size) => realloc(ptr, size),
        None => {
            set_errno(libc::ENOMEM);

            ptr::null_mut()
        }
    }
}

/// # Safety
///
/// `ptr` must be null or a live pointer from this allocator, released once.
#[no_mangle]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
    ALLOCATOR.release(ptr.cast())
}

/// # Safety
///
/// `ptr` must be null or a live pointer from this allocator.
#[no_mangle]
pub unsafe extern "C" fn malloc_usable_size(ptr: *mut c_void) -> usize {
    NonNull::new(ptr.cast()).map_or(0, |payload| ALLOCATOR.payload_size(payload))
}

/// # Safety
///
/// `memptr` must be valid for a pointer-sized write.
#[no_mangle]
pub unsafe extern "C" fn posix_memalign(
    memptr: *mut *mut c_void,
    align: usize,
    size: usize,
) -> c_int {
    if !align.is_power_of_two() || align % size_of::<*mut c_void>() != 0 {
        return libc::EINVAL;
    }

    match ALLOCATOR.allocate_aligned(size, align) {
        Ok(payload) => {
            *memptr = payload.as_ptr().cast();

            0
        }
        Err(error) => errno_for(error),
    }
}

#[no_mangle]
pub extern "C" fn aligned_alloc(align: usize, size: usize) -> *mut c_void {
    into_c(ALLOCATOR.allocate_aligned(size, align))
}

#[no_mangle]
pub extern "C" fn memalign(align: usize, size: usize) -> *mut c_void {
    into_c(ALLOCATOR.allocate_aligned(size, align))
}

#[no_mangle]
pub extern "C" fn valloc(size: usize) -> *mut c_void {
    into_c(ALLOCATOR.allocate_aligned(size, page_size()))
}

#[no_mangle]
pub extern "C" fn pvalloc(size: usize) -> *mut c_void {
    let page_size = page_size();
    let rounded = size
        .checked_add(page_size - 1)
        .map(|size| size & !(page_size - 1));

    match rounded {
        Some(size) => into_c(ALLOCATOR.allocate_aligned(size, page_size)),
        None => into_c(Err(AllocError::Overflow)),
    }
}

fn page_size() -> usize {
    ALLOCATOR.mapper().page_size()
}
