use mapalloc::Allocator;
use std::fmt;
use std::ptr::{self, NonNull};
use std::str::FromStr;

/// An allocator under measurement, driven through the C-style contract:
/// every failure is a null pointer.
pub trait Target {
    fn name(&self) -> &'static str;

    fn allocate(&self, size: usize) -> *mut u8;

    fn zero_allocate(&self, count: usize, element_size: usize) -> *mut u8;

    /// # Safety
    ///
    /// `ptr` must be null or live and owned by the caller.
    unsafe fn resize(&self, ptr: *mut u8, new_size: usize) -> *mut u8;

    /// # Safety
    ///
    /// `ptr` must be null or live and owned by the caller.
    unsafe fn release(&self, ptr: *mut u8);
}

#[derive(Debug, Default)]
pub struct MapTarget {
    allocator: Allocator,
}

impl MapTarget {
    pub const fn new() -> Self {
        Self {
            allocator: Allocator::new(),
        }
    }
}

impl Target for MapTarget {
    fn name(&self) -> &'static str {
        "mapalloc"
    }

    fn allocate(&self, size: usize) -> *mut u8 {
        self.allocator
            .allocate(size)
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    fn zero_allocate(&self, count: usize, element_size: usize) -> *mut u8 {
        self.allocator
            .zero_allocate(count, element_size)
            .map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    unsafe fn resize(&self, ptr: *mut u8, new_size: usize) -> *mut u8 {
        match self.allocator.resize(ptr, new_size) {
            Ok(Some(payload)) => payload.as_ptr(),
            _ => ptr::null_mut(),
        }
    }

    unsafe fn release(&self, ptr: *mut u8) {
        self.allocator.release(ptr)
    }
}

/// The C library's own allocator, for comparison.
#[derive(Debug, Default)]
pub struct SystemTarget;

impl Target for SystemTarget {
    fn name(&self) -> &'static str {
        "system"
    }

    fn allocate(&self, size: usize) -> *mut u8 {
        unsafe { libc::malloc(size).cast() }
    }

    fn zero_allocate(&self, count: usize, element_size: usize) -> *mut u8 {
        unsafe { libc::calloc(count, element_size).cast() }
    }

    unsafe fn resize(&self, ptr: *mut u8, new_size: usize) -> *mut u8 {
        libc::realloc(ptr.cast(), new_size).cast()
    }

    unsafe fn release(&self, ptr: *mut u8) {
        libc::free(ptr.cast())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Mapalloc,
    System,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Mapalloc => f.write_str("mapalloc"),
            TargetKind::System => f.write_str("system"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTargetError(String);

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown target `{}`, expected mapalloc or system", self.0)
    }
}

impl std::error::Error for ParseTargetError {}

impl FromStr for TargetKind {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mapalloc" => Ok(TargetKind::Mapalloc),
            "system" => Ok(TargetKind::System),
            _ => Err(ParseTargetError(s.to_owned())),
        }
    }
}
