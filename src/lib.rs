//! A naive allocator that asks the kernel for a fresh mapping on every
//! allocation and hands it straight back on every release.
//!
//! There is no free list, no size classes and no caching. Each block is one
//! anonymous mapping holding a single header word (the payload size) followed
//! by the payload. The pointer handed out is always the payload address.
//! ```rust
//! use mapalloc::Allocator;
//!
//! let alloc = Allocator::new();
//! let ptr = alloc.allocate(100).unwrap();
//!
//! unsafe {
//!     ptr.as_ptr().write_bytes(0xdd, 100);
//!
//!     let ptr = alloc.resize(ptr.as_ptr(), 1000).unwrap().unwrap();
//!     assert_eq!(*ptr.as_ptr().add(99), 0xdd);
//!
//!     alloc.release(ptr.as_ptr());
//! }
//! ```
//!
//! Zero allocation never writes anything; fresh mappings already read as
//! zero. Size overflow is caught before the kernel is asked for anything.
//! ```rust
//! use mapalloc::{AllocError, Allocator};
//!
//! let alloc = Allocator::new();
//! assert_eq!(alloc.zero_allocate(usize::MAX / 2, 3), Err(AllocError::Overflow));
//!
//! let ptr = alloc.zero_allocate(10, 4).unwrap();
//! let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), 40) };
//! assert!(bytes.iter().all(|b| *b == 0));
//!
//! unsafe { alloc.release(ptr.as_ptr()) };
//! ```
//!
//! The raw operations follow the contract of the C primitives they mirror:
//! releasing twice or releasing a foreign pointer is undefined behaviour and
//! goes undetected. [`Block`] is an owned handle for callers who would rather
//! have the borrow checker enforce single ownership.
//! ```rust
//! use mapalloc::{Allocator, Block};
//! use std::num::NonZeroUsize;
//!
//! let alloc = Allocator::new();
//! let mut block = Block::new(&alloc, 16).unwrap();
//!
//! block.copy_from_slice(b"sixteen bytes!!!");
//! block.resize(NonZeroUsize::new(4096).unwrap()).unwrap();
//!
//! assert_eq!(&block[..7], b"sixteen");
//! assert_eq!(block.len(), 4096);
//! ```
//!
//! [`MapAlloc`] plugs the allocator in as the Rust global allocator, and the
//! `c-abi` feature exports `malloc` and friends for `LD_PRELOAD` use.
mod allocator;
mod global;
pub mod mapper;

#[cfg(all(feature = "c-abi", target_os = "linux"))]
pub mod ffi;

pub use allocator::{AllocError, Allocator, Block, HEADER_SIZE};
pub use global::MapAlloc;
pub use mapper::{MapError, Mapper, Mmap, Relocate};
