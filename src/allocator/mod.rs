mod allocator;
mod block;
mod error;
mod header;


pub use allocator::Allocator;
pub use block::Block;
pub use error::AllocError;
pub use header::HEADER_SIZE;
