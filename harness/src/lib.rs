//! Latency benchmark for `mapalloc` against the system allocator.
pub mod config;
pub mod distribution;
pub mod histogram;
pub mod report;
pub mod scenario;
pub mod size;
pub mod target;
