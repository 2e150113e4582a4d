use crate::distribution::{Distribution, MIN_ALLOC_SIZE};
use crate::target::TargetKind;
use std::fmt;

/// The settings for one benchmark run.
#[derive(Copy, Clone, Debug)]
pub struct BenchConfig {
    /// How many calls each scenario makes.
    pub allocations: usize,
    /// The largest size the distribution may produce.
    pub max_alloc_size: usize,
    /// How request sizes are drawn between `MIN_ALLOC_SIZE` and the max.
    pub distribution: Distribution,
    /// Write every byte of each payload after it is allocated or resized.
    /// Off by default so that only the mapping cost is measured.
    pub memset: bool,
    /// Seed for the size generator; a random seed is used when unset.
    pub seed: Option<u64>,
    /// Which allocator is being measured.
    pub target: TargetKind,
}

pub const DEFAULT_ALLOCATIONS: usize = 100_000;
pub const DEFAULT_MAX_ALLOC_SIZE: usize = 4 * 1024 * 1024 * 1024;

impl BenchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allocations == 0 {
            return Err(ConfigError::NoAllocations);
        }

        if self.max_alloc_size < MIN_ALLOC_SIZE {
            return Err(ConfigError::MaxSizeTooSmall(self.max_alloc_size));
        }

        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            allocations: DEFAULT_ALLOCATIONS,
            max_alloc_size: DEFAULT_MAX_ALLOC_SIZE,
            distribution: Distribution::Exponential,
            memset: false,
            seed: None,
            target: TargetKind::Mapalloc,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoAllocations,
    MaxSizeTooSmall(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoAllocations => f.write_str("number of allocations must be positive"),
            ConfigError::MaxSizeTooSmall(size) => write!(
                f,
                "maximum allocation size must be at least {MIN_ALLOC_SIZE} bytes, got {size}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
