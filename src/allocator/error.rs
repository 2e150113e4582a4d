use crate::mapper::MapError;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The mapper could not satisfy a map or remap request.
    Map(MapError),
    /// A size computation overflowed before anything was mapped.
    Overflow,
    /// The requested alignment is not a power of two or exceeds the page size.
    Alignment,
}

impl From<MapError> for AllocError {
    fn from(error: MapError) -> AllocError {
        AllocError::Map(error)
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::Map(error) => write!(f, "{error}"),
            AllocError::Overflow => f.write_str("allocation size overflows usize"),
            AllocError::Alignment => f.write_str("unsupported allocation alignment"),
        }
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocError::Map(error) => Some(error),
            _ => None,
        }
    }
}
