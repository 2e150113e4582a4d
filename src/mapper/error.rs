use std::fmt;
use std::io;

/// A failed map, unmap or remap call, carrying the OS `errno`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapError {
    errno: i32,
}

impl MapError {
    pub fn from_errno(errno: i32) -> Self {
        Self { errno }
    }

    // io::Error stores raw os errors inline, so this never allocates.
    pub fn last_os_error() -> Self {
        let errno = io::Error::last_os_error().raw_os_error().unwrap_or(0);

        Self { errno }
    }

    pub fn errno(&self) -> i32 {
        self.errno
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "memory mapping failed: {}",
            io::Error::from_raw_os_error(self.errno)
        )
    }
}

impl std::error::Error for MapError {}
