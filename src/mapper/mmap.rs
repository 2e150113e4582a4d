use super::error::MapError;
use super::{Mapper, Relocate};
use std::ptr::{self, NonNull};

const FALLBACK_PAGE_SIZE: usize = 4096;

/// The operating system's mapper: `mmap`, `munmap` and `mremap`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Mmap;

unsafe impl Mapper for Mmap {
    fn page_size(&self) -> usize {
        match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
            size if size > 0 => size as usize,
            _ => FALLBACK_PAGE_SIZE,
        }
    }

    fn map(&self, len: usize) -> Result<NonNull<u8>, MapError> {
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(MapError::last_os_error());
        }

        NonNull::new(ptr.cast()).ok_or(MapError::from_errno(libc::ENOMEM))
    }

    unsafe fn unmap(&self, base: NonNull<u8>, len: usize) -> Result<(), MapError> {
        if libc::munmap(base.as_ptr().cast(), len) == 0 {
            Ok(())
        } else {
            Err(MapError::last_os_error())
        }
    }

    #[cfg(target_os = "linux")]
    unsafe fn remap(
        &self,
        base: NonNull<u8>,
        old_len: usize,
        new_len: usize,
        relocate: Relocate,
    ) -> Result<NonNull<u8>, MapError> {
        let flags = match relocate {
            Relocate::Allowed => libc::MREMAP_MAYMOVE,
            Relocate::Denied => 0,
        };
        let ptr = libc::mremap(base.as_ptr().cast(), old_len, new_len, flags);

        if ptr == libc::MAP_FAILED {
            return Err(MapError::last_os_error());
        }

        NonNull::new(ptr.cast()).ok_or(MapError::from_errno(libc::ENOMEM))
    }

    // Without mremap: trim or keep in place when the page count allows it,
    // otherwise map a fresh region, copy, and drop the old one.
    #[cfg(not(target_os = "linux"))]
    unsafe fn remap(
        &self,
        base: NonNull<u8>,
        old_len: usize,
        new_len: usize,
        relocate: Relocate,
    ) -> Result<NonNull<u8>, MapError> {
        let page_size = self.page_size();
        let old_span = round_to_pages(old_len, page_size)?;
        let new_span = round_to_pages(new_len, page_size)?;

        if new_span == old_span {
            return Ok(base);
        }

        if new_span < old_span {
            let tail = NonNull::new_unchecked(base.as_ptr().add(new_span));

            self.unmap(tail, old_span - new_span)?;

            return Ok(base);
        }

        if relocate == Relocate::Denied {
            return Err(MapError::from_errno(libc::ENOMEM));
        }

        let new_base = self.map(new_len)?;

        ptr::copy_nonoverlapping(base.as_ptr(), new_base.as_ptr(), old_len.min(new_len));
        let _ = self.unmap(base, old_len);

        Ok(new_base)
    }
}

#[cfg(not(target_os = "linux"))]
fn round_to_pages(len: usize, page_size: usize) -> Result<usize, MapError> {
    len.checked_add(page_size - 1)
        .map(|len| len & !(page_size - 1))
        .ok_or(MapError::from_errno(libc::ENOMEM))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_power_of_two() {
        assert!(Mmap.page_size().is_power_of_two());
    }

    #[test]
    fn fresh_mapping_is_zeroed_and_aligned() {
        let len = Mmap.page_size() * 3;
        let base = Mmap.map(len).unwrap();

        assert_eq!(base.as_ptr() as usize % Mmap.page_size(), 0);

        let bytes = unsafe { std::slice::from_raw_parts(base.as_ptr(), len) };
        assert!(bytes.iter().all(|b| *b == 0));

        unsafe { Mmap.unmap(base, len).unwrap() };
    }

    #[test]
    fn remap_keeps_contents() {
        let page_size = Mmap.page_size();
        let base = Mmap.map(page_size).unwrap();

        unsafe {
            base.as_ptr().write_bytes(0x5a, page_size);

            let grown = Mmap
                .remap(base, page_size, page_size * 16, Relocate::Allowed)
                .unwrap();
            let bytes = std::slice::from_raw_parts(grown.as_ptr(), page_size);

            assert!(bytes.iter().all(|b| *b == 0x5a));
            Mmap.unmap(grown, page_size * 16).unwrap();
        }
    }

    #[test]
    fn shrink_in_place_keeps_base() {
        let page_size = Mmap.page_size();
        let base = Mmap.map(page_size * 4).unwrap();

        unsafe {
            let shrunk = Mmap
                .remap(base, page_size * 4, page_size, Relocate::Denied)
                .unwrap();

            assert_eq!(shrunk, base);
            Mmap.unmap(shrunk, page_size).unwrap();
        }
    }

    #[test]
    fn oversized_map_fails() {
        let err = Mmap.map(usize::MAX - Mmap.page_size()).unwrap_err();

        assert_ne!(err.errno(), 0);
    }
}
