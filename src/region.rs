use std::{io, ptr, ptr::NonNull};

/// One contiguous mapping handed out by a [`BackingProvider`].
///
/// A region is owned: it cannot be cloned, and giving it back to the provider
/// consumes it, so it can be released at most once.
#[derive(Debug)]
pub struct Region {
  base: NonNull<u8>,
  len: usize,
}

impl Region {
  /// # Safety
  ///
  /// `base` must point to `len` readable and writable bytes, aligned to at least
  /// the alignment of a pointer, that stay valid until the region is released.
  pub unsafe fn from_raw_parts(
    base: NonNull<u8>,
    len: usize,
  ) -> Self {
    Self { base, len }
  }

  pub fn base(&self) -> NonNull<u8> {
    self.base
  }

  pub fn addr(&self) -> usize {
    self.base.as_ptr() as usize
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }
}

/// Source of raw page-aligned memory for arenas, descriptors and payloads.
pub trait BackingProvider {
  /// Reserves `len` bytes of zero-initialised, page-aligned memory.
  fn reserve(
    &mut self,
    len: usize,
  ) -> io::Result<Region>;

  /// Returns a region obtained from [`reserve`](BackingProvider::reserve).
  fn release(
    &mut self,
    region: Region,
  );
}

/// Backs every region with its own anonymous private `mmap(2)` mapping.
#[derive(Debug, Default)]
pub struct MmapProvider;

impl MmapProvider {
  pub fn new() -> Self {
    Self
  }
}

impl BackingProvider for MmapProvider {
  fn reserve(
    &mut self,
    len: usize,
  ) -> io::Result<Region> {
    let addr = unsafe {
      libc::mmap(
        ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if addr == libc::MAP_FAILED {
      return Err(io::Error::last_os_error());
    }

    let base = NonNull::new(addr as *mut u8)
      .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "mmap returned a null mapping"))?;

    log::trace!("mmap {len} bytes at {addr:?}");

    Ok(unsafe { Region::from_raw_parts(base, len) })
  }

  fn release(
    &mut self,
    region: Region,
  ) {
    let addr = region.base.as_ptr() as *mut libc::c_void;
    let result = unsafe { libc::munmap(addr, region.len) };

    if result != 0 {
      log::error!(
        "munmap of {} bytes at {:?} failed: {}",
        region.len,
        addr,
        io::Error::last_os_error()
      );
    } else {
      log::trace!("munmap {} bytes at {:?}", region.len, addr);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::host_page_size;

  #[test]
  fn test_mmap_region_is_zeroed_and_writable() {
    let mut provider = MmapProvider::new();
    let region = provider.reserve(10_000).unwrap();

    assert_eq!(region.len(), 10_000);
    assert_eq!(region.addr() % host_page_size(), 0);

    unsafe {
      let bytes = std::slice::from_raw_parts_mut(region.base().as_ptr(), region.len());
      assert!(bytes.iter().all(|b| *b == 0));

      bytes[0] = 0xAB;
      bytes[9_999] = 0xCD;
      assert_eq!(bytes[0], 0xAB);
      assert_eq!(bytes[9_999], 0xCD);
    }

    provider.release(region);
  }

  #[test]
  fn test_mmap_zero_length_fails() {
    let mut provider = MmapProvider::new();

    assert!(provider.reserve(0).is_err());
  }
}
