use std::{fmt, ptr};

use crate::region::Region;

/// Whether a segment still backs a live allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupancy {
  InUse,
  /// Logically freed. Holes are retired for good: they are never handed out
  /// again, split or merged, and their memory stays mapped until teardown.
  Hole,
}

/// Opaque token for one allocation: the address of its payload region.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Handle(usize);

impl Handle {
  pub fn from_ptr(ptr: *const u8) -> Self {
    Self(ptr as usize)
  }

  pub fn addr(self) -> usize {
    self.0
  }

  /// Pointer to the first byte of the payload. The payload is zero-initialised
  /// and stays mapped until the allocator is torn down.
  pub fn as_ptr(self) -> *mut u8 {
    self.0 as *mut u8
  }
}

impl fmt::Display for Handle {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "{:#x}", self.0)
  }
}

/// Segment descriptor. Lives at the start of its own `descriptor` region,
/// never inside the payload it describes.
pub(crate) struct SegmentNode {
  pub descriptor: Region,
  pub payload: Region,
  pub size: usize,
  pub occupancy: Occupancy,
  pub arena: usize,
  pub prev: *mut SegmentNode,
  pub next: *mut SegmentNode,
}

impl SegmentNode {
  pub fn new(
    descriptor: Region,
    payload: Region,
    size: usize,
    arena: usize,
  ) -> Self {
    Self {
      descriptor,
      payload,
      size,
      occupancy: Occupancy::InUse,
      arena,
      prev: ptr::null_mut(),
      next: ptr::null_mut(),
    }
  }

  pub fn handle(&self) -> Handle {
    Handle::from_ptr(self.payload.base().as_ptr())
  }

  pub fn info(&self) -> SegmentInfo {
    SegmentInfo {
      handle: self.handle(),
      size: self.size,
      occupancy: self.occupancy,
      arena: self.arena,
    }
  }
}

/// Snapshot of one segment, as returned by inspection and stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
  pub handle: Handle,
  /// Page-aligned byte length of the payload.
  pub size: usize,
  pub occupancy: Occupancy,
  /// Position of the owning arena in the arena chain.
  pub arena: usize,
}

impl SegmentInfo {
  pub fn is_hole(&self) -> bool {
    self.occupancy == Occupancy::Hole
  }

  /// Last payload address covered by this segment.
  pub fn end(&self) -> usize {
    self.handle.addr() + self.size - 1
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_handle_display_and_ptr() {
    let handle = Handle::from_ptr(0x7f00_0000_1000 as *const u8);

    assert_eq!(handle.to_string(), "0x7f0000001000");
    assert_eq!(handle.as_ptr() as usize, 0x7f00_0000_1000);
  }

  #[test]
  fn test_segment_info_end() {
    let info = SegmentInfo {
      handle: Handle::from_ptr(0x1000 as *const u8),
      size: 0x2000,
      occupancy: Occupancy::InUse,
      arena: 0,
    };

    assert_eq!(info.end(), 0x2fff);
    assert!(!info.is_hole());
  }
}
