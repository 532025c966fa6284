use std::{collections::HashMap, fmt, mem, ptr};

use log::{debug, warn};

use crate::arena::{ArenaNode, Arenas};
use crate::config::Config;
use crate::error::{MemsError, Result};
use crate::page_align;
use crate::region::{BackingProvider, MmapProvider, Region};
use crate::segment::{Handle, Occupancy, SegmentInfo, SegmentNode};
use crate::stats::Stats;

/// Result of [`Mems::translate`]: a made-up "physical" address for a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
  pub virtual_addr: usize,
  pub physical_addr: usize,
  pub value: i32,
}

impl fmt::Display for Translation {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "Virtual address: {:#x} Physical address: {} value written: {}",
      self.virtual_addr, self.physical_addr, self.value
    )
  }
}

/// Number of regions given back to the provider by [`Mems::teardown`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TeardownReport {
  pub payloads: usize,
  pub descriptors: usize,
  pub arenas: usize,
}

/// The allocator state: a chain of arenas, each owning a chain of segments.
///
/// Every allocation gets its own payload region and its own descriptor region
/// from the provider. Freeing only marks the segment as a [`Occupancy::Hole`];
/// nothing is returned to the provider or reused until [`Mems::teardown`].
///
/// Not thread-safe. The raw chain pointers keep it `!Send` and `!Sync`.
pub struct Mems<P: BackingProvider = MmapProvider> {
  provider: P,
  config: Config,
  first: *mut ArenaNode,
  last: *mut ArenaNode,
  arenas: usize,
  index: HashMap<Handle, *mut SegmentNode>,
  live: bool,
}

impl Mems<MmapProvider> {
  /// Creates an allocator backed by `mmap` with the host page size.
  pub fn init() -> Result<Self> {
    Self::with_provider(MmapProvider::new(), Config::default())
  }
}

impl<P: BackingProvider> Mems<P> {
  /// Creates an allocator with a single empty arena.
  pub fn with_provider(
    provider: P,
    config: Config,
  ) -> Result<Self> {
    let mut mems = Self {
      provider,
      config,
      first: ptr::null_mut(),
      last: ptr::null_mut(),
      arenas: 0,
      index: HashMap::new(),
      live: true,
    };

    mems.add_arena()?;

    Ok(mems)
  }

  /// Appends a new, empty arena to the chain. Later allocations go to it.
  ///
  /// Returns the position of the new arena.
  pub fn add_arena(&mut self) -> Result<usize> {
    self.ensure_live()?;

    let control = self.reserve(self.config.page_size())?;
    let node = control.base().as_ptr() as *mut ArenaNode;

    unsafe {
      node.write(ArenaNode::new(control));
      (*node).prev = self.last;

      if self.last.is_null() {
        self.first = node;
      } else {
        (*self.last).next = node;
      }
    }
    self.last = node;
    self.arenas += 1;

    debug!("arena {} created at {:?}", self.arenas - 1, node);

    Ok(self.arenas - 1)
  }

  /// Reserves `size` bytes, rounded up to whole pages, as a new segment at the
  /// tail of the last arena.
  ///
  /// Holes are never searched: every call maps fresh memory.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<Handle> {
    self.ensure_live()?;

    if size == 0 {
      return Err(MemsError::ZeroSize);
    }

    let rounded = page_align!(size, self.config.page_size()).ok_or(MemsError::SizeOverflow(size))?;

    let payload = self.reserve(rounded)?;
    let descriptor = match self.reserve(mem::size_of::<SegmentNode>()) {
      Ok(descriptor) => descriptor,
      Err(err) => {
        self.provider.release(payload);
        return Err(err);
      }
    };

    let node = descriptor.base().as_ptr() as *mut SegmentNode;
    let arena = self.arenas - 1;

    let handle = unsafe {
      node.write(SegmentNode::new(descriptor, payload, rounded, arena));
      (*self.last).push_back(node);
      (*node).handle()
    };
    self.index.insert(handle, node);

    debug!("allocated {rounded} bytes ({size} requested) at {handle} in arena {arena}");

    Ok(handle)
  }

  /// Marks the segment behind `handle` as a hole.
  ///
  /// The segment keeps its size, its place in the chain and its mapping.
  pub fn free(
    &mut self,
    handle: Handle,
  ) -> Result<()> {
    self.ensure_live()?;

    let Some(&node) = self.index.get(&handle) else {
      warn!("free of unknown handle {handle}");
      return Err(MemsError::InvalidHandle(handle));
    };

    let segment = unsafe { &mut *node };

    if segment.occupancy == Occupancy::Hole {
      warn!("double free of {handle}");
      return Err(MemsError::DoubleFree(handle));
    }

    segment.occupancy = Occupancy::Hole;

    debug!("freed {} bytes at {handle}", segment.size);

    Ok(())
  }

  /// Computes `handle - base + page_size` as an illustrative physical address.
  ///
  /// No payload byte is read or written. Holes are accepted.
  pub fn translate(
    &self,
    handle: Handle,
    value: i32,
  ) -> Result<Translation> {
    let base = self.base()?;

    if !self.index.contains_key(&handle) {
      return Err(MemsError::InvalidHandle(handle));
    }

    let physical_addr = handle
      .addr()
      .wrapping_sub(base)
      .wrapping_add(self.config.page_size());

    Ok(Translation {
      virtual_addr: handle.addr(),
      physical_addr,
      value,
    })
  }

  pub fn segment(
    &self,
    handle: Handle,
  ) -> Result<SegmentInfo> {
    self.ensure_live()?;

    self
      .index
      .get(&handle)
      .map(|&node| unsafe { (*node).info() })
      .ok_or(MemsError::InvalidHandle(handle))
  }

  /// Every segment, in arena order and then insertion order.
  pub fn segments(&self) -> Result<Vec<SegmentInfo>> {
    self.ensure_live()?;

    Ok(
      self
        .chain()
        .flat_map(|arena| arena.segments())
        .map(SegmentNode::info)
        .collect(),
    )
  }

  pub fn stats(&self) -> Result<Stats> {
    self.ensure_live()?;

    Ok(Stats::collect(self.chain(), self.config.page_size()))
  }

  /// Releases every payload, descriptor and arena region, in that order per
  /// arena. Afterwards every operation fails with [`MemsError::TornDown`].
  pub fn teardown(&mut self) -> Result<TeardownReport> {
    self.ensure_live()?;

    let mut report = TeardownReport::default();
    let mut arena = self.first;

    while !arena.is_null() {
      unsafe {
        let mut segment = (*arena).head;

        while !segment.is_null() {
          let SegmentNode {
            descriptor,
            payload,
            next,
            ..
          } = segment.read();

          self.provider.release(payload);
          report.payloads += 1;
          self.provider.release(descriptor);
          report.descriptors += 1;

          segment = next;
        }

        let ArenaNode { control, next, .. } = arena.read();

        self.provider.release(control);
        report.arenas += 1;

        arena = next;
      }
    }

    self.first = ptr::null_mut();
    self.last = ptr::null_mut();
    self.arenas = 0;
    self.index.clear();
    self.live = false;

    debug!(
      "teardown released {} payloads, {} descriptors, {} arenas",
      report.payloads, report.descriptors, report.arenas
    );

    Ok(report)
  }

  /// Address of the first arena's control block.
  pub fn base(&self) -> Result<usize> {
    self.ensure_live()?;

    Ok(unsafe { (*self.first).control.addr() })
  }

  pub fn is_live(&self) -> bool {
    self.live
  }

  pub fn page_size(&self) -> usize {
    self.config.page_size()
  }

  pub fn provider(&self) -> &P {
    &self.provider
  }

  fn chain(&self) -> Arenas<'_> {
    unsafe { Arenas::new(self.first) }
  }

  fn ensure_live(&self) -> Result<()> {
    if self.live {
      Ok(())
    } else {
      Err(MemsError::TornDown)
    }
  }

  fn reserve(
    &mut self,
    len: usize,
  ) -> Result<Region> {
    self
      .provider
      .reserve(len)
      .map_err(|source| MemsError::ResourceExhaustion {
        requested: len,
        source,
      })
  }
}

impl<P: BackingProvider> Drop for Mems<P> {
  fn drop(&mut self) {
    if self.live {
      let _ = self.teardown();
    }
  }
}
