use std::fmt;

use crate::arena::ArenaNode;
use crate::segment::{Occupancy, SegmentInfo};

/// One arena as seen by the stats pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaStats {
  /// Address of the arena's control block.
  pub base: usize,
  pub control_len: usize,
  /// Segments in insertion order.
  pub segments: Vec<SegmentInfo>,
}

/// Aggregate view of every arena and segment at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
  pub page_size: usize,
  /// Pages backing payloads, holes included.
  pub pages_used: usize,
  /// Bytes held by holes: freed, but neither reused nor unmapped.
  pub hole_bytes: usize,
  pub in_use_bytes: usize,
  pub arenas: Vec<ArenaStats>,
}

impl Stats {
  pub(crate) fn collect<'a>(
    arenas: impl Iterator<Item = &'a ArenaNode>,
    page_size: usize,
  ) -> Self {
    let mut stats = Stats {
      page_size,
      pages_used: 0,
      hole_bytes: 0,
      in_use_bytes: 0,
      arenas: Vec::new(),
    };

    for arena in arenas {
      let mut segments = Vec::with_capacity(arena.len);

      for segment in arena.segments() {
        stats.pages_used += segment.size / page_size;
        match segment.occupancy {
          Occupancy::InUse => stats.in_use_bytes += segment.size,
          Occupancy::Hole => stats.hole_bytes += segment.size,
        }
        segments.push(segment.info());
      }

      stats.arenas.push(ArenaStats {
        base: arena.control.addr(),
        control_len: arena.control.len(),
        segments,
      });
    }

    stats
  }

  /// Length of the arena chain.
  pub fn arena_count(&self) -> usize {
    self.arenas.len()
  }

  /// Length of each arena's segment chain, in arena order.
  pub fn segment_counts(&self) -> Vec<usize> {
    self.arenas.iter().map(|a| a.segments.len()).collect()
  }

  pub fn segment_count(&self) -> usize {
    self.arenas.iter().map(|a| a.segments.len()).sum()
  }
}

impl fmt::Display for Stats {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "-----MeMS SYSTEM STATS-----")?;

    for arena in &self.arenas {
      write!(
        f,
        "MAIN[{}:{}]-> ",
        arena.base,
        arena.base + arena.control_len - 1
      )?;
      for segment in &arena.segments {
        let tag = if segment.is_hole() { "H" } else { "P" };
        write!(f, "{}[{}:{}] <-> ", tag, segment.handle.addr(), segment.end())?;
      }
      writeln!(f, "NULL")?;
    }

    writeln!(f, "Pages used: {}", self.pages_used)?;
    writeln!(f, "Space unused: {}", self.hole_bytes)?;
    writeln!(f, "Main Chain Length: {}", self.arena_count())?;

    let counts: Vec<String> = self
      .segment_counts()
      .iter()
      .map(|c| c.to_string())
      .collect();
    writeln!(f, "Sub-chain Length array[{}]", counts.join(", "))?;

    write!(f, "-------------------------")
  }
}
