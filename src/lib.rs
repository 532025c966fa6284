//! # mems - A Virtual Memory Allocator Simulator
//!
//! This crate models how an operating system's memory manager might track
//! page-granularity arenas and the segments carved out of them. Every region
//! is a real anonymous `mmap(2)` mapping, but no paging hardware is involved.
//!
//! ## Overview
//!
//! The allocator keeps a two-level chain:
//!
//! ```text
//!   Main chain (arenas)           Sub-chain (segments, insertion order)
//!
//!   ┌──────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!   │ Arena 0  │──► │ P  4096 B   │◄──►│ H  4096 B   │◄──►│ P  8192 B   │──► NULL
//!   │ (1 page) │    └──────┬──────┘    └──────┬──────┘    └──────┬──────┘
//!   └────┬─────┘           │                  │                  │
//!        │                 ▼                  ▼                  ▼
//!        ▼            ┌─────────┐        ┌─────────┐        ┌─────────┐
//!   ┌──────────┐      │ payload │        │ payload │        │ payload │
//!   │ Arena 1  │      └─────────┘        └─────────┘        └─────────┘
//!   └──────────┘
//!
//!   P = in use, H = hole (freed, kept mapped, never reused)
//! ```
//!
//! Each segment owns two separate mappings: a descriptor region holding its
//! bookkeeping and a payload region handed to the caller. Metadata never lives
//! inside the payload, the way a page table entry is kept apart from the page
//! it maps.
//!
//! ## Crate Structure
//!
//! ```text
//!   mems
//!   ├── align      - page_align! macro, host page size
//!   ├── arena      - Arena control block and its segment list (internal)
//!   ├── config     - Config
//!   ├── error      - MemsError
//!   ├── mems       - Mems: allocate, free, translate, stats, teardown
//!   ├── region     - Region, BackingProvider, MmapProvider
//!   ├── segment    - Segment descriptor, Handle, Occupancy
//!   └── stats      - Stats report
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mems::Mems;
//!
//! fn main() -> mems::Result<()> {
//!     let mut mems = Mems::init()?;
//!
//!     let handle = mems.allocate(1000)?;
//!     assert_eq!(mems.segment(handle)?.size, mems.page_size());
//!
//!     mems.free(handle)?;
//!     println!("{}", mems.stats()?);
//!
//!     mems.teardown()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Mems` is neither `Send` nor `Sync`
//! - **No hole reuse**: freed segments are retired, never split, merged or handed out again
//! - **No physical release before teardown**: freeing is bookkeeping only
//! - **Unix-only**: requires `libc` and `mmap`

pub mod align;
mod arena;
mod config;
mod error;
mod mems;
mod region;
mod segment;
mod stats;

pub use config::{Config, MIN_PAGE_SIZE};
pub use error::{MemsError, Result};
pub use mems::{Mems, TeardownReport, Translation};
pub use region::{BackingProvider, MmapProvider, Region};
pub use segment::{Handle, Occupancy, SegmentInfo};
pub use stats::{ArenaStats, Stats};
