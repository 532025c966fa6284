use std::io;

use thiserror::Error;

use crate::Handle;

#[derive(Error, Debug)]
pub enum MemsError {
  /// The backing provider could not reserve a region.
  #[error("failed to reserve {requested} bytes of backing memory")]
  ResourceExhaustion {
    requested: usize,
    #[source]
    source: io::Error,
  },

  #[error("no segment was allocated at {0}")]
  InvalidHandle(Handle),

  #[error("segment at {0} is already a hole")]
  DoubleFree(Handle),

  #[error("allocation size must be greater than zero")]
  ZeroSize,

  #[error("allocation of {0} bytes overflows when rounded to a page")]
  SizeOverflow(usize),

  #[error("allocator has been torn down")]
  TornDown,

  #[error("page size {0} is not a power of two of at least 512 bytes")]
  InvalidPageSize(usize),
}

pub type Result<T> = std::result::Result<T, MemsError>;
