use crate::align::host_page_size;
use crate::error::{MemsError, Result};

/// Smallest page size accepted; an arena control block must fit in one page.
pub const MIN_PAGE_SIZE: usize = 512;

/// Tunables for a [`Mems`](crate::Mems) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  page_size: usize,
}

impl Config {
  /// Uses `page_size` as the allocation granularity and arena control block size.
  pub fn with_page_size(page_size: usize) -> Result<Self> {
    if !page_size.is_power_of_two() || page_size < MIN_PAGE_SIZE {
      return Err(MemsError::InvalidPageSize(page_size));
    }

    Ok(Self { page_size })
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      page_size: host_page_size(),
    }
  }
}
