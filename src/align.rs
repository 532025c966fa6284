/// Rounds `value` up to the next multiple of `page`, which must be a power of two.
///
/// Evaluates to `None` when the rounded value does not fit in a `usize`.
///
/// # Examples
///
/// ```rust
/// use mems::page_align;
///
/// assert_eq!(page_align!(1000usize, 4096usize), Some(4096));
/// assert_eq!(page_align!(4096usize, 4096usize), Some(4096));
/// assert_eq!(page_align!(4097usize, 4096usize), Some(8192));
/// assert_eq!(page_align!(usize::MAX, 4096usize), None);
/// ```
#[macro_export]
macro_rules! page_align {
  ($value:expr, $page:expr) => {
    ($value as usize)
      .checked_add(($page as usize) - 1)
      .map(|v| v & !(($page as usize) - 1))
  };
}

const FALLBACK_PAGE_SIZE: usize = 4096;

/// Returns the host page size as reported by `sysconf(_SC_PAGESIZE)`.
pub fn host_page_size() -> usize {
  let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

  if size <= 0 {
    log::warn!("sysconf(_SC_PAGESIZE) failed, assuming {FALLBACK_PAGE_SIZE} bytes");
    return FALLBACK_PAGE_SIZE;
  }

  size as usize
}
