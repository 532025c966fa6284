use std::{marker::PhantomData, ptr};

use crate::region::Region;
use crate::segment::SegmentNode;

/// Arena control block. Lives at the start of its page-sized `control` region
/// and owns a doubly linked list of segment descriptors in insertion order.
pub(crate) struct ArenaNode {
  pub control: Region,
  pub head: *mut SegmentNode,
  pub tail: *mut SegmentNode,
  pub len: usize,
  pub prev: *mut ArenaNode,
  pub next: *mut ArenaNode,
}

impl ArenaNode {
  pub fn new(control: Region) -> Self {
    Self {
      control,
      head: ptr::null_mut(),
      tail: ptr::null_mut(),
      len: 0,
      prev: ptr::null_mut(),
      next: ptr::null_mut(),
    }
  }

  /// Links `node` after the current tail.
  ///
  /// # Safety
  ///
  /// `node` must be a valid, unlinked descriptor that outlives its membership
  /// in this list.
  pub unsafe fn push_back(
    &mut self,
    node: *mut SegmentNode,
  ) {
    unsafe {
      (*node).prev = self.tail;
      (*node).next = ptr::null_mut();

      if self.tail.is_null() {
        self.head = node;
      } else {
        (*self.tail).next = node;
      }
      self.tail = node;
    }
    self.len += 1;
  }

  pub fn segments(&self) -> Segments<'_> {
    Segments {
      current: self.head,
      _arena: PhantomData,
    }
  }
}

pub(crate) struct Segments<'a> {
  current: *const SegmentNode,
  _arena: PhantomData<&'a ArenaNode>,
}

impl<'a> Iterator for Segments<'a> {
  type Item = &'a SegmentNode;

  fn next(&mut self) -> Option<Self::Item> {
    if self.current.is_null() {
      return None;
    }

    // Every linked descriptor stays mapped for as long as its arena is borrowed.
    let node = unsafe { &*self.current };
    self.current = node.next;

    Some(node)
  }
}

/// Walks an arena chain from its head.
pub(crate) struct Arenas<'a> {
  current: *const ArenaNode,
  _chain: PhantomData<&'a ArenaNode>,
}

impl Arenas<'_> {
  /// # Safety
  ///
  /// `head` must be null or the first node of a well-linked chain that stays
  /// mapped while the iterator is alive.
  pub unsafe fn new(head: *const ArenaNode) -> Self {
    Self {
      current: head,
      _chain: PhantomData,
    }
  }
}

impl<'a> Iterator for Arenas<'a> {
  type Item = &'a ArenaNode;

  fn next(&mut self) -> Option<Self::Item> {
    if self.current.is_null() {
      return None;
    }

    let node = unsafe { &*self.current };
    self.current = node.next;

    Some(node)
  }
}
