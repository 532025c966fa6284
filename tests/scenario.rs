use mems::{Mems, MemsError, Occupancy};

#[test]
fn test_ten_allocations_free_one() {
  let mut mems = Mems::init().unwrap();
  let page = mems.page_size();

  let handles: Vec<_> = (0..10).map(|_| mems.allocate(1000).unwrap()).collect();

  for handle in &handles {
    assert_eq!(mems.segment(*handle).unwrap().size, page);
  }

  let stats = mems.stats().unwrap();
  assert_eq!(stats.pages_used, 10);
  assert_eq!(stats.hole_bytes, 0);
  assert_eq!(stats.in_use_bytes, 10 * page);
  assert_eq!(stats.arena_count(), 1);
  assert_eq!(stats.segment_counts(), vec![10]);

  mems.free(handles[3]).unwrap();

  let stats = mems.stats().unwrap();
  assert_eq!(stats.pages_used, 10);
  assert_eq!(stats.hole_bytes, page);
  assert_eq!(stats.in_use_bytes, 9 * page);
  assert_eq!(stats.arenas[0].segments[3].occupancy, Occupancy::Hole);

  let report = stats.to_string();
  assert!(report.contains("Pages used: 10\n"));
  assert!(report.contains(&format!("Space unused: {page}\n")));
  assert!(report.contains("Main Chain Length: 1\n"));
  assert!(report.contains("Sub-chain Length array[10]\n"));

  for (handle, value) in [(handles[0], 200), (handles[1], 300)] {
    assert_eq!(mems.translate(handle, value).unwrap().value, value);
  }

  let teardown = mems.teardown().unwrap();
  assert_eq!(teardown.arenas, 1);
  assert_eq!(teardown.payloads, 10);
  assert_eq!(teardown.descriptors, 10);
  assert!(matches!(mems.stats(), Err(MemsError::TornDown)));
}

#[test]
fn test_independent_instances() {
  let mut a = Mems::init().unwrap();
  let mut b = Mems::init().unwrap();

  let handle = a.allocate(1).unwrap();
  b.allocate(1).unwrap();
  b.allocate(1).unwrap();

  assert!(matches!(b.free(handle), Err(MemsError::InvalidHandle(_))));
  assert_eq!(a.stats().unwrap().segment_counts(), vec![1]);
  assert_eq!(b.stats().unwrap().segment_counts(), vec![2]);
  assert_eq!(b.stats().unwrap().hole_bytes, 0);
}
