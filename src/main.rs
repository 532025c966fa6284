use std::mem;

use anyhow::Result;
use log::{LevelFilter, info};
use mems::Mems;

fn main() -> Result<()> {
  pretty_env_logger::formatted_builder()
    .filter_level(LevelFilter::Info)
    .parse_default_env()
    .init();

  let mut mems = Mems::init()?;
  info!("initialised with {} byte pages", mems.page_size());

  println!("------- Allocated virtual addresses [mems_malloc] -------");
  let mut handles = Vec::with_capacity(10);
  for _ in 0..10 {
    let handle = mems.allocate(mem::size_of::<i32>() * 250)?;
    println!("Virtual address: {handle}");
    handles.push(handle);
  }

  println!("--------- Printing Stats [mems_print_stats] --------");
  println!("{}", mems.stats()?);

  println!("------- Freeing up the memory [mems_free] --------");
  mems.free(handles[3])?;

  println!("--------- Printing Stats [mems_print_stats] --------");
  println!("{}", mems.stats()?);

  for (handle, value) in [(handles[0], 200), (handles[1], 300)] {
    println!("\n------Assigning value to virtual address [mems_get] ------");
    println!("{}", mems.translate(handle, value)?);
  }

  println!("------- Unmapping all memory [mems_finish] --------");
  let report = mems.teardown()?;
  info!(
    "released {} payloads, {} descriptors and {} arenas",
    report.payloads, report.descriptors, report.arenas
  );

  Ok(())
}
