use std::path::PathBuf;

use plgview::plg::{AbiLayout, Compression, MemoryRegion, Result, Snapshot, SnapshotMemory};

use crate::cmd::util::{emit_json, parse_range, ptr_hex};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub pid: u32,
	/// `ADDR:LEN` span to copy; repeatable.
	#[arg(long = "range", required = true)]
	pub ranges: Vec<String>,
	#[arg(long)]
	pub out: PathBuf,
	#[arg(long)]
	pub zstd: bool,
	#[arg(long = "pointer-size", default_value_t = 8)]
	pub pointer_size: usize,
	#[arg(long)]
	pub json: bool,
}

/// Copy address ranges of a live process into a snapshot file.
pub fn run(args: Args) -> Result<()> {
	let Args {
		pid,
		ranges,
		out,
		zstd,
		pointer_size,
		json,
	} = args;

	let ranges = ranges.iter().map(|item| parse_range(item)).collect::<Result<Vec<_>>>()?;
	let abi = AbiLayout::for_pointer_size(pointer_size)?;
	let memory = SnapshotMemory::from_regions(read_regions(pid, &ranges)?)?;
	let regions = memory.regions();
	let compression = if zstd { Compression::Zstd } else { Compression::None };
	Snapshot::write(&out, &abi, regions, compression)?;

	let total: usize = regions.iter().map(|item| item.bytes.len()).sum();
	tracing::info!(pid, regions = regions.len(), bytes = total, out = %out.display(), "snapshot captured");

	if json {
		let payload = CaptureJson {
			pid,
			out: out.display().to_string(),
			compression: compression.as_str(),
			pointer_size,
			regions: regions
				.iter()
				.map(|item| RegionJson {
					base: ptr_hex(item.base),
					len: item.bytes.len(),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("out: {}", out.display());
	println!("compression: {}", compression.as_str());
	println!("regions: {}", regions.len());
	for region in regions {
		println!("  {}: {} bytes", ptr_hex(region.base), region.bytes.len());
	}
	Ok(())
}

#[cfg(target_os = "linux")]
fn read_regions(pid: u32, ranges: &[(u64, usize)]) -> Result<Vec<MemoryRegion>> {
	use plgview::plg::{MemoryReader, ProcessMemory};

	let memory = ProcessMemory::attach(pid)?;
	ranges
		.iter()
		.map(|&(base, len)| {
			let bytes = memory.read_vec(base, len)?;
			Ok(MemoryRegion { base, bytes })
		})
		.collect()
}

#[cfg(not(target_os = "linux"))]
fn read_regions(_pid: u32, _ranges: &[(u64, usize)]) -> Result<Vec<MemoryRegion>> {
	Err(plgview::plg::InspectError::Io(std::io::Error::new(
		std::io::ErrorKind::Unsupported,
		"live process capture is only available on linux",
	)))
}

#[derive(serde::Serialize)]
struct RegionJson {
	base: String,
	len: usize,
}

#[derive(serde::Serialize)]
struct CaptureJson {
	pid: u32,
	out: String,
	compression: &'static str,
	pointer_size: usize,
	regions: Vec<RegionJson>,
}

#[cfg(test)]
mod tests;
