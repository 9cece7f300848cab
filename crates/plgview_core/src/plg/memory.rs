use crate::plg::bytes::uint_from_bytes;
use crate::plg::{AbiLayout, Endianness, InspectError, Result};

/// Read-only access to the inspected process's address space.
///
/// Implementations must fail instead of returning partial data.
pub trait MemoryReader {
	/// Fill `buf` with the bytes at `addr`.
	fn read(&self, addr: u64, buf: &mut [u8]) -> Result<()>;

	/// Read `len` bytes into a fresh buffer.
	fn read_vec(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
		let mut out = vec![0_u8; len];
		self.read(addr, &mut out)?;
		Ok(out)
	}

	/// Read one byte.
	fn read_u8(&self, addr: u64) -> Result<u8> {
		let mut buf = [0_u8; 1];
		self.read(addr, &mut buf)?;
		Ok(buf[0])
	}

	/// Read an unsigned integer of `width` (1..=8) bytes.
	fn read_uint(&self, addr: u64, width: usize, endianness: Endianness) -> Result<u64> {
		let mut buf = [0_u8; 8];
		let width = width.min(8);
		self.read(addr, &mut buf[..width])?;
		Ok(uint_from_bytes(&buf[..width], endianness))
	}

	/// Read a pointer-sized value.
	fn read_ptr(&self, addr: u64, abi: &AbiLayout) -> Result<u64> {
		self.read_uint(addr, abi.pointer_size, abi.endianness)
	}
}

impl<T: MemoryReader + ?Sized> MemoryReader for &T {
	fn read(&self, addr: u64, buf: &mut [u8]) -> Result<()> {
		(**self).read(addr, buf)
	}
}

/// Address of a field `offset` bytes past `base`, failing on wraparound.
pub(crate) fn field_addr(base: u64, offset: usize) -> Result<u64> {
	base.checked_add(offset as u64).ok_or(InspectError::MemoryRead { addr: base, len: offset })
}

/// One captured range of target memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
	/// Target address of `bytes[0]`.
	pub base: u64,
	/// Captured contents.
	pub bytes: Vec<u8>,
}

impl MemoryRegion {
	/// Exclusive end address.
	pub fn end(&self) -> u64 {
		self.base.saturating_add(self.bytes.len() as u64)
	}
}

/// Range index over captured memory regions.
#[derive(Debug, Default)]
pub struct SnapshotMemory {
	starts: Vec<u64>,
	regions: Vec<MemoryRegion>,
}

impl SnapshotMemory {
	/// Build a sorted index, rejecting overlapping regions.
	pub fn from_regions(regions: impl IntoIterator<Item = MemoryRegion>) -> Result<Self> {
		let mut regions: Vec<_> = regions.into_iter().filter(|region| !region.bytes.is_empty()).collect();
		regions.sort_by_key(|region| region.base);

		for pair in regions.windows(2) {
			let end = pair[0].end();
			if pair[1].base < end {
				return Err(InspectError::RegionOverlap { start: pair[1].base, end });
			}
		}

		let starts = regions.iter().map(|region| region.base).collect();
		Ok(Self { starts, regions })
	}

	/// Return all regions in address order.
	pub fn regions(&self) -> &[MemoryRegion] {
		&self.regions
	}

	/// Return number of indexed regions.
	pub fn len(&self) -> usize {
		self.regions.len()
	}

	/// Return whether there are no indexed regions.
	pub fn is_empty(&self) -> bool {
		self.regions.is_empty()
	}

	fn region_for(&self, addr: u64) -> Option<&MemoryRegion> {
		let idx = self.starts.partition_point(|start| *start <= addr);
		if idx == 0 {
			return None;
		}

		let region = &self.regions[idx - 1];
		if addr >= region.end() {
			return None;
		}
		Some(region)
	}
}

impl MemoryReader for SnapshotMemory {
	fn read(&self, addr: u64, buf: &mut [u8]) -> Result<()> {
		let len = buf.len();
		let fail = || InspectError::MemoryRead { addr, len };
		if len == 0 {
			return Ok(());
		}

		let region = self.region_for(addr).ok_or_else(fail)?;
		let start = usize::try_from(addr - region.base).map_err(|_| fail())?;
		let end = start.checked_add(len).ok_or_else(fail)?;
		let src = region.bytes.get(start..end).ok_or_else(fail)?;
		buf.copy_from_slice(src);
		Ok(())
	}
}

#[cfg(test)]
mod tests;
