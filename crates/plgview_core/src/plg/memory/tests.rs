use crate::plg::{AbiLayout, Endianness, InspectError, MemoryReader, MemoryRegion, SnapshotMemory};

fn region(base: u64, bytes: &[u8]) -> MemoryRegion {
	MemoryRegion { base, bytes: bytes.to_vec() }
}

#[test]
fn reads_inside_each_region() {
	let memory = SnapshotMemory::from_regions(vec![region(0x2000, &[9, 8, 7, 6]), region(0x1000, &[1, 2, 3, 4])]).expect("regions index");

	assert_eq!(memory.len(), 2);
	assert_eq!(memory.regions()[0].base, 0x1000, "regions are sorted by base");
	assert_eq!(memory.read_vec(0x1001, 2).expect("in-bounds read"), vec![2, 3]);
	assert_eq!(memory.read_u8(0x2003).expect("last byte"), 6);
}

#[test]
fn read_crossing_region_end_fails() {
	let memory = SnapshotMemory::from_regions(vec![region(0x1000, &[1, 2, 3, 4])]).expect("regions index");

	let err = memory.read_vec(0x1002, 4).expect_err("read past end fails");
	assert!(matches!(err, InspectError::MemoryRead { addr: 0x1002, len: 4 }));
}

#[test]
fn unmapped_addresses_fail() {
	let memory = SnapshotMemory::from_regions(vec![region(0x1000, &[1, 2])]).expect("regions index");

	assert!(memory.read_u8(0x0FFF).is_err());
	assert!(memory.read_u8(0x1002).is_err());
	assert!(memory.read_u8(0).is_err());
	assert!(memory.read_u8(u64::MAX).is_err());
}

#[test]
fn overlapping_regions_are_rejected() {
	let err = SnapshotMemory::from_regions(vec![region(0x1000, &[0; 16]), region(0x1008, &[0; 4])]).expect_err("overlap fails");
	assert!(matches!(err, InspectError::RegionOverlap { start: 0x1008, end: 0x1010 }));
}

#[test]
fn adjacent_regions_are_allowed() {
	let memory = SnapshotMemory::from_regions(vec![region(0x1000, &[1; 8]), region(0x1008, &[2; 8])]).expect("adjacent regions index");
	assert_eq!(memory.read_u8(0x1008).expect("second region"), 2);
}

#[test]
fn integer_helpers_respect_width_and_order() {
	let memory = SnapshotMemory::from_regions(vec![region(0x1000, &[0x78, 0x56, 0x34, 0x12, 0, 0, 0, 0])]).expect("regions index");

	assert_eq!(memory.read_uint(0x1000, 2, Endianness::Little).expect("u16"), 0x5678);
	assert_eq!(memory.read_uint(0x1000, 2, Endianness::Big).expect("u16"), 0x7856);
	assert_eq!(memory.read_ptr(0x1000, &AbiLayout::plg_64()).expect("ptr"), 0x1234_5678);
}

#[test]
fn empty_read_always_succeeds() {
	let memory = SnapshotMemory::default();
	memory.read(0xDEAD, &mut []).expect("zero-length read");
	assert!(memory.is_empty());
}
