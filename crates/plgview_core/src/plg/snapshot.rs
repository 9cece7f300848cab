use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::plg::compression::{decode_bytes, encode_bytes};
use crate::plg::{AbiLayout, Compression, Endianness, InspectError, MemoryRegion, Result, SnapshotMemory};

/// Captured target memory plus the ABI it was captured from.
#[derive(Debug)]
pub struct Snapshot {
	/// Compression mode of the source file.
	pub compression: Compression,
	/// Target ABI recorded in the file.
	pub abi: AbiLayout,
	/// Indexed memory regions.
	pub memory: SnapshotMemory,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
	pointer_size: usize,
	#[serde(default)]
	endianness: EndiannessJson,
	regions: Vec<RegionJson>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EndiannessJson {
	#[default]
	Little,
	Big,
}

#[derive(Debug, Serialize, Deserialize)]
struct RegionJson {
	base: String,
	bytes: String,
}

impl Snapshot {
	/// Load a snapshot file, transparently decompressing zstd input.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		let (compression, bytes) = decode_bytes(raw)?;
		let mut snapshot = Self::from_json_slice(&bytes)?;
		snapshot.compression = compression;
		Ok(snapshot)
	}

	/// Parse uncompressed snapshot JSON.
	pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
		let file: SnapshotFile = serde_json::from_slice(bytes)?;
		let endianness = match file.endianness {
			EndiannessJson::Little => Endianness::Little,
			EndiannessJson::Big => Endianness::Big,
		};
		let abi = AbiLayout::for_pointer_size(file.pointer_size)?.with_endianness(endianness);

		let mut regions = Vec::with_capacity(file.regions.len());
		for item in file.regions {
			let base = parse_address(&item.base)?;
			let bytes = decode_hex(&item.bytes).ok_or(InspectError::InvalidHex { base })?;
			regions.push(MemoryRegion { base, bytes });
		}

		Ok(Self {
			compression: Compression::None,
			abi,
			memory: SnapshotMemory::from_regions(regions)?,
		})
	}

	/// Serialize regions to snapshot JSON.
	pub fn to_json_vec(abi: &AbiLayout, regions: &[MemoryRegion]) -> Result<Vec<u8>> {
		let file = SnapshotFile {
			pointer_size: abi.pointer_size,
			endianness: match abi.endianness {
				Endianness::Little => EndiannessJson::Little,
				Endianness::Big => EndiannessJson::Big,
			},
			regions: regions
				.iter()
				.map(|region| RegionJson {
					base: format!("0x{:x}", region.base),
					bytes: hex::encode(&region.bytes),
				})
				.collect(),
		};
		Ok(serde_json::to_vec_pretty(&file)?)
	}

	/// Write regions to `path`, optionally compressed.
	pub fn write(path: impl AsRef<Path>, abi: &AbiLayout, regions: &[MemoryRegion], compression: Compression) -> Result<()> {
		let json = Self::to_json_vec(abi, regions)?;
		let out = encode_bytes(json, compression)?;
		fs::write(path, out)?;
		Ok(())
	}
}

/// Parse decimal or `0x`-prefixed hex address literal.
pub fn parse_address(value: &str) -> Result<u64> {
	let trimmed = value.trim();
	let parsed = if let Some(stripped) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
		u64::from_str_radix(&stripped.replace('_', ""), 16)
	} else {
		trimmed.parse::<u64>()
	};

	parsed.map_err(|_| InspectError::InvalidAddressLiteral { value: value.to_owned() })
}

/// Region payload hex; ASCII whitespace between digits is ignored.
fn decode_hex(text: &str) -> Option<Vec<u8>> {
	let digits: String = text.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
	hex::decode(digits).ok()
}

#[cfg(test)]
mod tests {
	use super::{Snapshot, decode_hex, parse_address};
	use crate::plg::{AbiLayout, Compression, Endianness, InspectError, MemoryReader, MemoryRegion};

	#[test]
	fn parses_regions_and_abi() {
		let json = br#"{
			"pointer_size": 4,
			"endianness": "big",
			"regions": [{ "base": "0x1000", "bytes": "00 01 02 ff" }]
		}"#;
		let snapshot = Snapshot::from_json_slice(json).expect("snapshot parses");

		assert_eq!(snapshot.abi.pointer_size, 4);
		assert_eq!(snapshot.abi.endianness, Endianness::Big);
		assert_eq!(snapshot.memory.read_vec(0x1000, 4).expect("region readable"), vec![0, 1, 2, 0xFF]);
	}

	#[test]
	fn rejects_odd_hex() {
		let json = br#"{ "pointer_size": 8, "regions": [{ "base": "4096", "bytes": "abc" }] }"#;
		let err = Snapshot::from_json_slice(json).expect_err("odd digit count fails");
		assert!(matches!(err, InspectError::InvalidHex { base: 4096 }));
	}

	#[test]
	fn written_file_reopens_with_compression() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("snap.json.zst");
		let regions = vec![MemoryRegion {
			base: 0x2000,
			bytes: vec![0xAA, 0xBB],
		}];

		Snapshot::write(&path, &AbiLayout::plg_64(), &regions, Compression::Zstd).expect("snapshot writes");
		let snapshot = Snapshot::open(&path).expect("snapshot reopens");

		assert_eq!(snapshot.compression, Compression::Zstd);
		assert_eq!(snapshot.memory.regions(), regions.as_slice());
	}

	#[test]
	fn address_literals_accept_hex_and_decimal() {
		assert_eq!(parse_address("0x1000").expect("hex"), 0x1000);
		assert_eq!(parse_address("0X7fff_0000").expect("hex with separator"), 0x7FFF_0000);
		assert_eq!(parse_address("4096").expect("decimal"), 4096);
		assert!(parse_address("0xZZ").is_err());
	}

	#[test]
	fn region_hex_tolerates_whitespace_and_case() {
		assert_eq!(decode_hex("00 7F\n80ff"), Some(vec![0, 0x7F, 0x80, 0xFF]));
		assert_eq!(decode_hex("0g"), None);
		assert_eq!(decode_hex(""), Some(Vec::new()));
	}

	#[test]
	fn written_regions_are_lowercase_hex() {
		let regions = [MemoryRegion {
			base: 0x10,
			bytes: vec![0xAB, 0x01],
		}];
		let json = Snapshot::to_json_vec(&AbiLayout::plg_64(), &regions).expect("snapshot serializes");
		let text = String::from_utf8(json).expect("json is utf-8");
		assert!(text.contains("\"ab01\""), "unexpected json: {text}");
	}
}
