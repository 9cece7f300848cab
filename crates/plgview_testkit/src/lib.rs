//! Shared test helpers for workspace crates.
//!
//! Byte builders produce little-endian 64-bit `plg` object images.

use std::path::{Path, PathBuf};

/// Object size of `plg::string` and `plg::vector<T>` on 64-bit targets.
pub const CONTAINER_SIZE: usize = 24;
/// Object size of `plg::any` on 64-bit targets.
pub const ANY_SIZE: usize = 32;
/// Inline capacity of the short string form.
pub const INLINE_CAPACITY: usize = 23;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Short-form string holding `text` (at most 23 bytes), zero padded.
pub fn short_string(text: &[u8]) -> Vec<u8> {
	assert!(text.len() <= INLINE_CAPACITY, "short string text must fit inline");
	short_string_raw(text, (INLINE_CAPACITY - text.len()) as u8)
}

/// Short-form string with an explicit tag byte and inline prefix.
pub fn short_string_raw(inline: &[u8], tag: u8) -> Vec<u8> {
	let mut out = vec![0_u8; CONTAINER_SIZE];
	let take = inline.len().min(INLINE_CAPACITY);
	out[..take].copy_from_slice(&inline[..take]);
	out[INLINE_CAPACITY] = tag;
	out
}

/// Long-form string header; the top bit of the capacity word is set.
pub fn long_string(data: u64, size: u64, capacity: u64) -> Vec<u8> {
	words(&[data, size, capacity | (1 << 63)])
}

/// Sequence header from its three pointers.
pub fn vector(begin: u64, end: u64, cap: u64) -> Vec<u8> {
	words(&[begin, end, cap])
}

/// `plg::any` image with `storage` copied to offset 0 and `index` at offset 24.
pub fn any_value(storage: &[u8], index: u8) -> Vec<u8> {
	let mut out = vec![0_u8; ANY_SIZE];
	let take = storage.len().min(24);
	out[..take].copy_from_slice(&storage[..take]);
	out[24] = index;
	out
}

/// Concatenate little-endian 64-bit words.
pub fn words(values: &[u64]) -> Vec<u8> {
	values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

/// Set of memory regions that can be rendered as a snapshot file.
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
	regions: Vec<(u64, Vec<u8>)>,
}

impl MemoryImage {
	/// Create an empty image.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a region and return the image.
	pub fn with_region(mut self, base: u64, bytes: impl Into<Vec<u8>>) -> Self {
		self.push(base, bytes);
		self
	}

	/// Add a region.
	pub fn push(&mut self, base: u64, bytes: impl Into<Vec<u8>>) {
		self.regions.push((base, bytes.into()));
	}

	/// Render the snapshot JSON document for a 64-bit little-endian target.
	pub fn to_snapshot_json(&self) -> String {
		let regions: Vec<_> = self
			.regions
			.iter()
			.map(|(base, bytes)| {
				serde_json::json!({
					"base": format!("0x{base:x}"),
					"bytes": hex::encode(bytes),
				})
			})
			.collect();

		serde_json::json!({
			"pointer_size": 8,
			"endianness": "little",
			"regions": regions,
		})
		.to_string()
	}
}
