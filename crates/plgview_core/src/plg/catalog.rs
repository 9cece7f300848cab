//! Discriminant → alternative type name tables.
//!
//! The shared `plg::any` table is a hand-maintained mirror of the alternative
//! order in `plg::any`'s declaration. Use [`DiscriminantCatalog::verify`]
//! against the target's own type metadata to detect drift.

use std::sync::OnceLock;

use crate::plg::{InspectError, Result, canonical_name};

const PLG_ANY_TYPES: [&str; 42] = [
	"plg::invalid",
	"plg::none",
	"bool",
	"char",
	"char16_t",
	"int8_t",
	"int16_t",
	"int32_t",
	"int64_t",
	"uint8_t",
	"uint16_t",
	"uint32_t",
	"uint64_t",
	"void*",
	"float",
	"double",
	"plg::function",
	"plg::string",
	"plg::variant<plg::none>",
	"plg::vector<bool>",
	"plg::vector<char>",
	"plg::vector<char16_t>",
	"plg::vector<int8_t>",
	"plg::vector<int16_t>",
	"plg::vector<int32_t>",
	"plg::vector<int64_t>",
	"plg::vector<uint8_t>",
	"plg::vector<uint16_t>",
	"plg::vector<uint32_t>",
	"plg::vector<uint64_t>",
	"plg::vector<void*>",
	"plg::vector<float>",
	"plg::vector<double>",
	"plg::vector<plg::string>",
	"plg::vector<plg::variant<plg::none>>",
	"plg::vector<plg::vec2>",
	"plg::vector<plg::vec3>",
	"plg::vector<plg::vec4>",
	"plg::vector<plg::mat4x4>",
	"plg::vec2",
	"plg::vec3",
	"plg::vec4",
];

static PLG_ANY_CATALOG: OnceLock<DiscriminantCatalog> = OnceLock::new();

/// Shared catalog for `plg::any`, built on first use and never mutated.
pub fn plg_any_catalog() -> &'static DiscriminantCatalog {
	PLG_ANY_CATALOG.get_or_init(|| DiscriminantCatalog {
		names: PLG_ANY_TYPES.iter().map(|name| Box::from(*name)).collect(),
	})
}

/// Ordered discriminant → type name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminantCatalog {
	names: Vec<Box<str>>,
}

impl DiscriminantCatalog {
	/// Build a catalog from declared alternative names, canonicalizing each.
	pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
		let names = names.into_iter().map(|name| canonical_name(name).map(String::into_boxed_str)).collect::<Result<Vec<_>>>()?;
		Ok(Self { names })
	}

	/// Type name at `index`.
	pub fn type_name_of(&self, index: u64) -> Result<&str> {
		usize::try_from(index)
			.ok()
			.and_then(|idx| self.names.get(idx))
			.map(AsRef::as_ref)
			.ok_or(InspectError::CatalogMiss { index, len: self.names.len() })
	}

	/// Index of `name` after canonicalization.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		let canonical = canonical_name(name).ok()?;
		self.names.iter().position(|item| **item == *canonical)
	}

	/// All names in discriminant order.
	pub fn names(&self) -> &[Box<str>] {
		&self.names
	}

	/// Number of alternatives.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Return whether the catalog has no alternatives.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// CRC-32 over zero-terminated canonical names.
	pub fn fingerprint(&self) -> u32 {
		let mut hasher = crc32fast::Hasher::new();
		for name in &self.names {
			hasher.update(name.as_bytes());
			hasher.update(&[0]);
		}
		hasher.finalize()
	}

	/// Compare with the alternatives of a declared `plg::variant<...>` type name.
	pub fn verify(&self, declared: &DiscriminantCatalog) -> CatalogCheck {
		let mismatches = (0..self.len().max(declared.len()))
			.filter_map(|index| {
				let expected = self.names.get(index).map(|name| name.to_string());
				let actual = declared.names.get(index).map(|name| name.to_string());
				(expected != actual).then_some(CatalogMismatch { index, expected, actual })
			})
			.collect();

		CatalogCheck {
			expected_len: self.len(),
			actual_len: declared.len(),
			expected_fingerprint: self.fingerprint(),
			actual_fingerprint: declared.fingerprint(),
			mismatches,
		}
	}
}

/// Result of validating a catalog against target type metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCheck {
	/// Catalog length.
	pub expected_len: usize,
	/// Declared alternative count.
	pub actual_len: usize,
	/// Catalog fingerprint.
	pub expected_fingerprint: u32,
	/// Declared alternatives fingerprint.
	pub actual_fingerprint: u32,
	/// Per-index disagreements.
	pub mismatches: Vec<CatalogMismatch>,
}

impl CatalogCheck {
	/// Whether the catalog and declaration agree entirely.
	pub fn is_match(&self) -> bool {
		self.expected_len == self.actual_len && self.mismatches.is_empty()
	}
}

/// One index where catalog and declaration disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMismatch {
	/// Discriminant value.
	pub index: usize,
	/// Catalog entry, if any.
	pub expected: Option<String>,
	/// Declared entry, if any.
	pub actual: Option<String>,
}
