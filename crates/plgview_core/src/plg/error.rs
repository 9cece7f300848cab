use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, InspectError>;

/// Errors produced while reading, resolving, and decoding inspected memory.
#[derive(Debug, Error)]
pub enum InspectError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Target memory could not be read.
	#[error("memory read failed at 0x{addr:016x} ({len} bytes)")]
	MemoryRead {
		/// First address of the failed read.
		addr: u64,
		/// Requested byte count.
		len: usize,
	},
	/// A decoded field is outside the range its sibling fields allow.
	#[error("layout violation in {field}: {detail}")]
	LayoutViolation {
		/// Logical field being validated.
		field: &'static str,
		/// Human-readable description of the violation.
		detail: String,
	},
	/// Discriminant has no catalog entry.
	#[error("catalog miss: index {index} outside [0, {len})")]
	CatalogMiss {
		/// Offending discriminant.
		index: u64,
		/// Catalog length.
		len: usize,
	},
	/// Type name could not be resolved to a known shape.
	#[error("unknown type: {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Type name is syntactically malformed.
	#[error("invalid type name: {name}")]
	InvalidTypeName {
		/// Original type name text.
		name: String,
	},
	/// Pointer width is neither 4 nor 8 bytes.
	#[error("unsupported pointer size {size} (expected 4 or 8)")]
	UnsupportedPointerSize {
		/// Requested pointer width in bytes.
		size: usize,
	},
	/// Two snapshot regions cover the same address.
	#[error("snapshot regions overlap at 0x{start:016x}..0x{end:016x}")]
	RegionOverlap {
		/// Start of the later region.
		start: u64,
		/// End of the earlier region.
		end: u64,
	},
	/// Snapshot region payload is not valid hex.
	#[error("invalid hex payload in region 0x{base:016x}")]
	InvalidHex {
		/// Base address of the offending region.
		base: u64,
	},
	/// Address argument was not decimal or `0x` hex.
	#[error("invalid address literal: {value}")]
	InvalidAddressLiteral {
		/// User-provided literal.
		value: String,
	},
	/// Type-name pattern failed to compile.
	#[error("invalid type pattern {pattern:?}: {source}")]
	InvalidPattern {
		/// Original pattern text.
		pattern: String,
		/// Regex compile error.
		#[source]
		source: regex::Error,
	},
	/// Registration command could not be parsed.
	#[error("invalid formatter command {command:?}: {reason}")]
	InvalidCommand {
		/// Original command line.
		command: String,
		/// What was wrong with it.
		reason: &'static str,
	},
	/// Inspection needs exactly one memory source.
	#[error("exactly one of --snapshot or --pid is required")]
	InvalidSource,
	/// Declared variant alternatives disagree with the shared catalog.
	#[error("catalog drift: {mismatches} of {declared} declared alternatives disagree")]
	CatalogDrift {
		/// Number of disagreeing indices.
		mismatches: usize,
		/// Declared alternative count.
		declared: usize,
	},
	/// Unknown leading file magic.
	#[error("unsupported compression or not a snapshot (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Snapshot JSON could not be parsed or written.
	#[error("snapshot: {0}")]
	Snapshot(#[from] serde_json::Error),
}

impl InspectError {
	/// Render this error as the inline marker shown in summary text.
	pub fn marker(&self) -> String {
		format!("<error: {self}>")
	}
}
