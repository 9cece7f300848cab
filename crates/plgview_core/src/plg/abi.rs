use crate::plg::{InspectError, Result};

/// Byte order used to decode multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Least-significant byte first.
	Little,
	/// Most-significant byte first.
	Big,
}

impl Endianness {
	/// Render endianness as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Field offsets of the SSO string representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLayoutSpec {
	/// Total object size in bytes.
	pub object_size: usize,
	/// Offset of the one-byte `spare_size:7 | is_long:1` tag.
	pub tag_offset: usize,
	/// Offset of the inline character buffer.
	pub inline_offset: usize,
	/// Fixed short-form capacity (inline buffer length).
	pub inline_capacity: usize,
	/// Offset of the long-form heap pointer.
	pub long_data_offset: usize,
	/// Offset of the long-form size word.
	pub long_size_offset: usize,
	/// Offset of the long-form capacity word.
	pub long_cap_offset: usize,
	/// Width of the size and capacity words.
	pub word_size: usize,
}

impl StringLayoutSpec {
	/// Layout for a target with the given pointer width.
	pub fn for_pointer_size(pointer_size: usize) -> Self {
		let object_size = pointer_size * 3;
		Self {
			object_size,
			tag_offset: object_size - 1,
			inline_offset: 0,
			inline_capacity: object_size - 1,
			long_data_offset: 0,
			long_size_offset: pointer_size,
			long_cap_offset: pointer_size * 2,
			word_size: pointer_size,
		}
	}

	/// Mask selecting the capacity bits of the long-form cap word.
	pub fn long_cap_mask(&self) -> u64 {
		let bits = (self.word_size * 8) as u32;
		if bits >= 64 { u64::MAX >> 1 } else { (1_u64 << (bits - 1)) - 1 }
	}
}

/// Field offsets of the begin/end/cap sequence representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLayoutSpec {
	/// Total object size in bytes.
	pub object_size: usize,
	/// Offset of the `begin_` pointer.
	pub begin_offset: usize,
	/// Offset of the `end_` pointer.
	pub end_offset: usize,
	/// Offset of the `cap_` pointer.
	pub cap_offset: usize,
}

impl SequenceLayoutSpec {
	/// Layout for a target with the given pointer width.
	pub fn for_pointer_size(pointer_size: usize) -> Self {
		Self {
			object_size: pointer_size * 3,
			begin_offset: 0,
			end_offset: pointer_size,
			cap_offset: pointer_size * 2,
		}
	}
}

/// Field offsets of one tagged-union instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantLayoutSpec {
	/// Total object size in bytes.
	pub object_size: usize,
	/// Offset of the raw alternative storage.
	pub storage_offset: usize,
	/// Storage size (largest alternative, aligned).
	pub storage_size: usize,
	/// Offset of the active-alternative index.
	pub discriminant_offset: usize,
	/// Width of the index field (1, 2 or 4).
	pub discriminant_width: usize,
	/// Object alignment.
	pub align: usize,
}

impl VariantLayoutSpec {
	/// Compute the layout from `(size, align)` of each alternative in declaration order.
	pub fn for_alternatives(alternatives: &[(usize, usize)]) -> Self {
		let max_size = alternatives.iter().map(|(size, _)| *size).max().unwrap_or(0);
		let max_align = alternatives.iter().map(|(_, align)| *align).max().unwrap_or(1).max(1);
		let storage_size = align_up(max_size, max_align);

		// One extra slot for the valueless sentinel.
		let slots = alternatives.len() + 1;
		let discriminant_width = if slots <= usize::from(u8::MAX) {
			1
		} else if slots <= usize::from(u16::MAX) {
			2
		} else {
			4
		};

		let discriminant_offset = align_up(storage_size, discriminant_width);
		let align = max_align.max(discriminant_width);
		Self {
			object_size: align_up(discriminant_offset + discriminant_width, align),
			storage_offset: 0,
			storage_size,
			discriminant_offset,
			discriminant_width,
			align,
		}
	}

	/// Discriminant value meaning "no alternative is active".
	pub fn valueless_index(&self) -> u64 {
		match self.discriminant_width {
			1 => u64::from(u8::MAX),
			2 => u64::from(u16::MAX),
			_ => u64::from(u32::MAX),
		}
	}
}

/// Bounds applied to reads whose length comes from target memory.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
	/// Maximum long-form string bytes fetched for display.
	pub max_string_bytes: usize,
}

impl Default for DecodeLimits {
	fn default() -> Self {
		Self {
			max_string_bytes: 1024 * 1024,
		}
	}
}

/// Target ABI description shared by all decoders.
#[derive(Debug, Clone, Copy)]
pub struct AbiLayout {
	/// Pointer width in bytes.
	pub pointer_size: usize,
	/// Integer byte order.
	pub endianness: Endianness,
	/// SSO string field offsets.
	pub string: StringLayoutSpec,
	/// Sequence field offsets.
	pub sequence: SequenceLayoutSpec,
	/// Read bounds.
	pub limits: DecodeLimits,
}

impl Default for AbiLayout {
	fn default() -> Self {
		Self::plg_64()
	}
}

impl AbiLayout {
	/// Little-endian 64-bit layout used by all shipping `plg` builds.
	pub fn plg_64() -> Self {
		Self::build(8, Endianness::Little)
	}

	/// Little-endian layout for a 4- or 8-byte pointer target.
	pub fn for_pointer_size(pointer_size: usize) -> Result<Self> {
		match pointer_size {
			4 | 8 => Ok(Self::build(pointer_size, Endianness::Little)),
			size => Err(InspectError::UnsupportedPointerSize { size }),
		}
	}

	/// Return a copy with a different byte order.
	pub fn with_endianness(mut self, endianness: Endianness) -> Self {
		self.endianness = endianness;
		self
	}

	fn build(pointer_size: usize, endianness: Endianness) -> Self {
		Self {
			pointer_size,
			endianness,
			string: StringLayoutSpec::for_pointer_size(pointer_size),
			sequence: SequenceLayoutSpec::for_pointer_size(pointer_size),
			limits: DecodeLimits::default(),
		}
	}
}

/// Round `value` up to a multiple of `align`.
pub(crate) fn align_up(value: usize, align: usize) -> usize {
	if align <= 1 {
		return value;
	}
	value.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
	use super::{AbiLayout, InspectError, VariantLayoutSpec};

	#[test]
	fn plg_64_string_layout_matches_sso_declaration() {
		let abi = AbiLayout::plg_64();
		assert_eq!(abi.string.object_size, 24);
		assert_eq!(abi.string.tag_offset, 23);
		assert_eq!(abi.string.inline_capacity, 23);
		assert_eq!(abi.string.long_size_offset, 8);
		assert_eq!(abi.string.long_cap_offset, 16);
		assert_eq!(abi.string.long_cap_mask(), 0x7FFF_FFFF_FFFF_FFFF);
	}

	#[test]
	fn thirty_two_bit_layout_shrinks_inline_buffer() {
		let abi = AbiLayout::for_pointer_size(4).expect("4-byte pointers are supported");
		assert_eq!(abi.string.object_size, 12);
		assert_eq!(abi.string.inline_capacity, 11);
		assert_eq!(abi.string.long_cap_mask(), 0x7FFF_FFFF);
		assert_eq!(abi.sequence.cap_offset, 8);
	}

	#[test]
	fn rejects_odd_pointer_size() {
		let err = AbiLayout::for_pointer_size(6).expect_err("6-byte pointers are rejected");
		assert!(matches!(err, InspectError::UnsupportedPointerSize { size: 6 }));
	}

	#[test]
	fn variant_discriminant_follows_aligned_storage() {
		let layout = VariantLayoutSpec::for_alternatives(&[(1, 1), (24, 8), (16, 4)]);
		assert_eq!(layout.storage_size, 24);
		assert_eq!(layout.discriminant_offset, 24);
		assert_eq!(layout.discriminant_width, 1);
		assert_eq!(layout.object_size, 32);
		assert_eq!(layout.valueless_index(), 255);
	}

	#[test]
	fn single_unit_alternative_packs_tightly() {
		let layout = VariantLayoutSpec::for_alternatives(&[(1, 1)]);
		assert_eq!(layout.storage_size, 1);
		assert_eq!(layout.discriminant_offset, 1);
		assert_eq!(layout.object_size, 2);
	}
}
