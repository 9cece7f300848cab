//! `plg::basic_string<char>` SSO decoder.
//!
//! The one-byte tag at the end of the object selects the form: its high bit
//! is `is_long`, the low seven bits are the short form's spare size. The long
//! form stores `data`, `size` and a capacity word whose top bit repeats the
//! flag.

use tracing::{debug, warn};

use crate::plg::memory::field_addr;
use crate::plg::{InspectError, PrimitiveKind, Result, Target, TypeShape, Value, ValueObject};

const LONG_FLAG: u8 = 0x80;
const PLACEHOLDER: u8 = b'?';

/// Decoded header of one string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringLayout {
	/// Which physical representation is active.
	pub is_long: bool,
	/// Logical character count.
	pub size: u64,
	/// Current storage capacity.
	pub capacity: u64,
}

/// Fetched characters with non-printable bytes replaced by `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringContent {
	/// Printable ASCII bytes.
	pub bytes: Vec<u8>,
	/// Set when the fetch stopped at the configured byte limit.
	pub truncated: bool,
}

impl StringContent {
	fn from_raw(raw: &[u8], truncated: bool) -> Self {
		let bytes = raw.iter().map(|byte| if (0x20..=0x7E).contains(byte) { *byte } else { PLACEHOLDER }).collect();
		Self { bytes, truncated }
	}

	/// Contents as text.
	pub fn text(&self) -> &str {
		std::str::from_utf8(&self.bytes).unwrap_or_default()
	}

	/// Contents in double quotes, with `...` when truncated.
	pub fn quoted(&self) -> String {
		let ellipsis = if self.truncated { "..." } else { "" };
		format!("\"{}{ellipsis}\"", self.text())
	}
}

/// String provider bound to one value.
pub struct StringDecoder<'a> {
	target: Target<'a>,
	type_name: Box<str>,
	addr: u64,
	layout: StringLayout,
	data_addr: u64,
	content: Option<StringContent>,
	error: Option<String>,
}

impl<'a> StringDecoder<'a> {
	/// Bind a decoder to the string at `addr`.
	pub fn new(target: Target<'a>, type_name: &str, addr: u64) -> Self {
		Self {
			target,
			type_name: type_name.into(),
			addr,
			layout: StringLayout::default(),
			data_addr: 0,
			content: None,
			error: None,
		}
	}

	/// Re-read the header; contents are fetched again on next use.
	pub fn refresh(&mut self) {
		self.content = None;
		self.error = None;
		match self.read_header() {
			Ok((layout, data_addr)) => {
				debug!(addr = %format!("0x{:x}", self.addr), is_long = layout.is_long, size = layout.size, capacity = layout.capacity, "string refreshed");
				self.layout = layout;
				self.data_addr = data_addr;
			}
			Err(err) => self.degrade(err),
		}
	}

	/// Decoded header.
	pub fn layout(&self) -> StringLayout {
		self.layout
	}

	/// Marker of the last failure, if degraded.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Contents, fetched on first use after a refresh.
	pub fn content(&mut self) -> &StringContent {
		if self.content.is_none() {
			match self.read_content() {
				Ok(content) => self.content = Some(content),
				Err(err) => self.report(err),
			}
		}
		self.content.get_or_insert_with(StringContent::default)
	}

	/// `value`, `size`, `capacity`.
	pub fn child_count(&self) -> usize {
		3
	}

	/// Child at `index`.
	pub fn child_at(&mut self, index: usize) -> Option<ValueObject> {
		match index {
			0 => {
				let text = self.content().quoted();
				Some(ValueObject::synthetic("value", "const char*", Value::Text(text.into())))
			}
			1 => Some(ValueObject::synthetic("size", "size_t", Value::U64(self.layout.size))),
			2 => Some(ValueObject::synthetic("capacity", "size_t", Value::U64(self.layout.capacity))),
			_ => None,
		}
	}

	/// Quoted contents plus an error marker when degraded.
	pub fn summary_text(&mut self) -> String {
		let mut out = self.content().quoted();
		if let Some(marker) = &self.error {
			out.push(' ');
			out.push_str(marker);
		}
		out
	}

	fn degrade(&mut self, err: InspectError) {
		self.layout = StringLayout::default();
		self.data_addr = 0;
		self.report(err);
	}

	/// Empty content plus a marker; the header stays as read.
	fn report(&mut self, err: InspectError) {
		warn!(addr = %format!("0x{:x}", self.addr), type_name = %self.type_name, %err, "string decode degraded");
		self.content = Some(StringContent::default());
		self.error = Some(err.marker());
	}

	fn read_header(&self) -> Result<(StringLayout, u64)> {
		let Target { memory, types, abi } = self.target;
		let desc = types.resolve(&self.type_name)?;
		match &desc.shape {
			TypeShape::String { element } if element.shape == TypeShape::Primitive(PrimitiveKind::Char) => {}
			TypeShape::String { element } => {
				return Err(InspectError::LayoutViolation {
					field: "element",
					detail: format!("only char strings are decoded, found {}", element.name),
				});
			}
			_ => {
				return Err(InspectError::LayoutViolation {
					field: "type",
					detail: format!("{} is not a string", desc.name),
				});
			}
		}

		let spec = &abi.string;
		let tag = memory.read_u8(field_addr(self.addr, spec.tag_offset)?)?;

		if tag & LONG_FLAG == 0 {
			let spare = u64::from(tag & !LONG_FLAG);
			let capacity = spec.inline_capacity as u64;
			if spare > capacity {
				return Err(InspectError::LayoutViolation {
					field: "spare_size",
					detail: format!("spare size {spare} exceeds inline capacity {capacity}"),
				});
			}
			let layout = StringLayout {
				is_long: false,
				size: capacity - spare,
				capacity,
			};
			return Ok((layout, field_addr(self.addr, spec.inline_offset)?));
		}

		let size = memory.read_uint(field_addr(self.addr, spec.long_size_offset)?, spec.word_size, abi.endianness)?;
		let cap_word = memory.read_uint(field_addr(self.addr, spec.long_cap_offset)?, spec.word_size, abi.endianness)?;
		let capacity = cap_word & spec.long_cap_mask();
		if size > capacity {
			return Err(InspectError::LayoutViolation {
				field: "size",
				detail: format!("size {size} exceeds capacity {capacity}"),
			});
		}
		let data = memory.read_ptr(field_addr(self.addr, spec.long_data_offset)?, abi)?;

		Ok((StringLayout { is_long: true, size, capacity }, data))
	}

	fn read_content(&self) -> Result<StringContent> {
		let Target { memory, abi, .. } = self.target;

		if !self.layout.is_long {
			let take = usize::try_from(self.layout.size).unwrap_or(0).min(abi.string.inline_capacity);
			let raw = memory.read_vec(self.data_addr, take)?;
			let end = raw.iter().position(|byte| *byte == 0).unwrap_or(raw.len());
			return Ok(StringContent::from_raw(&raw[..end], false));
		}

		if self.data_addr == 0 {
			return Ok(StringContent::default());
		}

		let limit = abi.limits.max_string_bytes;
		let take = usize::try_from(self.layout.size).map_or(limit, |size| size.min(limit));
		let raw = memory.read_vec(self.data_addr, take)?;
		Ok(StringContent::from_raw(&raw, (take as u64) < self.layout.size))
	}
}
