//! `plg::vector<T>` decoder over its `begin_`/`end_`/`cap_` pointer triple.

use tracing::{debug, warn};

use crate::plg::memory::field_addr;
use crate::plg::{InspectError, Result, Target, TypeDesc, TypeShape, Value, ValueObject};

/// Number of leading `size`/`capacity` children.
const HEADER_CHILDREN: usize = 2;

/// Decoded header of one sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceLayout {
	/// First element address.
	pub begin: u64,
	/// One past the last live element.
	pub end: u64,
	/// One past the allocated storage.
	pub cap: u64,
	/// Element size from the declared type.
	pub element_size: u64,
	/// Live element count.
	pub size: u64,
	/// Allocated element count.
	pub capacity: u64,
}

impl SequenceLayout {
	/// Derive counts from raw pointers. A zero element size, or `end`/`cap`
	/// before `begin`, counts as empty.
	pub fn from_pointers(begin: u64, end: u64, cap: u64, element_size: u64) -> Self {
		let (size, capacity) = match (end.checked_sub(begin), cap.checked_sub(begin)) {
			(Some(used), Some(reserved)) if element_size > 0 => (used / element_size, reserved / element_size),
			_ => (0, 0),
		};
		Self {
			begin,
			end,
			cap,
			element_size,
			size,
			capacity,
		}
	}

	/// Address of element `index`, if inside the live range.
	pub fn element_addr(&self, index: u64) -> Option<u64> {
		if index >= self.size {
			return None;
		}
		index.checked_mul(self.element_size).and_then(|offset| self.begin.checked_add(offset))
	}

	fn check(&self) -> Result<()> {
		if self.end < self.begin {
			return Err(InspectError::LayoutViolation {
				field: "end",
				detail: format!("end 0x{:x} precedes begin 0x{:x}", self.end, self.begin),
			});
		}
		if self.cap < self.end {
			return Err(InspectError::LayoutViolation {
				field: "cap",
				detail: format!("cap 0x{:x} precedes end 0x{:x}", self.cap, self.end),
			});
		}
		if self.element_size > 0 && (self.end - self.begin) % self.element_size != 0 {
			return Err(InspectError::LayoutViolation {
				field: "end",
				detail: format!("span {} is not a multiple of element size {}", self.end - self.begin, self.element_size),
			});
		}
		Ok(())
	}
}

/// Sequence provider bound to one value.
pub struct SequenceDecoder<'a> {
	target: Target<'a>,
	type_name: Box<str>,
	addr: u64,
	element: Option<TypeDesc>,
	layout: SequenceLayout,
	error: Option<String>,
}

impl<'a> SequenceDecoder<'a> {
	/// Bind a decoder to the sequence at `addr`.
	pub fn new(target: Target<'a>, type_name: &str, addr: u64) -> Self {
		Self {
			target,
			type_name: type_name.into(),
			addr,
			element: None,
			layout: SequenceLayout::default(),
			error: None,
		}
	}

	/// Re-read the three pointers.
	pub fn refresh(&mut self) {
		self.error = None;
		match self.read_layout() {
			Ok(layout) => {
				debug!(addr = %format!("0x{:x}", self.addr), size = layout.size, capacity = layout.capacity, "sequence refreshed");
				self.layout = layout;
				if let Err(err) = layout.check() {
					self.report(err);
				}
			}
			Err(err) => {
				self.layout = SequenceLayout::default();
				self.report(err);
			}
		}
	}

	/// Decoded header.
	pub fn layout(&self) -> SequenceLayout {
		self.layout
	}

	/// Resolved element type, once refreshed.
	pub fn element(&self) -> Option<&TypeDesc> {
		self.element.as_ref()
	}

	/// Marker of the last failure or violation.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// `size`, `capacity`, then one child per live element.
	pub fn child_count(&self) -> usize {
		usize::try_from(self.layout.size).unwrap_or(usize::MAX).saturating_add(HEADER_CHILDREN)
	}

	/// Child at `index`.
	pub fn child_at(&mut self, index: usize) -> Option<ValueObject> {
		match index {
			0 => Some(ValueObject::synthetic("size", "size_t", Value::U64(self.layout.size))),
			1 => Some(ValueObject::synthetic("capacity", "size_t", Value::U64(self.layout.capacity))),
			_ => {
				let element = self.element.as_ref()?;
				let slot = (index - HEADER_CHILDREN) as u64;
				let addr = self.layout.element_addr(slot)?;
				Some(ValueObject::at(format!("[{slot}]"), element.name.as_ref(), addr))
			}
		}
	}

	/// `size=N capacity=M`, plus a marker when degraded.
	pub fn summary_text(&mut self) -> String {
		let mut out = format!("size={} capacity={}", self.layout.size, self.layout.capacity);
		if let Some(marker) = &self.error {
			out.push(' ');
			out.push_str(marker);
		}
		out
	}

	fn report(&mut self, err: InspectError) {
		warn!(addr = %format!("0x{:x}", self.addr), type_name = %self.type_name, %err, "sequence decode degraded");
		self.error = Some(err.marker());
	}

	fn read_layout(&mut self) -> Result<SequenceLayout> {
		let Target { memory, types, abi } = self.target;
		self.element = None;
		let desc = types.resolve(&self.type_name)?;
		let TypeShape::Vector { element } = desc.shape else {
			return Err(InspectError::LayoutViolation {
				field: "type",
				detail: format!("{} is not a sequence", desc.name),
			});
		};

		let spec = &abi.sequence;
		let begin = memory.read_ptr(field_addr(self.addr, spec.begin_offset)?, abi)?;
		let end = memory.read_ptr(field_addr(self.addr, spec.end_offset)?, abi)?;
		let cap = memory.read_ptr(field_addr(self.addr, spec.cap_offset)?, abi)?;

		let element_size = element.byte_size(abi) as u64;
		self.element = Some(*element);
		Ok(SequenceLayout::from_pointers(begin, end, cap, element_size))
	}
}
