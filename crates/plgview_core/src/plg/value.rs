use std::fmt;

use crate::plg::bytes::{Cursor, sign_extend, uint_from_bytes};
use crate::plg::{AbiLayout, MemoryReader, PrimitiveKind, Result, TypeDesc, TypeShape};

/// Host-native formatted scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Empty tag struct.
	Unit,
	/// Boolean.
	Bool(bool),
	/// Narrow character byte.
	Char(u8),
	/// UTF-16 code unit.
	Char16(u16),
	/// Signed integer widened to 64 bits.
	I64(i64),
	/// Unsigned integer widened to 64 bits.
	U64(u64),
	/// Single-precision float.
	F32(f32),
	/// Double-precision float.
	F64(f64),
	/// Raw address.
	Ptr(u64),
	/// Run of `float` lanes.
	Floats(Vec<f32>),
	/// Already-rendered text.
	Text(Box<str>),
}

impl Value {
	/// Read and format a natively formatted type at `addr`.
	///
	/// Container shapes are not native; they yield `None`.
	pub fn read(memory: &dyn MemoryReader, abi: &AbiLayout, addr: u64, desc: &TypeDesc) -> Result<Option<Self>> {
		let value = match &desc.shape {
			TypeShape::Unit => Self::Unit,
			TypeShape::Function => Self::Ptr(memory.read_ptr(addr, abi)?),
			TypeShape::Primitive(kind) => {
				let raw = memory.read_vec(addr, kind.byte_size(abi))?;
				decode_primitive(*kind, &raw, abi)
			}
			TypeShape::Floats(lanes) => {
				let raw = memory.read_vec(addr, lanes * 4)?;
				let mut cursor = Cursor::new(&raw, addr);
				let mut out = Vec::with_capacity(*lanes);
				for _ in 0..*lanes {
					out.push(cursor.read_f32(abi.endianness)?);
				}
				Self::Floats(out)
			}
			TypeShape::String { .. } | TypeShape::Vector { .. } | TypeShape::Variant { .. } => return Ok(None),
		};
		Ok(Some(value))
	}
}

fn decode_primitive(kind: PrimitiveKind, raw: &[u8], abi: &AbiLayout) -> Value {
	let bits = uint_from_bytes(raw, abi.endianness);
	match kind {
		PrimitiveKind::Bool => Value::Bool(bits != 0),
		PrimitiveKind::Char => Value::Char(bits as u8),
		PrimitiveKind::Char16 => Value::Char16(bits as u16),
		PrimitiveKind::F32 => Value::F32(f32::from_bits(bits as u32)),
		PrimitiveKind::F64 => Value::F64(f64::from_bits(bits)),
		PrimitiveKind::Pointer => Value::Ptr(bits),
		kind if kind.is_signed() => Value::I64(sign_extend(bits, raw.len())),
		_ => Value::U64(bits),
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unit => f.write_str("{}"),
			Self::Bool(v) => write!(f, "{v}"),
			Self::Char(v) if (0x20..0x7F).contains(v) => write!(f, "'{}'", char::from(*v)),
			Self::Char(v) => write!(f, "'\\x{v:02x}'"),
			Self::Char16(v) => match char::from_u32(u32::from(*v)) {
				Some(ch) if !ch.is_control() => write!(f, "u'{ch}'"),
				_ => write!(f, "U+{v:04X}"),
			},
			Self::I64(v) => write!(f, "{v}"),
			Self::U64(v) => write!(f, "{v}"),
			Self::F32(v) => write!(f, "{v}"),
			Self::F64(v) => write!(f, "{v}"),
			Self::Ptr(v) => write!(f, "0x{v:016x}"),
			Self::Floats(items) => {
				f.write_str("(")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str(")")
			}
			Self::Text(v) => f.write_str(v),
		}
	}
}

/// Where a host value's contents come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
	/// Lives in target memory at `addr`.
	Memory {
		/// Target address of the first byte.
		addr: u64,
	},
	/// Computed by a provider; not backed by memory.
	Synthetic(Value),
}

/// Host value handle: one named, typed, inspectable value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueObject {
	/// Display name (`value`, `[3]`, `plg::string`, ...).
	pub name: Box<str>,
	/// Type name as the host reports it.
	pub type_name: Box<str>,
	/// Contents.
	pub source: ValueSource,
}

impl ValueObject {
	/// Memory-backed value.
	pub fn at(name: impl Into<Box<str>>, type_name: impl Into<Box<str>>, addr: u64) -> Self {
		Self {
			name: name.into(),
			type_name: type_name.into(),
			source: ValueSource::Memory { addr },
		}
	}

	/// Provider-computed value.
	pub fn synthetic(name: impl Into<Box<str>>, type_name: impl Into<Box<str>>, value: Value) -> Self {
		Self {
			name: name.into(),
			type_name: type_name.into(),
			source: ValueSource::Synthetic(value),
		}
	}

	/// Target address when memory-backed.
	pub fn addr(&self) -> Option<u64> {
		match self.source {
			ValueSource::Memory { addr } => Some(addr),
			ValueSource::Synthetic(_) => None,
		}
	}
}
