use crate::plg::abi::align_up;
use crate::plg::catalog::plg_any_catalog;
use crate::plg::{AbiLayout, InspectError, Result, VariantLayoutSpec};

/// Scalar kinds the host formats natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
	/// One-byte boolean.
	Bool,
	/// One-byte character.
	Char,
	/// UTF-16 code unit.
	Char16,
	/// Signed 8-bit integer.
	I8,
	/// Signed 16-bit integer.
	I16,
	/// Signed 32-bit integer.
	I32,
	/// Signed 64-bit integer.
	I64,
	/// Unsigned 8-bit integer.
	U8,
	/// Unsigned 16-bit integer.
	U16,
	/// Unsigned 32-bit integer.
	U32,
	/// Unsigned 64-bit integer.
	U64,
	/// IEEE-754 single.
	F32,
	/// IEEE-754 double.
	F64,
	/// Data pointer of the target's width.
	Pointer,
}

impl PrimitiveKind {
	/// Size in bytes on `abi`.
	pub fn byte_size(self, abi: &AbiLayout) -> usize {
		match self {
			Self::Bool | Self::Char | Self::I8 | Self::U8 => 1,
			Self::Char16 | Self::I16 | Self::U16 => 2,
			Self::I32 | Self::U32 | Self::F32 => 4,
			Self::I64 | Self::U64 | Self::F64 => 8,
			Self::Pointer => abi.pointer_size,
		}
	}

	/// Whether the kind is a signed integer.
	pub fn is_signed(self) -> bool {
		matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
	}

	fn from_name(name: &str) -> Option<Self> {
		Some(match name {
			"bool" => Self::Bool,
			"char" => Self::Char,
			"char16_t" => Self::Char16,
			"int8_t" => Self::I8,
			"int16_t" => Self::I16,
			"int32_t" => Self::I32,
			"int64_t" => Self::I64,
			"uint8_t" => Self::U8,
			"uint16_t" => Self::U16,
			"uint32_t" => Self::U32,
			"uint64_t" => Self::U64,
			"float" => Self::F32,
			"double" => Self::F64,
			_ => return None,
		})
	}
}

/// Structural description of a resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
	/// Natively formatted scalar.
	Primitive(PrimitiveKind),
	/// Empty tag struct (`plg::invalid`, `plg::none`).
	Unit,
	/// Pointer-sized function handle.
	Function,
	/// Fixed run of `float` lanes (`vec2`..`vec4`, `mat4x4`).
	Floats(usize),
	/// SSO string over `element`.
	String {
		/// Character type.
		element: Box<TypeDesc>,
	},
	/// Contiguous growable sequence.
	Vector {
		/// Element type.
		element: Box<TypeDesc>,
	},
	/// Tagged union over alternatives in declaration order.
	Variant {
		/// Declared alternatives.
		alternatives: Vec<TypeDesc>,
	},
}

/// Named type plus its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
	/// Canonical type name.
	pub name: Box<str>,
	/// Resolved structure.
	pub shape: TypeShape,
}

impl TypeDesc {
	/// Size in bytes on `abi`.
	pub fn byte_size(&self, abi: &AbiLayout) -> usize {
		match &self.shape {
			TypeShape::Primitive(kind) => kind.byte_size(abi),
			TypeShape::Unit => 1,
			TypeShape::Function => abi.pointer_size,
			TypeShape::Floats(lanes) => lanes * 4,
			TypeShape::String { .. } => abi.string.object_size,
			TypeShape::Vector { .. } => abi.sequence.object_size,
			TypeShape::Variant { alternatives } => variant_layout_for(alternatives, abi).object_size,
		}
	}

	/// Alignment in bytes on `abi`.
	pub fn align(&self, abi: &AbiLayout) -> usize {
		match &self.shape {
			TypeShape::Primitive(kind) => kind.byte_size(abi),
			TypeShape::Unit => 1,
			TypeShape::Floats(_) => 4,
			TypeShape::Function | TypeShape::String { .. } | TypeShape::Vector { .. } => abi.pointer_size,
			TypeShape::Variant { alternatives } => variant_layout_for(alternatives, abi).align,
		}
	}

	/// Storage/discriminant layout when this is a variant.
	pub fn variant_layout(&self, abi: &AbiLayout) -> Option<VariantLayoutSpec> {
		match &self.shape {
			TypeShape::Variant { alternatives } => Some(variant_layout_for(alternatives, abi)),
			_ => None,
		}
	}

	/// Short label for the shape kind.
	pub fn kind_label(&self) -> &'static str {
		match &self.shape {
			TypeShape::Primitive(_) => "primitive",
			TypeShape::Unit => "unit",
			TypeShape::Function => "function",
			TypeShape::Floats(_) => "floats",
			TypeShape::String { .. } => "string",
			TypeShape::Vector { .. } => "vector",
			TypeShape::Variant { .. } => "variant",
		}
	}
}

fn variant_layout_for(alternatives: &[TypeDesc], abi: &AbiLayout) -> VariantLayoutSpec {
	let shapes: Vec<_> = alternatives.iter().map(|item| (align_up(item.byte_size(abi), item.align(abi)), item.align(abi))).collect();
	VariantLayoutSpec::for_alternatives(&shapes)
}

/// Host capability that turns a type name into a describable shape.
pub trait TypeResolver {
	/// Resolve `name`, failing with `UnknownType` when it has no known shape.
	fn resolve(&self, name: &str) -> Result<TypeDesc>;
}

/// Resolver for the primitive and `plg` container vocabulary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTypes;

impl TypeResolver for BuiltinTypes {
	fn resolve(&self, name: &str) -> Result<TypeDesc> {
		let expr = parse_type_expr(name)?;
		resolve_expr(&expr, name)
	}
}

/// Canonical spelling of `name` (`std::vector<T>` → `plg::vector<T>`, etc.).
pub fn canonical_name(name: &str) -> Result<String> {
	Ok(parse_type_expr(name)?.canonical())
}

/// Parsed `base<args...>***` type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeExpr {
	base: String,
	args: Vec<TypeExpr>,
	pointer_depth: usize,
}

impl TypeExpr {
	fn canonical(&self) -> String {
		let base = canonical_base(&self.base);
		let mut out = match base.as_str() {
			"plg::basic_string" => match self.args.first().map(TypeExpr::canonical) {
				Some(element) if element == "char" => "plg::string".to_owned(),
				Some(element) => format!("plg::basic_string<{element}>"),
				None => "plg::string".to_owned(),
			},
			// Allocator arguments do not change the layout.
			"plg::vector" => match self.args.first() {
				Some(element) => format!("plg::vector<{}>", element.canonical()),
				None => base,
			},
			_ if self.args.is_empty() => base,
			_ => {
				let args: Vec<_> = self.args.iter().map(TypeExpr::canonical).collect();
				format!("{base}<{}>", args.join(", "))
			}
		};
		out.push_str(&"*".repeat(self.pointer_depth));
		out
	}
}

fn canonical_base(base: &str) -> String {
	let collapsed = base.split_whitespace().collect::<Vec<_>>().join(" ");
	let stripped = collapsed.strip_prefix("::").unwrap_or(&collapsed);
	let mapped = match stripped {
		"std::vector" => "plg::vector",
		"std::int8_t" | "signed char" => "int8_t",
		"std::int16_t" | "short" | "short int" => "int16_t",
		"std::int32_t" | "int" => "int32_t",
		"std::int64_t" | "long long" | "long long int" => "int64_t",
		"std::uint8_t" | "unsigned char" => "uint8_t",
		"std::uint16_t" | "unsigned short" => "uint16_t",
		"std::uint32_t" | "unsigned int" | "unsigned" => "uint32_t",
		"std::uint64_t" | "unsigned long long" => "uint64_t",
		other => other,
	};
	mapped.to_owned()
}

fn parse_type_expr(raw: &str) -> Result<TypeExpr> {
	let invalid = || InspectError::InvalidTypeName { name: raw.to_owned() };
	let mut text = raw.trim();
	if let Some(rest) = text.strip_prefix("const ") {
		text = rest.trim_start();
	}

	let mut pointer_depth = 0;
	loop {
		let trimmed = text.trim_end();
		if let Some(rest) = trimmed.strip_suffix('*') {
			pointer_depth += 1;
			text = rest;
		} else if let Some(rest) = trimmed.strip_suffix(" const") {
			text = rest;
		} else {
			text = trimmed;
			break;
		}
	}

	let (base, args) = match text.find('<') {
		Some(open) => {
			let inner = text[open + 1..].strip_suffix('>').ok_or_else(invalid)?;
			let mut args = Vec::new();
			for part in split_top_level(inner).ok_or_else(invalid)? {
				args.push(parse_type_expr(part).map_err(|_| invalid())?);
			}
			(text[..open].trim(), args)
		}
		None if text.contains('>') => return Err(invalid()),
		None => (text, Vec::new()),
	};

	if base.is_empty() {
		return Err(invalid());
	}

	Ok(TypeExpr {
		base: base.to_owned(),
		args,
		pointer_depth,
	})
}

/// Split at commas that are not nested inside angle brackets.
fn split_top_level(inner: &str) -> Option<Vec<&str>> {
	let mut parts = Vec::new();
	let mut depth = 0_usize;
	let mut start = 0;
	for (idx, ch) in inner.char_indices() {
		match ch {
			'<' => depth += 1,
			'>' => depth = depth.checked_sub(1)?,
			',' if depth == 0 => {
				parts.push(inner[start..idx].trim());
				start = idx + 1;
			}
			_ => {}
		}
	}
	if depth != 0 {
		return None;
	}
	let last = inner[start..].trim();
	if !last.is_empty() || !parts.is_empty() {
		parts.push(last);
	}
	if parts.iter().any(|part| part.is_empty()) {
		return None;
	}
	Some(parts)
}

fn resolve_expr(expr: &TypeExpr, raw: &str) -> Result<TypeDesc> {
	let name = expr.canonical();
	let unknown = || InspectError::UnknownType { name: raw.to_owned() };

	if expr.pointer_depth > 0 {
		return Ok(TypeDesc {
			name: name.into_boxed_str(),
			shape: TypeShape::Primitive(PrimitiveKind::Pointer),
		});
	}

	let base = canonical_base(&expr.base);
	let shape = match base.as_str() {
		"plg::invalid" | "plg::none" => TypeShape::Unit,
		"plg::function" => TypeShape::Function,
		"plg::vec2" => TypeShape::Floats(2),
		"plg::vec3" => TypeShape::Floats(3),
		"plg::vec4" => TypeShape::Floats(4),
		"plg::mat4x4" => TypeShape::Floats(16),
		"plg::string" => TypeShape::String {
			element: Box::new(primitive_desc(PrimitiveKind::Char, "char")),
		},
		"plg::basic_string" => {
			let element = match expr.args.first() {
				Some(arg) => resolve_expr(arg, raw)?,
				None => primitive_desc(PrimitiveKind::Char, "char"),
			};
			TypeShape::String { element: Box::new(element) }
		}
		"plg::vector" => {
			let element = expr.args.first().ok_or_else(unknown)?;
			TypeShape::Vector {
				element: Box::new(resolve_expr(element, raw)?),
			}
		}
		"plg::variant" => {
			if expr.args.is_empty() {
				return Err(unknown());
			}
			let alternatives = expr.args.iter().map(|arg| resolve_expr(arg, raw)).collect::<Result<Vec<_>>>()?;
			TypeShape::Variant { alternatives }
		}
		"plg::any" => {
			let alternatives = plg_any_catalog().names().iter().map(|item| BuiltinTypes.resolve(item)).collect::<Result<Vec<_>>>()?;
			TypeShape::Variant { alternatives }
		}
		other => TypeShape::Primitive(PrimitiveKind::from_name(other).ok_or_else(unknown)?),
	};

	if !expr.args.is_empty() && !matches!(base.as_str(), "plg::basic_string" | "plg::vector" | "plg::variant") {
		return Err(unknown());
	}

	Ok(TypeDesc {
		name: name.into_boxed_str(),
		shape,
	})
}

fn primitive_desc(kind: PrimitiveKind, name: &str) -> TypeDesc {
	TypeDesc {
		name: name.into(),
		shape: TypeShape::Primitive(kind),
	}
}
