use std::fmt;
use std::str::FromStr;

use crate::plg::{AbiLayout, InspectError, MemoryReader, SequenceDecoder, StringDecoder, TypeResolver, ValueObject, VariantDecoder};

/// Host capabilities a provider is bound to.
#[derive(Clone, Copy)]
pub struct Target<'a> {
	/// Byte source.
	pub memory: &'a dyn MemoryReader,
	/// Type-name resolver.
	pub types: &'a dyn TypeResolver,
	/// Target ABI.
	pub abi: &'a AbiLayout,
}

impl fmt::Debug for Target<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Target").field("abi", self.abi).finish_non_exhaustive()
	}
}

/// Closed set of synthetic child providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
	/// SSO string decoder.
	String,
	/// Contiguous sequence decoder.
	Sequence,
	/// Tagged-union decoder.
	Variant,
}

impl ProviderKind {
	/// Render provider kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Sequence => "sequence",
			Self::Variant => "variant",
		}
	}
}

impl FromStr for ProviderKind {
	type Err = InspectError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"string" => Ok(Self::String),
			"sequence" | "vector" => Ok(Self::Sequence),
			"variant" => Ok(Self::Variant),
			_ => Err(InspectError::InvalidCommand {
				command: value.to_owned(),
				reason: "unknown provider (expected string, sequence or variant)",
			}),
		}
	}
}

/// One decoder instance bound to one inspected value.
///
/// Call [`SyntheticProvider::refresh`] before the first query; queries never
/// fail, degraded state is reported through [`SyntheticProvider::summary_text`].
pub enum SyntheticProvider<'a> {
	/// String decoder.
	String(StringDecoder<'a>),
	/// Sequence decoder.
	Sequence(SequenceDecoder<'a>),
	/// Variant decoder.
	Variant(VariantDecoder<'a>),
}

impl<'a> SyntheticProvider<'a> {
	/// Build the provider of `kind` for the value of `type_name` at `addr`.
	pub fn new(kind: ProviderKind, target: Target<'a>, type_name: &str, addr: u64) -> Self {
		match kind {
			ProviderKind::String => Self::String(StringDecoder::new(target, type_name, addr)),
			ProviderKind::Sequence => Self::Sequence(SequenceDecoder::new(target, type_name, addr)),
			ProviderKind::Variant => Self::Variant(VariantDecoder::new(target, type_name, addr)),
		}
	}

	/// Provider kind.
	pub fn kind(&self) -> ProviderKind {
		match self {
			Self::String(_) => ProviderKind::String,
			Self::Sequence(_) => ProviderKind::Sequence,
			Self::Variant(_) => ProviderKind::Variant,
		}
	}

	/// Re-read the value from target memory.
	pub fn refresh(&mut self) {
		match self {
			Self::String(decoder) => decoder.refresh(),
			Self::Sequence(decoder) => decoder.refresh(),
			Self::Variant(decoder) => decoder.refresh(),
		}
	}

	/// Number of synthetic children.
	pub fn child_count(&self) -> usize {
		match self {
			Self::String(decoder) => decoder.child_count(),
			Self::Sequence(decoder) => decoder.child_count(),
			Self::Variant(decoder) => decoder.child_count(),
		}
	}

	/// Child at `index`, or `None` past the end.
	pub fn child_at(&mut self, index: usize) -> Option<ValueObject> {
		match self {
			Self::String(decoder) => decoder.child_at(index),
			Self::Sequence(decoder) => decoder.child_at(index),
			Self::Variant(decoder) => decoder.child_at(index),
		}
	}

	/// One-line summary.
	pub fn summary_text(&mut self) -> String {
		match self {
			Self::String(decoder) => decoder.summary_text(),
			Self::Sequence(decoder) => decoder.summary_text(),
			Self::Variant(decoder) => decoder.summary_text(),
		}
	}

	/// Whether the rendered child summary belongs after this summary (`type = child`).
	pub fn joins_child_summary(&self) -> bool {
		match self {
			Self::Variant(decoder) => decoder.active_index().is_some() && decoder.error().is_none(),
			Self::String(_) | Self::Sequence(_) => false,
		}
	}
}
