//! `plg::variant<...>` and `plg::any` decoder.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::plg::memory::field_addr;
use crate::plg::{DiscriminantCatalog, InspectError, Result, Target, TypeShape, Value, ValueObject, plg_any_catalog};

const INVALID_TYPE: &str = "plg::invalid";

/// Decoded discriminant and storage location of one variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantLayout {
	/// Active-alternative index as read from memory.
	pub discriminant: u64,
	/// Address of the raw storage.
	pub storage_addr: u64,
	/// Storage size in bytes.
	pub storage_size: usize,
}

/// What the discriminant selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantState {
	/// Discriminant names a catalog entry.
	Active(u64),
	/// All-ones sentinel.
	Valueless,
	/// Discriminant outside the catalog.
	OutOfRange(u64),
	/// Reading failed; shown as `plg::invalid`.
	Degraded,
}

/// Variant provider bound to one value.
pub struct VariantDecoder<'a> {
	target: Target<'a>,
	type_name: Box<str>,
	addr: u64,
	catalog: Option<Cow<'static, DiscriminantCatalog>>,
	layout: VariantLayout,
	state: VariantState,
	error: Option<String>,
}

impl<'a> VariantDecoder<'a> {
	/// Bind a decoder to the variant at `addr`.
	pub fn new(target: Target<'a>, type_name: &str, addr: u64) -> Self {
		Self {
			target,
			type_name: type_name.into(),
			addr,
			catalog: None,
			layout: VariantLayout::default(),
			state: VariantState::Degraded,
			error: None,
		}
	}

	/// Re-read the discriminant.
	pub fn refresh(&mut self) {
		self.error = None;
		match self.read_layout() {
			Ok((layout, valueless)) => {
				self.layout = layout;
				let len = self.catalog.as_ref().map_or(0, |catalog| catalog.len()) as u64;
				self.state = match layout.discriminant {
					index if index < len => VariantState::Active(index),
					index if index == valueless => VariantState::Valueless,
					index => VariantState::OutOfRange(index),
				};
				debug!(addr = %format!("0x{:x}", self.addr), discriminant = layout.discriminant, state = ?self.state, "variant refreshed");
			}
			Err(err) => {
				warn!(addr = %format!("0x{:x}", self.addr), type_name = %self.type_name, %err, "variant decode degraded");
				self.layout = VariantLayout {
					discriminant: 0,
					storage_addr: self.addr,
					storage_size: 0,
				};
				self.state = VariantState::Degraded;
				self.error = Some(err.marker());
			}
		}
	}

	/// Decoded discriminant and storage.
	pub fn layout(&self) -> VariantLayout {
		self.layout
	}

	/// Selected alternative.
	pub fn state(&self) -> VariantState {
		self.state
	}

	/// Active catalog index, if any.
	pub fn active_index(&self) -> Option<u64> {
		match self.state {
			VariantState::Active(index) => Some(index),
			_ => None,
		}
	}

	/// Catalog used for this instantiation, once resolved.
	pub fn catalog(&self) -> Option<&DiscriminantCatalog> {
		self.catalog.as_deref()
	}

	/// Marker of the last failure, if degraded.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// One child when an alternative is active or decoding degraded, else zero.
	pub fn child_count(&self) -> usize {
		match self.state {
			VariantState::Active(_) | VariantState::Degraded => 1,
			VariantState::Valueless | VariantState::OutOfRange(_) => 0,
		}
	}

	/// The active alternative, reinterpreting the storage bytes.
	pub fn child_at(&mut self, index: usize) -> Option<ValueObject> {
		if index != 0 {
			return None;
		}
		match self.state {
			VariantState::Active(active) => {
				let name = self.catalog.as_ref()?.type_name_of(active).ok()?;
				Some(ValueObject::at(name, name, self.layout.storage_addr))
			}
			VariantState::Degraded => Some(ValueObject::synthetic(INVALID_TYPE, INVALID_TYPE, Value::Unit)),
			VariantState::Valueless | VariantState::OutOfRange(_) => None,
		}
	}

	/// Active type name, or the valueless/out-of-range description.
	pub fn summary_text(&mut self) -> String {
		match self.state {
			VariantState::Active(index) => match self.catalog.as_ref().map(|catalog| catalog.type_name_of(index)) {
				Some(Ok(name)) => name.to_owned(),
				Some(Err(err)) => err.marker(),
				None => INVALID_TYPE.to_owned(),
			},
			VariantState::Valueless => "<valueless>".to_owned(),
			VariantState::OutOfRange(index) => format!("<no active alternative (index {index})>"),
			VariantState::Degraded => match &self.error {
				Some(marker) => format!("{INVALID_TYPE} {marker}"),
				None => INVALID_TYPE.to_owned(),
			},
		}
	}

	fn read_layout(&mut self) -> Result<(VariantLayout, u64)> {
		let Target { memory, types, abi } = self.target;
		let desc = types.resolve(&self.type_name)?;
		let TypeShape::Variant { alternatives } = &desc.shape else {
			return Err(InspectError::LayoutViolation {
				field: "type",
				detail: format!("{} is not a variant", desc.name),
			});
		};
		let spec = desc.variant_layout(abi).ok_or_else(|| InspectError::LayoutViolation {
			field: "type",
			detail: format!("{} has no variant layout", desc.name),
		})?;

		if self.catalog.is_none() {
			self.catalog = Some(catalog_for(alternatives.iter().map(|item| item.name.as_ref()))?);
		}

		let discriminant = memory.read_uint(field_addr(self.addr, spec.discriminant_offset)?, spec.discriminant_width, abi.endianness)?;
		let layout = VariantLayout {
			discriminant,
			storage_addr: field_addr(self.addr, spec.storage_offset)?,
			storage_size: spec.storage_size,
		};
		Ok((layout, spec.valueless_index()))
	}
}

/// Shared catalog when the alternatives match it, otherwise one derived from the names.
pub fn catalog_for<'n>(alternatives: impl IntoIterator<Item = &'n str>) -> Result<Cow<'static, DiscriminantCatalog>> {
	let derived = DiscriminantCatalog::from_names(alternatives)?;
	let shared = plg_any_catalog();
	if derived.names() == shared.names() {
		return Ok(Cow::Borrowed(shared));
	}
	Ok(Cow::Owned(derived))
}
