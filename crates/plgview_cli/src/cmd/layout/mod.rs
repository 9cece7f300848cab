use std::path::PathBuf;

use plgview::plg::{AbiLayout, BuiltinTypes, Result, TypeDesc, TypeResolver, TypeShape};

use crate::cmd::util::{emit_json, load_registry};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long = "type")]
	pub type_name: String,
	#[arg(long = "pointer-size", default_value_t = 8)]
	pub pointer_size: usize,
	#[arg(long)]
	pub formatters: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

/// Print size, alignment, and field offsets of a resolved type.
pub fn run(args: Args) -> Result<()> {
	let Args {
		type_name,
		pointer_size,
		formatters,
		json,
	} = args;

	let abi = AbiLayout::for_pointer_size(pointer_size)?;
	let registry = load_registry(formatters.as_deref())?;
	let desc = BuiltinTypes.resolve(&type_name)?;
	let provider = registry.provider_for(&type_name).map(|kind| kind.as_str());
	let fields = field_rows(&desc, &abi);
	let element = element_name(&desc);
	let alternatives = match &desc.shape {
		TypeShape::Variant { alternatives } => Some(alternatives.len()),
		_ => None,
	};

	if json {
		let payload = LayoutJson {
			type_name: type_name.clone(),
			canonical: desc.name.to_string(),
			kind: desc.kind_label(),
			pointer_size,
			size: desc.byte_size(&abi),
			align: desc.align(&abi),
			provider,
			element,
			alternatives,
			fields: fields
				.into_iter()
				.map(|row| FieldJson {
					name: row.name,
					offset: row.offset,
					size: row.size,
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("type: {type_name}");
	println!("canonical: {}", desc.name);
	println!("kind: {}", desc.kind_label());
	println!("pointer_size: {pointer_size}");
	println!("size: {}", desc.byte_size(&abi));
	println!("align: {}", desc.align(&abi));
	println!("provider: {}", provider.unwrap_or("-"));
	if let Some(element) = element {
		println!("element: {element}");
	}
	if let Some(count) = alternatives {
		println!("alternatives: {count}");
	}
	if !fields.is_empty() {
		println!("fields:");
		for row in fields {
			println!("  {:<10} +{:<3} {}", row.name, row.offset, row.size);
		}
	}
	Ok(())
}

struct FieldRow {
	name: &'static str,
	offset: usize,
	size: usize,
}

fn field_rows(desc: &TypeDesc, abi: &AbiLayout) -> Vec<FieldRow> {
	let row = |name, offset, size| FieldRow { name, offset, size };
	match &desc.shape {
		TypeShape::String { .. } => {
			let spec = abi.string;
			vec![
				row("data", spec.long_data_offset, abi.pointer_size),
				row("size", spec.long_size_offset, spec.word_size),
				row("cap", spec.long_cap_offset, spec.word_size),
				row("inline", spec.inline_offset, spec.inline_capacity),
				row("tag", spec.tag_offset, 1),
			]
		}
		TypeShape::Vector { .. } => {
			let spec = abi.sequence;
			vec![
				row("begin", spec.begin_offset, abi.pointer_size),
				row("end", spec.end_offset, abi.pointer_size),
				row("cap", spec.cap_offset, abi.pointer_size),
			]
		}
		TypeShape::Variant { .. } => match desc.variant_layout(abi) {
			Some(spec) => vec![
				row("storage", spec.storage_offset, spec.storage_size),
				row("index", spec.discriminant_offset, spec.discriminant_width),
			],
			None => Vec::new(),
		},
		_ => Vec::new(),
	}
}

fn element_name(desc: &TypeDesc) -> Option<String> {
	match &desc.shape {
		TypeShape::String { element } | TypeShape::Vector { element } => Some(element.name.to_string()),
		_ => None,
	}
}

#[derive(serde::Serialize)]
struct FieldJson {
	name: &'static str,
	offset: usize,
	size: usize,
}

#[derive(serde::Serialize)]
struct LayoutJson {
	#[serde(rename = "type")]
	type_name: String,
	canonical: String,
	kind: &'static str,
	pointer_size: usize,
	size: usize,
	align: usize,
	provider: Option<&'static str>,
	element: Option<String>,
	alternatives: Option<usize>,
	fields: Vec<FieldJson>,
}

#[cfg(test)]
mod tests;
