use plgview::plg::{BuiltinTypes, CatalogCheck, DiscriminantCatalog, InspectError, Result, TypeResolver, TypeShape, plg_any_catalog};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Variant type whose alternatives must match the `plg::any` catalog.
	#[arg(long)]
	pub verify: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// List the `plg::any` catalog, or check a declared variant against it.
pub fn run(args: Args) -> Result<()> {
	let Args { verify, json } = args;
	let catalog = plg_any_catalog();

	let Some(declared_name) = verify else {
		if json {
			let payload = CatalogJson {
				len: catalog.len(),
				fingerprint: fingerprint_hex(catalog.fingerprint()),
				entries: catalog
					.names()
					.iter()
					.enumerate()
					.map(|(index, name)| EntryJson {
						index,
						name: name.to_string(),
					})
					.collect(),
			};
			emit_json(&payload);
			return Ok(());
		}

		println!("len: {}", catalog.len());
		println!("fingerprint: {}", fingerprint_hex(catalog.fingerprint()));
		for (index, name) in catalog.names().iter().enumerate() {
			println!("  {index:>2}: {name}");
		}
		return Ok(());
	};

	let declared = declared_catalog(&declared_name)?;
	let check = catalog.verify(&declared);

	if json {
		emit_json(&CheckJson::from_check(&declared_name, &check));
	} else {
		print_check(&declared_name, &check);
	}

	if check.is_match() {
		return Ok(());
	}
	Err(InspectError::CatalogDrift {
		mismatches: check.mismatches.len(),
		declared: check.actual_len,
	})
}

fn declared_catalog(name: &str) -> Result<DiscriminantCatalog> {
	let desc = BuiltinTypes.resolve(name)?;
	let TypeShape::Variant { alternatives } = &desc.shape else {
		return Err(InspectError::LayoutViolation {
			field: "type",
			detail: format!("{} is a {}, not a variant", desc.name, desc.kind_label()),
		});
	};
	DiscriminantCatalog::from_names(alternatives.iter().map(|item| item.name.as_ref()))
}

fn print_check(declared: &str, check: &CatalogCheck) {
	println!("declared: {declared}");
	println!("expected_len: {}", check.expected_len);
	println!("actual_len: {}", check.actual_len);
	println!("expected_fingerprint: {}", fingerprint_hex(check.expected_fingerprint));
	println!("actual_fingerprint: {}", fingerprint_hex(check.actual_fingerprint));
	println!("status: {}", if check.is_match() { "match" } else { "mismatch" });
	for item in &check.mismatches {
		println!(
			"  {:>2}: expected {} found {}",
			item.index,
			item.expected.as_deref().unwrap_or("-"),
			item.actual.as_deref().unwrap_or("-")
		);
	}
}

fn fingerprint_hex(value: u32) -> String {
	format!("0x{value:08x}")
}

#[derive(serde::Serialize)]
struct EntryJson {
	index: usize,
	name: String,
}

#[derive(serde::Serialize)]
struct CatalogJson {
	len: usize,
	fingerprint: String,
	entries: Vec<EntryJson>,
}

#[derive(serde::Serialize)]
struct MismatchJson {
	index: usize,
	expected: Option<String>,
	actual: Option<String>,
}

#[derive(serde::Serialize)]
struct CheckJson {
	declared: String,
	matches: bool,
	expected_len: usize,
	actual_len: usize,
	expected_fingerprint: String,
	actual_fingerprint: String,
	mismatches: Vec<MismatchJson>,
}

impl CheckJson {
	fn from_check(declared: &str, check: &CatalogCheck) -> Self {
		Self {
			declared: declared.to_owned(),
			matches: check.is_match(),
			expected_len: check.expected_len,
			actual_len: check.actual_len,
			expected_fingerprint: fingerprint_hex(check.expected_fingerprint),
			actual_fingerprint: fingerprint_hex(check.actual_fingerprint),
			mismatches: check
				.mismatches
				.iter()
				.map(|item| MismatchJson {
					index: item.index,
					expected: item.expected.clone(),
					actual: item.actual.clone(),
				})
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests;
