use std::fs;
use std::path::Path;

use plgview::plg::{FormatterRegistry, InspectError, Result, parse_address};

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Render an address as fixed-width hex.
pub(crate) fn ptr_hex(value: u64) -> String {
	format!("0x{value:016x}")
}

/// Formatter script bindings (when given) ahead of the default registrations.
pub(crate) fn load_registry(script: Option<&Path>) -> Result<FormatterRegistry> {
	let mut registry = FormatterRegistry::new();
	if let Some(path) = script {
		let text = fs::read_to_string(path)?;
		let applied = registry.apply_script(&text)?;
		tracing::debug!(path = %path.display(), applied, "formatter script loaded");
	}
	registry.extend(FormatterRegistry::plg_default());
	Ok(registry)
}

/// Parse an `ADDR:LEN` capture range.
pub(crate) fn parse_range(value: &str) -> Result<(u64, usize)> {
	let invalid = || InspectError::InvalidAddressLiteral { value: value.to_owned() };
	let (addr, len) = value.split_once(':').ok_or_else(invalid)?;
	let addr = parse_address(addr)?;
	let len = usize::try_from(parse_address(len)?).map_err(|_| invalid())?;
	Ok((addr, len))
}

#[cfg(test)]
mod tests {
	use super::parse_range;

	#[test]
	fn ranges_accept_hex_and_decimal() {
		assert_eq!(parse_range("0x1000:24").expect("range parses"), (0x1000, 24));
		assert_eq!(parse_range("4096:0x20").expect("range parses"), (4096, 32));
		assert!(parse_range("0x1000").is_err());
		assert!(parse_range("zz:4").is_err());
	}
}
