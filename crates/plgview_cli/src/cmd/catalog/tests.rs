use crate::cmd::test_support::{run_plgview, run_plgview_json, run_plgview_text};

#[test]
fn catalog_json_lists_every_alternative() {
	let json = run_plgview_json(&["catalog", "--json"]);

	assert_eq!(json["len"], 42);
	assert!(json["fingerprint"].as_str().is_some_and(|item| item.starts_with("0x") && item.len() == 10));
	let entries = json["entries"].as_array().expect("entries array");
	assert_eq!(entries.len(), 42);
	assert_eq!(entries[0]["name"], "plg::invalid");
	assert_eq!(entries[17]["name"], "plg::string");
	assert_eq!(entries[41]["index"], 41);
}

#[test]
fn plg_any_verifies_against_itself() {
	let text = run_plgview_text(&["catalog", "--verify", "plg::any"]);
	assert!(text.lines().any(|line| line == "status: match"), "unexpected output: {text}");
}

#[test]
fn drifted_variant_fails_with_mismatch_report() {
	let output = run_plgview(&["catalog", "--verify", "plg::variant<plg::invalid, plg::none, char>", "--json"]);
	assert!(!output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be valid json");
	assert_eq!(json["matches"], false);
	assert_eq!(json["actual_len"], 3);
	let first = &json["mismatches"][0];
	assert_eq!(first["index"], 2);
	assert_eq!(first["expected"], "bool");
	assert_eq!(first["actual"], "char");
	assert!(String::from_utf8_lossy(&output.stderr).contains("catalog drift"));
}

#[test]
fn verify_rejects_non_variant_types() {
	let output = run_plgview(&["catalog", "--verify", "plg::string"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("not a variant"));
}
