use crate::cmd::test_support::{run_plgview, run_plgview_json, run_plgview_text};

#[test]
fn any_layout_json_reports_storage_and_index() {
	let json = run_plgview_json(&["layout", "--type", "plg::any", "--json"]);

	assert_eq!(json["kind"], "variant");
	assert_eq!(json["size"], 32);
	assert_eq!(json["align"], 8);
	assert_eq!(json["provider"], "variant");
	assert_eq!(json["alternatives"], 42);
	assert_eq!(json["fields"][0]["name"], "storage");
	assert_eq!(json["fields"][0]["size"], 24);
	assert_eq!(json["fields"][1]["name"], "index");
	assert_eq!(json["fields"][1]["offset"], 24);
	assert_eq!(json["fields"][1]["size"], 1);
}

#[test]
fn vector_layout_text_uses_canonical_names() {
	let text = run_plgview_text(&["layout", "--type", "std::vector<int>"]);

	assert!(text.contains("canonical: plg::vector<int32_t>"), "unexpected output: {text}");
	assert!(text.contains("provider: sequence"));
	assert!(text.contains("element: int32_t"));
	assert!(text.contains("size: 24"));
}

#[test]
fn string_layout_shrinks_with_pointer_size() {
	let json = run_plgview_json(&["layout", "--type", "plg::string", "--pointer-size", "4", "--json"]);

	assert_eq!(json["size"], 12);
	let fields: Vec<_> = json["fields"]
		.as_array()
		.expect("fields array")
		.iter()
		.map(|field| (field["name"].as_str(), field["offset"].as_u64()))
		.collect();
	assert_eq!(
		fields,
		vec![
			(Some("data"), Some(0)),
			(Some("size"), Some(4)),
			(Some("cap"), Some(8)),
			(Some("inline"), Some(0)),
			(Some("tag"), Some(11)),
		]
	);
}

#[test]
fn primitives_have_no_provider() {
	let json = run_plgview_json(&["layout", "--type", "double", "--json"]);
	assert_eq!(json["kind"], "primitive");
	assert_eq!(json["size"], 8);
	assert!(json["provider"].is_null());
	assert!(json["fields"].as_array().is_some_and(Vec::is_empty));
}

#[test]
fn unknown_types_and_pointer_sizes_fail() {
	let output = run_plgview(&["layout", "--type", "Widget"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: unknown type: Widget"));

	let output = run_plgview(&["layout", "--type", "plg::string", "--pointer-size", "2"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported pointer size 2"));
}
