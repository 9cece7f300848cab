use crate::plg::{FormatterRegistry, InspectError, ProviderKind, TypeMatcher};

#[test]
fn default_registry_covers_the_four_types() {
	let registry = FormatterRegistry::plg_default();
	assert_eq!(registry.synthetics().len(), 4);
	assert_eq!(registry.summaries().len(), 4);

	assert_eq!(registry.provider_for("plg::string"), Some(ProviderKind::String));
	assert_eq!(registry.provider_for("plg::basic_string<char, std::char_traits<char>, plg::allocator<char>>"), Some(ProviderKind::String));
	assert_eq!(registry.provider_for("std::vector<int>"), Some(ProviderKind::Sequence));
	assert_eq!(registry.provider_for("plg::variant<plg::none>"), Some(ProviderKind::Variant));
	assert_eq!(registry.provider_for("plg::any"), Some(ProviderKind::Variant));
	assert_eq!(registry.provider_for("plg::vec3"), None);
	assert_eq!(registry.provider_for("int32_t"), None);
}

#[test]
fn default_summaries_pass_provider_text_through() {
	let registry = FormatterRegistry::plg_default();
	let summary = registry.summary_for("plg::any").expect("any has a summary");
	assert_eq!(summary.render("bool = true"), "bool = true");
}

#[test]
fn exact_matcher_compares_canonical_names() {
	let matcher = TypeMatcher::new("std::vector<int>", false).expect("exact matcher builds");
	assert!(matcher.matches("plg::vector<int32_t, plg::allocator<int32_t>>"));
	assert!(!matcher.matches("plg::vector<int64_t>"));
	assert_eq!(matcher.to_string(), "\"plg::vector<int32_t>\"");
}

#[test]
fn commands_register_providers_and_summaries() {
	let mut registry = FormatterRegistry::new();
	registry.apply_command(r#"type synthetic add -x "^my::text$" --provider string"#).expect("synthetic command applies");
	registry
		.apply_command(r#"type summary add -x "^my::text$" --summary-string "text: ${svar}""#)
		.expect("summary command applies");

	assert_eq!(registry.provider_for("my::text"), Some(ProviderKind::String));
	let summary = registry.summary_for("my::text").expect("summary registered");
	assert_eq!(summary.render("\"hi\""), "text: \"hi\"");
	assert_eq!(summary.matcher.to_string(), "-x \"^my::text$\"");
}

#[test]
fn debugger_class_names_are_accepted() {
	let mut registry = FormatterRegistry::new();
	registry
		.apply_command(r#"type synthetic add -x "^plg::vector<.+>$" --python-class plg_types_formatter.VectorProvider"#)
		.expect("debugger command applies");
	assert_eq!(registry.provider_for("plg::vector<bool>"), Some(ProviderKind::Sequence));
}

#[test]
fn scripts_skip_comments_and_blank_lines() {
	let script = "\n# plg formatters\ntype synthetic add \"plg::any\" --provider variant\n\n  type summary add \"plg::any\" --summary-string \"${svar}\"\n";
	let mut registry = FormatterRegistry::new();
	assert_eq!(registry.apply_script(script).expect("script applies"), 2);
	assert_eq!(registry.provider_for("plg::any"), Some(ProviderKind::Variant));
}

#[test]
fn first_registration_wins() {
	let mut registry = FormatterRegistry::new();
	registry.apply_command(r#"type synthetic add "plg::any" --provider sequence"#).expect("command applies");
	registry.apply_command(r#"type synthetic add "plg::any" --provider variant"#).expect("command applies");
	assert_eq!(registry.provider_for("plg::any"), Some(ProviderKind::Sequence));
}

#[test]
fn extended_defaults_sit_behind_script_bindings() {
	let mut registry = FormatterRegistry::new();
	registry.apply_command(r#"type summary add -x "^plg::vector<.+>$" --summary-string "items: ${svar}""#).expect("command applies");
	registry.extend(FormatterRegistry::plg_default());

	assert_eq!(registry.synthetics().len(), 4);
	assert_eq!(registry.summaries().len(), 5);
	assert_eq!(registry.provider_for("plg::vector<bool>"), Some(ProviderKind::Sequence));
	let summary = registry.summary_for("plg::vector<bool>").expect("summary binding");
	assert_eq!(summary.render("size=0 capacity=0"), "items: size=0 capacity=0");
}

#[test]
fn malformed_commands_are_rejected() {
	let mut registry = FormatterRegistry::new();
	let cases = [
		r#"type synthetic add "plg::any""#,
		r#"type synthetic add "plg::any" --provider tuple"#,
		r#"type summary add "plg::any""#,
		r#"type synthetic add "unterminated --provider string"#,
		r#"type format add "plg::any""#,
		r#"breakpoint set -n main"#,
	];
	for line in cases {
		let err = registry.apply_command(line).expect_err("command is rejected");
		assert!(matches!(err, InspectError::InvalidCommand { .. }), "unexpected error for {line}: {err}");
	}

	let err = registry.apply_command(r#"type synthetic add -x "(" --provider string"#).expect_err("bad regex is rejected");
	assert!(matches!(err, InspectError::InvalidPattern { .. }));
	assert!(registry.synthetics().is_empty());
}
