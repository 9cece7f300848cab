use plgview_testkit::{MemoryImage, any_value, long_string, short_string, vector, words};

use crate::plg::test_support::Fixture;
use crate::plg::{ExpandOptions, FormatterRegistry, Inspector, ValueNode, ValueObject};

fn inspect_with(image: &MemoryImage, type_name: &str, options: ExpandOptions) -> ValueNode {
	let fixture = Fixture::new(image);
	let registry = FormatterRegistry::plg_default();
	let inspector = Inspector::new(fixture.target(), &registry).with_options(options);
	inspector.inspect(&ValueObject::at("value", type_name, 0x100))
}

fn inspect(image: &MemoryImage, type_name: &str) -> ValueNode {
	inspect_with(image, type_name, ExpandOptions::default())
}

fn child_summaries(node: &ValueNode) -> Vec<(&str, &str)> {
	node.children.iter().map(|child| (child.name.as_str(), child.summary.as_str())).collect()
}

#[test]
fn string_node_has_value_size_capacity() {
	let image = MemoryImage::new().with_region(0x100, short_string(b"hello"));
	let node = inspect(&image, "plg::string");

	assert_eq!(node.summary, "\"hello\"");
	assert_eq!(child_summaries(&node), vec![("value", "\"hello\""), ("size", "5"), ("capacity", "23")]);
}

#[test]
fn vector_of_strings_recurses_into_elements() {
	let mut elements = short_string(b"a");
	elements.extend(long_string(0x3000, 24, 24));
	let image = MemoryImage::new()
		.with_region(0x100, vector(0x2000, 0x2030, 0x2030))
		.with_region(0x2000, elements)
		.with_region(0x3000, b"abcdefghijklmnopqrstuvwx".to_vec());

	let node = inspect(&image, "plg::vector<plg::string>");
	assert_eq!(node.summary, "size=2 capacity=2");
	assert_eq!(
		child_summaries(&node),
		vec![("size", "2"), ("capacity", "2"), ("[0]", "\"a\""), ("[1]", "\"abcdefghijklmnopqrstuvwx\"")]
	);
	assert_eq!(node.children[3].type_name, "plg::string");
}

#[test]
fn any_summary_includes_the_active_value() {
	let image = MemoryImage::new().with_region(0x100, any_value(&[1], 2));
	let node = inspect(&image, "plg::any");

	assert_eq!(node.summary, "bool = true");
	assert_eq!(child_summaries(&node), vec![("bool", "true")]);
}

#[test]
fn any_holding_a_vector_expands_the_vector() {
	let image = MemoryImage::new()
		.with_region(0x100, any_value(&vector(0x2000, 0x2008, 0x2010), 24))
		.with_region(0x2000, 0x0000_0002_FFFF_FFFF_u64.to_le_bytes().to_vec());
	let node = inspect(&image, "plg::any");

	assert_eq!(node.summary, "plg::vector<int32_t> = size=2 capacity=4");
	let vector_node = &node.children[0];
	assert_eq!(child_summaries(vector_node)[2..], [("[0]", "-1"), ("[1]", "2")]);
}

#[test]
fn valueless_any_has_no_children() {
	let image = MemoryImage::new().with_region(0x100, any_value(&[], 255));
	let node = inspect(&image, "plg::any");

	assert_eq!(node.summary, "<valueless>");
	assert!(node.children.is_empty());
}

#[test]
fn child_limit_reports_omitted_count() {
	let image = MemoryImage::new()
		.with_region(0x100, vector(0x2000, 0x2028, 0x2028))
		.with_region(0x2000, words(&[1, 2, 3, 4, 5]));
	let options = ExpandOptions {
		max_depth: 6,
		max_children: 4,
	};
	let node = inspect_with(&image, "plg::vector<uint64_t>", options);

	assert_eq!(node.children.len(), 4);
	assert_eq!(node.omitted_children, 3);
	assert_eq!(node.children[3].summary, "2");
}

#[test]
fn depth_limit_renders_summary_only() {
	let image = MemoryImage::new().with_region(0x100, short_string(b"deep"));
	let options = ExpandOptions {
		max_depth: 0,
		max_children: 64,
	};
	let node = inspect_with(&image, "plg::string", options);

	assert_eq!(node.summary, "\"deep\"");
	assert!(node.children.is_empty());
	assert_eq!(node.omitted_children, 3);
}

#[test]
fn primitives_use_native_formatting() {
	let image = MemoryImage::new().with_region(0x100, 42_i32.to_le_bytes().to_vec());
	let node = inspect(&image, "int");
	assert_eq!(node.summary, "42");
	assert!(node.children.is_empty());
}

#[test]
fn unknown_types_and_bad_reads_are_reported() {
	let image = MemoryImage::new();
	assert_eq!(inspect(&image, "Widget").summary, "<unknown type Widget>");
	assert!(inspect(&image, "double").summary.starts_with("<error: memory read failed"));
}

#[test]
fn unregistered_containers_have_no_formatter() {
	let fixture = Fixture::new(&MemoryImage::new().with_region(0x100, short_string(b"x")));
	let registry = FormatterRegistry::new();
	let node = Inspector::new(fixture.target(), &registry).inspect(&ValueObject::at("s", "plg::string", 0x100));
	assert_eq!(node.summary, "<no formatter for plg::string>");
}

#[test]
fn garbage_memory_never_panics() {
	let image = MemoryImage::new().with_region(0x100, vec![0xFF; 64]);
	for type_name in ["plg::string", "plg::vector<plg::string>", "plg::any", "plg::variant<plg::none>", "plg::vector<plg::any>"] {
		let node = inspect(&image, type_name);
		assert!(!node.summary.is_empty(), "{type_name} rendered an empty summary");
	}
}
