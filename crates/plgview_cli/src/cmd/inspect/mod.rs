use std::path::PathBuf;

use plgview::plg::{
	AbiLayout, BuiltinTypes, ExpandOptions, FormatterRegistry, InspectError, Inspector, Result, Snapshot, Target, ValueNode, ValueObject, parse_address,
};

use crate::cmd::util::{emit_json, load_registry, ptr_hex};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub snapshot: Option<PathBuf>,
	#[arg(long)]
	pub pid: Option<u32>,
	#[arg(long)]
	pub addr: String,
	#[arg(long = "type")]
	pub type_name: String,
	#[arg(long, default_value = "value")]
	pub name: String,
	#[arg(long = "pointer-size", default_value_t = 8)]
	pub pointer_size: usize,
	#[arg(long = "max-depth")]
	pub max_depth: Option<usize>,
	#[arg(long = "max-children")]
	pub max_children: Option<usize>,
	#[arg(long)]
	pub formatters: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

enum Source {
	Snapshot(PathBuf),
	Process(u32),
}

/// Render the value tree rooted at a typed address.
pub fn run(args: Args) -> Result<()> {
	let Args {
		snapshot,
		pid,
		addr,
		type_name,
		name,
		pointer_size,
		max_depth,
		max_children,
		formatters,
		json,
	} = args;

	let source = match (snapshot, pid) {
		(Some(path), None) => Source::Snapshot(path),
		(None, Some(pid)) => Source::Process(pid),
		_ => return Err(InspectError::InvalidSource),
	};
	let addr = parse_address(&addr)?;
	let registry = load_registry(formatters.as_deref())?;

	let defaults = ExpandOptions::default();
	let options = ExpandOptions {
		max_depth: max_depth.unwrap_or(defaults.max_depth),
		max_children: max_children.unwrap_or(defaults.max_children),
	};
	let root = ValueObject::at(name, type_name.as_str(), addr);

	let (source_label, node) = match source {
		Source::Snapshot(path) => {
			let snapshot = Snapshot::open(&path)?;
			let target = Target {
				memory: &snapshot.memory,
				types: &BuiltinTypes,
				abi: &snapshot.abi,
			};
			(path.display().to_string(), expand(target, &registry, options, &root))
		}
		Source::Process(pid) => {
			let abi = AbiLayout::for_pointer_size(pointer_size)?;
			(format!("pid:{pid}"), inspect_process(pid, &abi, &registry, options, &root)?)
		}
	};

	if json {
		let payload = InspectJson {
			source: source_label,
			addr: ptr_hex(addr),
			type_name,
			root: NodeJson::from_node(&node),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("source: {source_label}");
	println!("addr: {}", ptr_hex(addr));
	print_node(&node, 0);
	Ok(())
}

fn expand(target: Target<'_>, registry: &FormatterRegistry, options: ExpandOptions, root: &ValueObject) -> ValueNode {
	Inspector::new(target, registry).with_options(options).inspect(root)
}

#[cfg(target_os = "linux")]
fn inspect_process(pid: u32, abi: &AbiLayout, registry: &FormatterRegistry, options: ExpandOptions, root: &ValueObject) -> Result<ValueNode> {
	let memory = plgview::plg::ProcessMemory::attach(pid)?;
	let target = Target {
		memory: &memory,
		types: &BuiltinTypes,
		abi,
	};
	Ok(expand(target, registry, options, root))
}

#[cfg(not(target_os = "linux"))]
fn inspect_process(_pid: u32, _abi: &AbiLayout, _registry: &FormatterRegistry, _options: ExpandOptions, _root: &ValueObject) -> Result<ValueNode> {
	Err(InspectError::Io(std::io::Error::new(
		std::io::ErrorKind::Unsupported,
		"live process inspection is only available on linux",
	)))
}

fn print_node(node: &ValueNode, depth: usize) {
	let indent = "  ".repeat(depth);
	println!("{indent}{} ({}) = {}", node.name, node.type_name, node.summary);
	for child in &node.children {
		print_node(child, depth + 1);
	}
	if node.omitted_children > 0 {
		println!("{indent}  ... {} more", node.omitted_children);
	}
}

#[derive(serde::Serialize)]
struct NodeJson {
	name: String,
	#[serde(rename = "type")]
	type_name: String,
	summary: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	children: Vec<NodeJson>,
	#[serde(skip_serializing_if = "is_zero")]
	omitted_children: usize,
}

impl NodeJson {
	fn from_node(node: &ValueNode) -> Self {
		Self {
			name: node.name.clone(),
			type_name: node.type_name.clone(),
			summary: node.summary.clone(),
			children: node.children.iter().map(Self::from_node).collect(),
			omitted_children: node.omitted_children,
		}
	}
}

fn is_zero(value: &usize) -> bool {
	*value == 0
}

#[derive(serde::Serialize)]
struct InspectJson {
	source: String,
	addr: String,
	#[serde(rename = "type")]
	type_name: String,
	root: NodeJson,
}
