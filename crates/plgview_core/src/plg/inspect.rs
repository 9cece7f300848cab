use crate::plg::{FormatterRegistry, InspectError, SyntheticProvider, Target, Value, ValueObject, ValueSource};

/// Expansion bounds for one inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
	/// Deepest level whose children are materialized.
	pub max_depth: usize,
	/// Children materialized per node.
	pub max_children: usize,
}

impl Default for ExpandOptions {
	fn default() -> Self {
		Self {
			max_depth: 6,
			max_children: 64,
		}
	}
}

/// Rendered value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
	/// Display name.
	pub name: String,
	/// Type name as inspected.
	pub type_name: String,
	/// One-line summary.
	pub summary: String,
	/// Materialized children.
	pub children: Vec<ValueNode>,
	/// Children skipped by the expansion bounds.
	pub omitted_children: usize,
}

/// Drives providers and native formatting over a value tree.
pub struct Inspector<'a> {
	target: Target<'a>,
	registry: &'a FormatterRegistry,
	options: ExpandOptions,
}

impl<'a> Inspector<'a> {
	/// Inspector with default bounds.
	pub fn new(target: Target<'a>, registry: &'a FormatterRegistry) -> Self {
		Self {
			target,
			registry,
			options: ExpandOptions::default(),
		}
	}

	/// Replace the expansion bounds.
	pub fn with_options(mut self, options: ExpandOptions) -> Self {
		self.options = options;
		self
	}

	/// Render `value` and its children.
	pub fn inspect(&self, value: &ValueObject) -> ValueNode {
		self.render(value, 0)
	}

	fn render(&self, value: &ValueObject, depth: usize) -> ValueNode {
		let mut node = ValueNode {
			name: value.name.to_string(),
			type_name: value.type_name.to_string(),
			summary: String::new(),
			children: Vec::new(),
			omitted_children: 0,
		};

		let addr = match &value.source {
			ValueSource::Synthetic(native) => {
				node.summary = native.to_string();
				return node;
			}
			ValueSource::Memory { addr } => *addr,
		};

		let Some(kind) = self.registry.provider_for(&value.type_name) else {
			node.summary = self.format_native(&value.type_name, addr);
			return node;
		};

		let mut provider = SyntheticProvider::new(kind, self.target, &value.type_name, addr);
		provider.refresh();
		let mut svar = provider.summary_text();
		let count = provider.child_count();

		if depth < self.options.max_depth {
			let shown = count.min(self.options.max_children);
			for index in 0..shown {
				if let Some(child) = provider.child_at(index) {
					node.children.push(self.render(&child, depth + 1));
				}
			}
			node.omitted_children = count - shown;

			if provider.joins_child_summary()
				&& let Some(child) = node.children.first()
			{
				svar = format!("{svar} = {}", child.summary);
			}
		} else {
			node.omitted_children = count;
		}

		node.summary = match self.registry.summary_for(&value.type_name) {
			Some(registration) => registration.render(&svar),
			None => svar,
		};
		node
	}

	fn format_native(&self, type_name: &str, addr: u64) -> String {
		let Target { memory, types, abi } = self.target;
		let desc = match types.resolve(type_name) {
			Ok(desc) => desc,
			Err(InspectError::UnknownType { .. } | InspectError::InvalidTypeName { .. }) => return format!("<unknown type {type_name}>"),
			Err(err) => return err.marker(),
		};
		match Value::read(memory, abi, addr, &desc) {
			Ok(Some(value)) => value.to_string(),
			Ok(None) => format!("<no formatter for {}>", desc.name),
			Err(err) => err.marker(),
		}
	}
}

#[cfg(test)]
mod tests;
