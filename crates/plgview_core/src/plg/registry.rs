//! Type-name → provider and summary-format bindings.
//!
//! Commands use the debugger's registration syntax so the same script can be
//! fed to both:
//!
//! ```text
//! type synthetic add -x "^plg::vector<.+>$" --provider sequence
//! type summary add -x "^plg::vector<.+>$" --summary-string "${svar}"
//! ```

use std::fmt;

use regex::Regex;

use crate::plg::{InspectError, ProviderKind, Result, canonical_name};

/// Placeholder in summary formats replaced by the provider's summary.
pub const SVAR: &str = "${svar}";

/// How a registration selects type names.
#[derive(Debug, Clone)]
pub enum TypeMatcher {
	/// Canonically equal names.
	Exact(Box<str>),
	/// Regular expression tested against raw and canonical names.
	Regex(Regex),
}

impl TypeMatcher {
	/// Build a matcher, compiling `pattern` when `regex` is set.
	pub fn new(pattern: &str, regex: bool) -> Result<Self> {
		if !regex {
			let name = canonical_name(pattern).unwrap_or_else(|_| pattern.trim().to_owned());
			return Ok(Self::Exact(name.into_boxed_str()));
		}
		Regex::new(pattern).map(Self::Regex).map_err(|source| InspectError::InvalidPattern {
			pattern: pattern.to_owned(),
			source,
		})
	}

	/// Whether `type_name` is selected.
	pub fn matches(&self, type_name: &str) -> bool {
		let canonical = canonical_name(type_name).ok();
		match self {
			Self::Exact(name) => canonical.as_deref().unwrap_or(type_name.trim()) == name.as_ref(),
			Self::Regex(regex) => regex.is_match(type_name.trim()) || canonical.is_some_and(|name| regex.is_match(&name)),
		}
	}

	/// Source pattern text.
	pub fn pattern(&self) -> &str {
		match self {
			Self::Exact(name) => name.as_ref(),
			Self::Regex(regex) => regex.as_str(),
		}
	}

	/// Whether this is a regex matcher.
	pub fn is_regex(&self) -> bool {
		matches!(self, Self::Regex(_))
	}
}

impl fmt::Display for TypeMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_regex() {
			write!(f, "-x \"{}\"", self.pattern())
		} else {
			write!(f, "\"{}\"", self.pattern())
		}
	}
}

/// Synthetic provider binding.
#[derive(Debug, Clone)]
pub struct Registration {
	/// Selected type names.
	pub matcher: TypeMatcher,
	/// Provider built for matching values.
	pub provider: ProviderKind,
}

/// Summary format binding.
#[derive(Debug, Clone)]
pub struct SummaryRegistration {
	/// Selected type names.
	pub matcher: TypeMatcher,
	/// Format with `${svar}` placeholders.
	pub format: Box<str>,
}

impl SummaryRegistration {
	/// Expand the format around a provider summary.
	pub fn render(&self, svar: &str) -> String {
		self.format.replace(SVAR, svar)
	}
}

/// Ordered registration tables; first match wins.
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
	synthetics: Vec<Registration>,
	summaries: Vec<SummaryRegistration>,
}

impl FormatterRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// String, vector, variant and `plg::any` bindings, each summarized by `${svar}`.
	pub fn plg_default() -> Self {
		let mut registry = Self::new();
		let bindings = [
			(r"^plg::(string|basic_string<.+>)$", ProviderKind::String),
			(r"^plg::vector<.+>$", ProviderKind::Sequence),
			(r"^plg::variant<.+>$", ProviderKind::Variant),
			(r"^plg::any$", ProviderKind::Variant),
		];
		for (pattern, provider) in bindings {
			if let Ok(matcher) = TypeMatcher::new(pattern, true) {
				registry.synthetics.push(Registration {
					matcher: matcher.clone(),
					provider,
				});
				registry.summaries.push(SummaryRegistration {
					matcher,
					format: SVAR.into(),
				});
			}
		}
		registry
	}

	/// Add a provider binding.
	pub fn add_synthetic(&mut self, matcher: TypeMatcher, provider: ProviderKind) {
		self.synthetics.push(Registration { matcher, provider });
	}

	/// Add a summary binding.
	pub fn add_summary(&mut self, matcher: TypeMatcher, format: impl Into<Box<str>>) {
		self.summaries.push(SummaryRegistration { matcher, format: format.into() });
	}

	/// Append every binding of `other` after the current ones.
	pub fn extend(&mut self, other: FormatterRegistry) {
		self.synthetics.extend(other.synthetics);
		self.summaries.extend(other.summaries);
	}

	/// Provider bindings in registration order.
	pub fn synthetics(&self) -> &[Registration] {
		&self.synthetics
	}

	/// Summary bindings in registration order.
	pub fn summaries(&self) -> &[SummaryRegistration] {
		&self.summaries
	}

	/// First provider whose matcher accepts `type_name`.
	pub fn provider_for(&self, type_name: &str) -> Option<ProviderKind> {
		self.synthetics.iter().find(|item| item.matcher.matches(type_name)).map(|item| item.provider)
	}

	/// First summary binding whose matcher accepts `type_name`.
	pub fn summary_for(&self, type_name: &str) -> Option<&SummaryRegistration> {
		self.summaries.iter().find(|item| item.matcher.matches(type_name))
	}

	/// Apply every command line of a script; blank lines and `#` comments are skipped.
	pub fn apply_script(&mut self, script: &str) -> Result<usize> {
		let mut applied = 0;
		for line in script.lines() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			self.apply_command(line)?;
			applied += 1;
		}
		Ok(applied)
	}

	/// Apply one `type synthetic add` or `type summary add` command.
	pub fn apply_command(&mut self, line: &str) -> Result<()> {
		let invalid = |reason| InspectError::InvalidCommand {
			command: line.to_owned(),
			reason,
		};
		let words = split_command(line).ok_or_else(|| invalid("unterminated quote"))?;
		let mut words = words.iter().map(String::as_str);

		if words.next() != Some("type") {
			return Err(invalid("expected `type`"));
		}
		let category = words.next();
		if !matches!(category, Some("synthetic" | "summary")) || words.next() != Some("add") {
			return Err(invalid("expected `type synthetic add` or `type summary add`"));
		}

		let mut regex = false;
		let mut pattern = None;
		let mut provider = None;
		let mut format = None;
		while let Some(word) = words.next() {
			match word {
				"-x" | "--regex" => regex = true,
				"--provider" | "--python-class" => provider = Some(words.next().ok_or_else(|| invalid("missing provider"))?),
				"--summary-string" | "-s" => format = Some(words.next().ok_or_else(|| invalid("missing summary string"))?),
				_ if pattern.is_none() => pattern = Some(word),
				_ => return Err(invalid("unexpected argument")),
			}
		}

		let matcher = TypeMatcher::new(pattern.ok_or_else(|| invalid("missing type pattern"))?, regex)?;
		if category == Some("synthetic") {
			let provider = provider.ok_or_else(|| invalid("missing --provider"))?;
			let kind = provider_from_class(provider).map_or_else(|| provider.parse::<ProviderKind>(), Ok)?;
			self.add_synthetic(matcher, kind);
		} else {
			let format = format.ok_or_else(|| invalid("missing --summary-string"))?;
			self.add_summary(matcher, format);
		}
		Ok(())
	}
}

/// Map debugger script class names (`module.StringProvider`) onto provider kinds.
fn provider_from_class(value: &str) -> Option<ProviderKind> {
	match value.rsplit('.').next()? {
		"StringProvider" => Some(ProviderKind::String),
		"VectorProvider" => Some(ProviderKind::Sequence),
		"VariantProvider" => Some(ProviderKind::Variant),
		_ => None,
	}
}

/// Shell-style split honoring double quotes; `\"` and `\\` escape inside quotes.
fn split_command(line: &str) -> Option<Vec<String>> {
	let mut words = Vec::new();
	let mut current = String::new();
	let mut in_word = false;
	let mut quoted = false;
	let mut chars = line.chars().peekable();

	while let Some(ch) = chars.next() {
		match ch {
			'"' => {
				quoted = !quoted;
				in_word = true;
			}
			'\\' if quoted && matches!(chars.peek(), Some('"' | '\\')) => current.extend(chars.next()),
			ch if ch.is_whitespace() && !quoted => {
				if in_word {
					words.push(std::mem::take(&mut current));
					in_word = false;
				}
			}
			ch => {
				current.push(ch);
				in_word = true;
			}
		}
	}

	if quoted {
		return None;
	}
	if in_word {
		words.push(current);
	}
	Some(words)
}

#[cfg(test)]
mod tests;
