use std::path::PathBuf;

use plgview::plg::Result;

use crate::cmd::util::{emit_json, load_registry};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub formatters: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

/// List active registrations in lookup order, as re-appliable commands.
pub fn run(args: Args) -> Result<()> {
	let Args { formatters, json } = args;
	let registry = load_registry(formatters.as_deref())?;

	if json {
		let payload = FormattersJson {
			synthetics: registry
				.synthetics()
				.iter()
				.map(|item| BindingJson {
					pattern: item.matcher.pattern().to_owned(),
					regex: item.matcher.is_regex(),
					provider: Some(item.provider.as_str()),
					summary: None,
				})
				.collect(),
			summaries: registry
				.summaries()
				.iter()
				.map(|item| BindingJson {
					pattern: item.matcher.pattern().to_owned(),
					regex: item.matcher.is_regex(),
					provider: None,
					summary: Some(item.format.to_string()),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	for item in registry.synthetics() {
		println!("type synthetic add {} --provider {}", item.matcher, item.provider.as_str());
	}
	for item in registry.summaries() {
		println!("type summary add {} --summary-string {}", item.matcher, quote(&item.format));
	}
	Ok(())
}

fn quote(text: &str) -> String {
	format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

#[derive(serde::Serialize)]
struct BindingJson {
	pattern: String,
	regex: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	provider: Option<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	summary: Option<String>,
}

#[derive(serde::Serialize)]
struct FormattersJson {
	synthetics: Vec<BindingJson>,
	summaries: Vec<BindingJson>,
}
