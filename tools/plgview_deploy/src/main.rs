use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

type DynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "plgview_deploy")]
#[command(about = "Copy a freshly built library over every same-named file under a tree")]
struct Args {
	/// Built library to deploy.
	#[arg(long)]
	library: PathBuf,
	/// Directory searched recursively for files named like the library.
	#[arg(long)]
	root: PathBuf,
	/// Print planned copies without touching any file.
	#[arg(long)]
	dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DeploySummary {
	copied: usize,
	failed: usize,
}

fn main() {
	match run(Args::parse()) {
		Ok(summary) if summary.failed == 0 => {}
		Ok(_) => std::process::exit(1),
		Err(err) => {
			eprintln!("error: {err}");
			std::process::exit(1);
		}
	}
}

fn run(args: Args) -> Result<DeploySummary, DynError> {
	if !args.library.is_file() {
		return Err(format!("library {} does not exist", args.library.display()).into());
	}

	let targets = find_targets(&args.library, &args.root)?;
	if targets.is_empty() {
		println!("No files named like {} under {}.", args.library.display(), args.root.display());
		return Ok(DeploySummary::default());
	}

	if args.dry_run {
		println!("Dry run: {} file(s) would be replaced", targets.len());
		for target in &targets {
			println!("PLAN\t{}\t<=\t{}", target.display(), args.library.display());
		}
		return Ok(DeploySummary::default());
	}

	let summary = copy_over(&args.library, &targets);
	println!("Done. copied={} failed={} root={}", summary.copied, summary.failed, args.root.display());
	Ok(summary)
}

/// Copy `library` onto each target; a failed copy is reported and the rest still run.
fn copy_over(library: &Path, targets: &[PathBuf]) -> DeploySummary {
	let mut summary = DeploySummary::default();
	for target in targets {
		match fs::copy(library, target) {
			Ok(_) => {
				summary.copied += 1;
				println!("COPY\t{}", target.display());
			}
			Err(err) => {
				summary.failed += 1;
				println!("FAIL\t{}\t{err}", target.display());
			}
		}
	}
	summary
}

/// Every file under `root` sharing the library's file name, excluding the library itself.
fn find_targets(library: &Path, root: &Path) -> Result<Vec<PathBuf>, DynError> {
	let name = library
		.file_name()
		.and_then(|item| item.to_str())
		.ok_or_else(|| format!("library path {} has no usable file name", library.display()))?;
	let pattern = root.join("**").join(glob::Pattern::escape(name));
	let pattern = pattern.to_str().ok_or_else(|| format!("root {} is not valid UTF-8", root.display()))?;
	let library = fs::canonicalize(library)?;

	let mut targets = Vec::new();
	for entry in glob::glob(pattern)? {
		let path = entry?;
		if !path.is_file() {
			continue;
		}
		if fs::canonicalize(&path).is_ok_and(|item| item == library) {
			continue;
		}
		targets.push(path);
	}
	targets.sort();
	Ok(targets)
}

#[cfg(test)]
mod tests;
