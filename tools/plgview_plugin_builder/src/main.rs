use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;

type DynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "plgview_plugin_builder")]
#[command(about = "Compile every plugin source file under a tree into its own library")]
struct Args {
	/// Directory searched recursively for sources.
	#[arg(long, default_value = "Plugins/Plugins/src")]
	src: PathBuf,
	/// Source file extension, without the dot.
	#[arg(long, default_value = "cs")]
	ext: String,
	/// Output directory for built libraries; created when missing.
	#[arg(long, default_value = "../addons/wizard/plugins")]
	out: PathBuf,
	/// Compiler executable.
	#[arg(long, default_value = "csc")]
	compiler: String,
	/// Core library every plugin is compiled against.
	#[arg(long, default_value = "../addons/wizard/bin/wizard.dll")]
	reference: PathBuf,
	/// Print planned compiler invocations without running them.
	#[arg(long)]
	dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BuildItem {
	source: PathBuf,
	output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildOutcome {
	Built,
	Failed,
}

fn main() {
	match run(Args::parse()) {
		Ok(0) => {}
		Ok(_) => std::process::exit(1),
		Err(err) => {
			eprintln!("error: {err}");
			std::process::exit(1);
		}
	}
}

/// Returns the number of failed items.
fn run(args: Args) -> Result<usize, DynError> {
	let plan = build_plan(&args.src, &args.ext, &args.out)?;
	if plan.is_empty() {
		println!("No .{} files found under {}.", args.ext, args.src.display());
		return Ok(0);
	}

	if args.dry_run {
		println!("Dry run: {} file(s) planned into {}", plan.len(), args.out.display());
		for item in &plan {
			let command = compiler_args(item, &args.reference);
			println!("PLAN\t{} {}", args.compiler, render_args(&command));
		}
		return Ok(0);
	}

	fs::create_dir_all(&args.out)?;

	let mut built = 0usize;
	let mut failed = 0usize;
	for item in &plan {
		match compile(&args.compiler, item, &args.reference) {
			BuildOutcome::Built => {
				built += 1;
				println!("OK\t{}\t=>\t{}", item.source.display(), item.output.display());
			}
			BuildOutcome::Failed => {
				failed += 1;
				println!("FAIL\t{}", item.source.display());
			}
		}
	}

	println!(
		"Processed {} .{} file(s). built={} failed={} out={}",
		plan.len(),
		args.ext,
		built,
		failed,
		args.out.display()
	);
	Ok(failed)
}

fn build_plan(src: &Path, ext: &str, out: &Path) -> Result<Vec<BuildItem>, DynError> {
	if ext.is_empty() || ext.contains(['/', '\\', '*', '?', '[']) {
		return Err(format!("invalid source extension '{ext}'").into());
	}

	let pattern = src.join("**").join(format!("*.{ext}"));
	let pattern = pattern.to_str().ok_or_else(|| format!("source path {} is not valid UTF-8", src.display()))?;

	let mut plan = Vec::new();
	for entry in glob::glob(pattern)? {
		let source = entry?;
		if !source.is_file() {
			continue;
		}
		let stem = source.file_stem().ok_or_else(|| format!("source {} has no file stem", source.display()))?;
		let mut library = stem.to_os_string();
		library.push(".dll");
		plan.push(BuildItem {
			output: out.join(library),
			source,
		});
	}
	plan.sort_by(|left, right| left.source.cmp(&right.source));
	Ok(plan)
}

fn compiler_args(item: &BuildItem, reference: &Path) -> Vec<OsString> {
	let mut reference_arg = OsString::from("-reference:");
	reference_arg.push(reference);
	let mut out_arg = OsString::from("-out:");
	out_arg.push(&item.output);
	vec![OsString::from("-target:library"), reference_arg, out_arg, item.source.clone().into_os_string()]
}

fn render_args(args: &[OsString]) -> String {
	args.iter().map(|arg| arg.to_string_lossy()).collect::<Vec<_>>().join(" ")
}

fn compile(compiler: &str, item: &BuildItem, reference: &Path) -> BuildOutcome {
	match Command::new(compiler).args(compiler_args(item, reference)).status() {
		Ok(status) if status.success() => BuildOutcome::Built,
		Ok(status) => {
			eprintln!("{compiler} exited with status {status} for {}", item.source.display());
			BuildOutcome::Failed
		}
		Err(err) => {
			eprintln!("failed to run {compiler}: {err}");
			BuildOutcome::Failed
		}
	}
}
