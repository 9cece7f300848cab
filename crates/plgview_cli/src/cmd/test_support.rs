use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use plgview_testkit::{MemoryImage, target_dir as workspace_target_dir};

static PLGVIEW_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn run_plgview(args: &[&str]) -> Output {
	Command::new(plgview_bin()).args(args).output().expect("plgview command executes")
}

pub(crate) fn run_plgview_json(args: &[&str]) -> serde_json::Value {
	let output = run_plgview(args);
	assert!(
		output.status.success(),
		"plgview command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

pub(crate) fn run_plgview_text(args: &[&str]) -> String {
	let output = run_plgview(args);
	assert!(
		output.status.success(),
		"plgview command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

/// Write `image` as a snapshot file under `dir`.
pub(crate) fn write_snapshot(dir: &Path, image: &MemoryImage) -> String {
	let path = dir.join("image.snapshot.json");
	std::fs::write(&path, image.to_snapshot_json()).expect("snapshot file writes");
	path.to_string_lossy().into_owned()
}

fn plgview_bin() -> &'static PathBuf {
	PLGVIEW_BIN.get_or_init(resolve_plgview_bin)
}

fn resolve_plgview_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_plgview") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "plgview.exe" } else { "plgview" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "plgview"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build plgview binary at {}", bin.display());

	bin
}
