use crate::cmd::test_support::run_plgview;

#[test]
fn capture_rejects_malformed_range() {
	let dir = tempfile::tempdir().expect("temp dir");
	let out = dir.path().join("out.snapshot.json");
	let out = out.to_string_lossy().into_owned();
	let output = run_plgview(&["capture", "--pid", "1", "--range", "0x1000", "--out", &out]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: invalid address literal: 0x1000"));
	assert!(!dir.path().join("out.snapshot.json").exists());
}

#[test]
fn capture_of_missing_process_writes_nothing() {
	let dir = tempfile::tempdir().expect("temp dir");
	let out = dir.path().join("out.snapshot.json");
	let out = out.to_string_lossy().into_owned();
	let output = run_plgview(&["capture", "--pid", "4294967295", "--range", "0x1000:16", "--out", &out]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
	assert!(!dir.path().join("out.snapshot.json").exists());
}

#[test]
fn capture_requires_a_range() {
	let output = run_plgview(&["capture", "--pid", "1", "--out", "unused.json"]);
	assert!(!output.status.success());
	assert_eq!(output.status.code(), Some(2));
}
