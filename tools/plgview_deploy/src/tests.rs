use super::*;

struct Tree {
	dir: tempfile::TempDir,
	library: PathBuf,
}

fn deploy_tree() -> Tree {
	let dir = tempfile::tempdir().expect("temp dir");
	let root = dir.path().join("game");
	for sub in ["a/plugins", "b/deep/plugins", "c"] {
		fs::create_dir_all(root.join(sub)).expect("target dirs");
	}
	fs::write(root.join("a/plugins/wizard.dll"), "old-a").expect("target writes");
	fs::write(root.join("b/deep/plugins/wizard.dll"), "old-b").expect("target writes");
	fs::write(root.join("c/other.dll"), "untouched").expect("target writes");

	let library = root.join("bin").join("wizard.dll");
	fs::create_dir_all(library.parent().expect("library dir")).expect("library dir");
	fs::write(&library, "fresh").expect("library writes");
	Tree { dir, library }
}

#[test]
fn targets_exclude_the_library_itself() {
	let tree = deploy_tree();
	let root = tree.dir.path().join("game");
	let targets = find_targets(&tree.library, &root).expect("targets resolve");

	assert_eq!(targets, vec![root.join("a/plugins/wizard.dll"), root.join("b/deep/plugins/wizard.dll")]);
}

#[test]
fn deploy_overwrites_every_match() {
	let tree = deploy_tree();
	let root = tree.dir.path().join("game");
	let summary = run(Args {
		library: tree.library.clone(),
		root: root.clone(),
		dry_run: false,
	})
	.expect("deploy runs");

	assert_eq!(summary, DeploySummary { copied: 2, failed: 0 });
	assert_eq!(fs::read_to_string(root.join("a/plugins/wizard.dll")).expect("read back"), "fresh");
	assert_eq!(fs::read_to_string(root.join("b/deep/plugins/wizard.dll")).expect("read back"), "fresh");
	assert_eq!(fs::read_to_string(root.join("c/other.dll")).expect("read back"), "untouched");
}

#[test]
fn failed_copy_does_not_stop_later_targets() {
	let tree = deploy_tree();
	let root = tree.dir.path().join("game");
	let vanished = root.join("gone/plugins/wizard.dll");
	let targets = vec![vanished, root.join("a/plugins/wizard.dll")];

	let summary = copy_over(&tree.library, &targets);

	assert_eq!(summary, DeploySummary { copied: 1, failed: 1 });
	assert_eq!(fs::read_to_string(root.join("a/plugins/wizard.dll")).expect("read back"), "fresh");
	assert!(!root.join("gone").exists());
}

#[test]
fn dry_run_leaves_targets_alone() {
	let tree = deploy_tree();
	let root = tree.dir.path().join("game");
	let summary = run(Args {
		library: tree.library.clone(),
		root: root.clone(),
		dry_run: true,
	})
	.expect("dry run succeeds");

	assert_eq!(summary, DeploySummary::default());
	assert_eq!(fs::read_to_string(root.join("a/plugins/wizard.dll")).expect("read back"), "old-a");
}

#[test]
fn missing_library_is_an_error() {
	let dir = tempfile::tempdir().expect("temp dir");
	let err = run(Args {
		library: dir.path().join("missing.dll"),
		root: dir.path().to_path_buf(),
		dry_run: false,
	})
	.expect_err("missing library should fail");
	assert!(err.to_string().contains("does not exist"));
}
