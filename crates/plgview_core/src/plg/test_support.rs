use plgview_testkit::MemoryImage;

use crate::plg::{BuiltinTypes, Snapshot, Target};

/// Snapshot built from a testkit image, with builtin type resolution.
pub(crate) struct Fixture {
	pub snapshot: Snapshot,
}

impl Fixture {
	pub fn new(image: &MemoryImage) -> Self {
		let snapshot = Snapshot::from_json_slice(image.to_snapshot_json().as_bytes()).expect("testkit image is a valid snapshot");
		Self { snapshot }
	}

	pub fn target(&self) -> Target<'_> {
		Target {
			memory: &self.snapshot.memory,
			types: &BuiltinTypes,
			abi: &self.snapshot.abi,
		}
	}
}
