use std::fs::File;
use std::os::unix::fs::FileExt;

use crate::plg::{InspectError, MemoryReader, Result};

/// Live process memory read through `/proc/<pid>/mem`.
///
/// The caller must already be allowed to trace `pid` (same user with a
/// permissive ptrace scope, or the process itself).
#[derive(Debug)]
pub struct ProcessMemory {
	pid: u32,
	mem: File,
}

impl ProcessMemory {
	/// Open the memory file of `pid`.
	pub fn attach(pid: u32) -> Result<Self> {
		let mem = File::open(format!("/proc/{pid}/mem"))?;
		Ok(Self { pid, mem })
	}

	/// Return the attached process id.
	pub fn pid(&self) -> u32 {
		self.pid
	}
}

impl MemoryReader for ProcessMemory {
	fn read(&self, addr: u64, buf: &mut [u8]) -> Result<()> {
		let len = buf.len();
		self.mem.read_exact_at(buf, addr).map_err(|err| {
			tracing::debug!(pid = self.pid, addr = %format!("0x{addr:x}"), len, %err, "process read failed");
			InspectError::MemoryRead { addr, len }
		})
	}
}
