use crate::plg::{Endianness, InspectError, Result};

/// Simple bounded cursor over bytes already fetched from the target.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	base: u64,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0; `base` is the target address of `bytes[0]`.
	pub fn new(bytes: &'a [u8], base: u64) -> Self {
		Self { bytes, pos: 0, base }
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(InspectError::MemoryRead {
				addr: self.base.wrapping_add(self.pos as u64),
				len: n,
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read an unsigned integer of `width` bytes and widen to `u64`.
	pub fn read_uint(&mut self, width: usize, endianness: Endianness) -> Result<u64> {
		let raw = self.read_exact(width)?;
		Ok(uint_from_bytes(raw, endianness))
	}

	/// Read an IEEE-754 single.
	pub fn read_f32(&mut self, endianness: Endianness) -> Result<f32> {
		Ok(f32::from_bits(self.read_uint(4, endianness)? as u32))
	}

	/// Read an IEEE-754 double.
	pub fn read_f64(&mut self, endianness: Endianness) -> Result<f64> {
		Ok(f64::from_bits(self.read_uint(8, endianness)?))
	}
}

/// Widen up to eight bytes into a `u64` using the selected byte order.
pub fn uint_from_bytes(raw: &[u8], endianness: Endianness) -> u64 {
	let mut buf = [0_u8; 8];
	let take = raw.len().min(8);
	match endianness {
		Endianness::Little => {
			buf[..take].copy_from_slice(&raw[..take]);
			u64::from_le_bytes(buf)
		}
		Endianness::Big => {
			buf[8 - take..].copy_from_slice(&raw[..take]);
			u64::from_be_bytes(buf)
		}
	}
}

/// Sign-extend the low `width` bytes of `value`.
pub fn sign_extend(value: u64, width: usize) -> i64 {
	match width {
		1 => (value as u8) as i8 as i64,
		2 => (value as u16) as i16 as i64,
		4 => (value as u32) as i32 as i64,
		_ => value as i64,
	}
}

#[cfg(test)]
mod tests {
	use super::{Cursor, sign_extend, uint_from_bytes};
	use crate::plg::{Endianness, InspectError};

	#[test]
	fn widens_little_and_big_endian() {
		assert_eq!(uint_from_bytes(&[0x34, 0x12], Endianness::Little), 0x1234);
		assert_eq!(uint_from_bytes(&[0x12, 0x34], Endianness::Big), 0x1234);
		assert_eq!(uint_from_bytes(&[0xFF; 8], Endianness::Little), u64::MAX);
	}

	#[test]
	fn sign_extends_narrow_values() {
		assert_eq!(sign_extend(0xFF, 1), -1);
		assert_eq!(sign_extend(0x8000, 2), -32768);
		assert_eq!(sign_extend(0x7FFF_FFFF, 4), i64::from(i32::MAX));
	}

	#[test]
	fn short_read_reports_target_address() {
		let bytes = [1_u8, 2, 3];
		let mut cursor = Cursor::new(&bytes, 0x4000);
		assert_eq!(cursor.read_u8().expect("first byte"), 1);
		let err = cursor.read_uint(4, Endianness::Little).expect_err("only two bytes left");
		assert!(matches!(err, InspectError::MemoryRead { addr: 0x4001, len: 4 }));
	}
}
