//! Bit-level access to a byte buffer, MSB-first.
//!
//! Bit 0 is the most significant bit of byte 0. Reads are pure functions of
//! `(buffer, offset, width)`: there is no cursor, so every caller keeps its own
//! offset and reports how many bits it consumed.

use crate::error::{DecodeError, Result};
use byteorder::{BigEndian, ByteOrder};

/// Widest field [`read_bits`] accepts. A 64-bit window starting at any bit of
/// a byte still holds this many bits after the in-byte shift.
pub const MAX_READ_BITS: usize = 57;

/// Total number of addressable bits in `buf`.
pub fn bit_len(buf: &[u8]) -> usize {
    buf.len() * 8
}

/// Read `n` bits starting at `bit_offset` as a big-endian unsigned integer.
///
/// Fails with [`DecodeError::BufferUnderrun`] if `bit_offset + n` is past the
/// end of `buf`, and with [`DecodeError::InvalidBitCount`] above
/// [`MAX_READ_BITS`].
pub fn read_bits(buf: &[u8], bit_offset: usize, n: usize) -> Result<u64> {
    if n > MAX_READ_BITS {
        return Err(DecodeError::InvalidBitCount(n));
    }
    let total = bit_len(buf);
    let end = bit_offset.checked_add(n).unwrap_or(usize::MAX);
    if end > total {
        return Err(DecodeError::BufferUnderrun {
            offset: bit_offset,
            requested: n,
            available: total.saturating_sub(bit_offset),
        });
    }
    if n == 0 {
        return Ok(0);
    }

    let first = bit_offset / 8;
    let shift = bit_offset % 8;
    let last = (end + 7) / 8;
    let mut window = [0u8; 8];
    window[..last - first].copy_from_slice(&buf[first..last]);
    let word = BigEndian::read_u64(&window);
    Ok((word << shift) >> (64 - n))
}

/// Read a single bit as a flag.
pub fn read_bit(buf: &[u8], bit_offset: usize) -> Result<bool> {
    Ok(read_bits(buf, bit_offset, 1)? == 1)
}

/// Writes bits MSB-first into a growing byte buffer.
///
/// The final partial byte is zero-padded by [`BitWriter::finish`].
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    used: u8, // bits already placed in `cur`, 0..8
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `n` bits of `value` (n <= 64), most significant first.
    pub fn write_bits(&mut self, value: u64, n: usize) {
        debug_assert!(n <= 64);
        for i in (0..n).rev() {
            let bit = ((value >> i) & 1) as u8;
            self.cur |= bit << (7 - self.used);
            self.used += 1;
            if self.used == 8 {
                self.bytes.push(self.cur);
                self.cur = 0;
                self.used = 0;
            }
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Number of bits written so far, padding excluded.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.used as usize
    }

    /// Append everything written to `other`, bit for bit.
    pub fn append(&mut self, other: &BitWriter) {
        for &b in &other.bytes {
            self.write_bits(b as u64, 8);
        }
        if other.used > 0 {
            self.write_bits((other.cur >> (8 - other.used)) as u64, other.used as usize);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            self.bytes.push(self.cur);
        }
        self.bytes
    }
}
