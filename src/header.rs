//! The fixed 6-bit prefix of every packet: 3-bit version, 3-bit type id.

use crate::bits::read_bits;
use crate::error::Result;

pub const VERSION_BITS: usize = 3;
pub const TYPE_ID_BITS: usize = 3;
pub const HEADER_BITS: usize = VERSION_BITS + TYPE_ID_BITS;

/// Type id of a literal packet; every other id names an operator.
pub const LITERAL_TYPE_ID: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub type_id: u8,
}

impl Header {
    pub fn is_literal(&self) -> bool {
        self.type_id == LITERAL_TYPE_ID
    }
}

/// Read the header at `bit_offset`. Returns the header and the bits consumed
/// (always [`HEADER_BITS`]).
pub fn read_header(buf: &[u8], bit_offset: usize) -> Result<(Header, usize)> {
    let version = read_bits(buf, bit_offset, VERSION_BITS)? as u8;
    let type_id = read_bits(buf, bit_offset + VERSION_BITS, TYPE_ID_BITS)? as u8;
    Ok((Header { version, type_id }, HEADER_BITS))
}
