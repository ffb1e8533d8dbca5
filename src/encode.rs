//! Encode a packet tree back into the bit-packed format.
//!
//! Literals use the fewest 5-bit groups that hold the value (at least one).
//! Every operator in the tree uses the same [`LengthType`]. Output is
//! zero-padded to a whole byte.

use crate::bits::BitWriter;
use crate::error::EncodeError;
use crate::header::{HEADER_BITS, TYPE_ID_BITS, VERSION_BITS};
use crate::packet::{LengthType, Packet};

const MAX_VERSION: u8 = (1 << VERSION_BITS) - 1;

/// Bits a literal packet holding `value` occupies: header plus 5 bits per nibble.
pub fn literal_bits(value: u64) -> usize {
    HEADER_BITS + 5 * nibble_count(value)
}

fn nibble_count(value: u64) -> usize {
    let significant = 64 - value.leading_zeros() as usize;
    significant.div_ceil(4).max(1)
}

pub fn encode(packet: &Packet, length_type: LengthType) -> Result<Vec<u8>, EncodeError> {
    let mut w = BitWriter::new();
    write_packet(&mut w, packet, length_type)?;
    Ok(w.finish())
}

/// Upper-case hex form of [`encode`], as accepted by the decoder.
pub fn encode_hex(packet: &Packet, length_type: LengthType) -> Result<String, EncodeError> {
    Ok(hex::encode_upper(encode(packet, length_type)?))
}

pub fn write_packet(
    w: &mut BitWriter,
    packet: &Packet,
    length_type: LengthType,
) -> Result<(), EncodeError> {
    let version = packet.version();
    if version > MAX_VERSION {
        return Err(EncodeError::VersionOutOfRange(version));
    }
    w.write_bits(version as u64, VERSION_BITS);
    w.write_bits(packet.type_id() as u64, TYPE_ID_BITS);

    match packet {
        Packet::Literal { value, .. } => {
            let value = *value;
            for i in (0..nibble_count(value)).rev() {
                w.write_bit(i > 0);
                w.write_bits((value >> (4 * i)) & 0xF, 4);
            }
        }
        Packet::Operator { children, .. } => {
            let field_bits = length_type.field_bits();
            let limit = (1usize << field_bits) - 1;
            w.write_bit(length_type.selector());
            match length_type {
                LengthType::BitLength => {
                    let mut body = BitWriter::new();
                    for child in children {
                        write_packet(&mut body, child, length_type)?;
                    }
                    if body.bit_len() > limit {
                        return Err(EncodeError::ChildrenTooLong { bits: body.bit_len() });
                    }
                    w.write_bits(body.bit_len() as u64, field_bits);
                    w.append(&body);
                }
                LengthType::Count => {
                    if children.len() > limit {
                        return Err(EncodeError::TooManyChildren { count: children.len() });
                    }
                    w.write_bits(children.len() as u64, field_bits);
                    for child in children {
                        write_packet(w, child, length_type)?;
                    }
                }
            }
        }
    }
    Ok(())
}
