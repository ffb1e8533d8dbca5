//! Recursive-descent decoder for the bit-packed packet format.
//!
//! Every call decodes exactly one packet starting at a bit offset and returns
//! the packet together with the number of bits it consumed. Parents advance
//! their own offset from that count; nothing is shared between sibling calls.
//!
//! ## Layout
//!
//! ```text
//! literal:   VVV 100 (1 NNNN)* (0 NNNN)
//! operator:  VVV TTT 0 LLLLLLLLLLLLLLL  children totalling L bits
//!            VVV TTT 1 CCCCCCCCCCC      exactly C children
//! ```
//!
//! ## Budgets
//!
//! A bit-length container hands each child the part of its declared length
//! that is still unused; a child that would need more fails with
//! [`StructuralError::SubPacketTooLarge`]. A nested bit-length container
//! declaring more than its budget fails as soon as its length field is read,
//! before any of its own children are decoded. A budget of zero means
//! unbounded. Budgets only ever reach one level down.

use crate::bits::{bit_len, read_bit, read_bits, MAX_READ_BITS};
use crate::error::{DecodeError, Result, StructuralError};
use crate::header::read_header;
use crate::input::decode_hex_line;
use crate::packet::{LengthType, Operator, Packet};
use tracing::{debug, trace};

const GROUP_BITS: usize = 5;
const NIBBLE_BITS: usize = 4;

/// Default nesting limit. Decoding, evaluation, printing and dropping a tree
/// of this depth all fit on a 2 MiB thread stack in an unoptimised build.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest nesting accepted; the root is depth 1.
    pub max_depth: usize,
    /// Reject messages whose bits after the root packet are not all zero.
    pub require_zero_padding: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            require_zero_padding: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Decoder { options }
    }

    /// Decode one packet at `bit_offset`. Returns (packet, bits_consumed).
    ///
    /// `bit_budget` / `count_budget` of zero mean unbounded.
    pub fn decode_at(
        &self,
        buf: &[u8],
        bit_offset: usize,
        bit_budget: usize,
        count_budget: usize,
    ) -> Result<(Packet, usize)> {
        self.decode_packet(buf, bit_offset, bit_budget, count_budget, 1)
    }

    /// Decode a whole message: the root packet at bit 0, unbounded.
    pub fn decode_message(&self, buf: &[u8]) -> Result<Packet> {
        let (packet, consumed) = self.decode_at(buf, 0, 0, 0)?;
        if self.options.require_zero_padding {
            check_zero_padding(buf, consumed)?;
        }
        debug!(
            bits = consumed,
            trailing = bit_len(buf) - consumed,
            packets = packet.count(),
            "message decoded"
        );
        Ok(packet)
    }

    /// Hex-decode one line of text (line terminator allowed) and decode it.
    pub fn decode_hex(&self, line: &str) -> Result<Packet> {
        let buf = decode_hex_line(line)?;
        self.decode_message(&buf)
    }

    fn decode_packet(
        &self,
        buf: &[u8],
        offset: usize,
        bit_budget: usize,
        count_budget: usize,
        depth: usize,
    ) -> Result<(Packet, usize)> {
        if depth > self.options.max_depth {
            log_depth_limit(offset, depth);
            return Err(StructuralError::DepthLimitExceeded {
                offset,
                limit: self.options.max_depth,
            }
            .into());
        }

        let (header, header_bits) = read_header(buf, offset)?;
        let mut cursor = offset + header_bits;

        if header.is_literal() {
            let (value, n) = read_literal(buf, cursor)?;
            let consumed = header_bits + n;
            check_bit_budget(offset, consumed, bit_budget)?;
            trace_literal(offset, header.version, value, consumed);
            return Ok((Packet::literal(header.version, value), consumed));
        }

        let op = Operator::try_from(header.type_id)?;
        let length_type = LengthType::from_selector(read_bit(buf, cursor)?);
        cursor += LengthType::SELECTOR_BITS;
        let declared = read_bits(buf, cursor, length_type.field_bits())? as usize;
        cursor += length_type.field_bits();

        let mut children = Vec::new();
        match length_type {
            LengthType::BitLength => {
                if bit_budget > 0 && declared > bit_budget {
                    return Err(declared_length_exceeds(offset, cursor - offset + declared, bit_budget));
                }
                let mut remaining = declared;
                while remaining > 0 {
                    let (child, n) = self.decode_packet(buf, cursor, remaining, 0, depth + 1)?;
                    children.push(child);
                    cursor += n;
                    remaining -= n;
                }
            }
            LengthType::Count => {
                if count_budget > 0 && declared > count_budget {
                    return Err(declared_count_exceeds(offset, declared, count_budget));
                }
                children.reserve(declared);
                for _ in 0..declared {
                    let (child, n) = self.decode_packet(buf, cursor, 0, 0, depth + 1)?;
                    children.push(child);
                    cursor += n;
                }
            }
        }

        let consumed = cursor - offset;
        check_bit_budget(offset, consumed, bit_budget)?;
        trace_operator(offset, header.version, op, length_type, children.len(), consumed);
        Ok((Packet::operator(header.version, op, children), consumed))
    }
}

// Logging lives out of line so its field sets stay off the recursive frame.

#[cold]
#[inline(never)]
fn log_depth_limit(offset: usize, depth: usize) {
    debug!(offset, depth, "nesting limit reached");
}

#[cold]
#[inline(never)]
fn declared_length_exceeds(offset: usize, consumed: usize, budget: usize) -> DecodeError {
    debug!(offset, consumed, budget, "declared length exceeds budget");
    StructuralError::SubPacketTooLarge { offset, consumed, budget }.into()
}

#[cold]
#[inline(never)]
fn declared_count_exceeds(offset: usize, count: usize, budget: usize) -> DecodeError {
    debug!(offset, count, budget, "declared count exceeds budget");
    StructuralError::TooManySubPackets { offset, count, budget }.into()
}

#[inline(never)]
fn trace_literal(offset: usize, version: u8, value: u64, bits: usize) {
    trace!(offset, version, value, bits, "literal");
}

#[inline(never)]
fn trace_operator(
    offset: usize,
    version: u8,
    op: Operator,
    length_type: LengthType,
    children: usize,
    bits: usize,
) {
    trace!(offset, version, %op, ?length_type, children, bits, "operator");
}

/// Decode one packet at `bit_offset` with default options.
///
/// `bit_budget` / `count_budget` of zero mean unbounded. Returns the packet
/// and the number of bits it consumed.
pub fn decode(
    buf: &[u8],
    bit_offset: usize,
    bit_budget: usize,
    count_budget: usize,
) -> Result<(Packet, usize)> {
    Decoder::default().decode_at(buf, bit_offset, bit_budget, count_budget)
}

/// Decode a whole message with default options.
pub fn decode_message(buf: &[u8]) -> Result<Packet> {
    Decoder::default().decode_message(buf)
}

/// Read the 5-bit groups of a literal payload. Returns (value, bits_consumed).
fn read_literal(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut pos = offset;
    loop {
        let group = read_bits(buf, pos, GROUP_BITS)?;
        if value > u64::MAX >> NIBBLE_BITS {
            debug!(offset, "literal wider than 64 bits");
            return Err(StructuralError::LiteralOverflow { offset }.into());
        }
        value = (value << NIBBLE_BITS) | (group & 0xF);
        pos += GROUP_BITS;
        if group & 0x10 == 0 {
            return Ok((value, pos - offset));
        }
    }
}

fn check_bit_budget(offset: usize, consumed: usize, budget: usize) -> Result<()> {
    if budget > 0 && consumed > budget {
        debug!(offset, consumed, budget, "sub-packet exceeds bit budget");
        return Err(StructuralError::SubPacketTooLarge {
            offset,
            consumed,
            budget,
        }
        .into());
    }
    Ok(())
}

fn check_zero_padding(buf: &[u8], from: usize) -> Result<()> {
    let total = bit_len(buf);
    let mut pos = from;
    while pos < total {
        let n = (total - pos).min(MAX_READ_BITS);
        if read_bits(buf, pos, n)? != 0 {
            return Err(DecodeError::Structural(StructuralError::TrailingData {
                offset: from,
                bits: total - from,
            }));
        }
        pos += n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(hex: &str) -> Vec<u8> {
        hex::decode(hex).unwrap()
    }

    #[test]
    fn literal_2021() {
        // 110 100 10111 11110 00101 000
        let (p, n) = decode(&bytes("D2FE28"), 0, 0, 0).unwrap();
        assert_eq!(p, Packet::literal(6, 2021));
        assert_eq!(n, 21);
    }

    #[test]
    fn bit_length_operator_with_two_literals() {
        let (p, n) = decode(&bytes("38006F45291200"), 0, 0, 0).unwrap();
        assert_eq!(
            p,
            Packet::operator(1, Operator::Lesser, vec![Packet::literal(6, 10), Packet::literal(2, 20)])
        );
        assert_eq!(n, 6 + 1 + 15 + 27);
    }

    #[test]
    fn count_operator_with_three_literals() {
        let (p, n) = decode(&bytes("EE00D40C823060"), 0, 0, 0).unwrap();
        assert_eq!(
            p,
            Packet::operator(
                7,
                Operator::Maximum,
                vec![Packet::literal(2, 1), Packet::literal(4, 2), Packet::literal(1, 3)]
            )
        );
        assert_eq!(n, 6 + 1 + 11 + 3 * 11);
    }

    #[test]
    fn decode_at_unaligned_offset_matches_child() {
        let buf = bytes("38006F45291200");
        let (p, n) = decode(&buf, 22, 0, 0).unwrap();
        assert_eq!(p, Packet::literal(6, 10));
        assert_eq!(n, 11);
        let (p, n) = decode(&buf, 33, 0, 0).unwrap();
        assert_eq!(p, Packet::literal(2, 20));
        assert_eq!(n, 16);
    }

    #[test]
    fn caller_bit_budget_is_enforced() {
        let buf = bytes("D2FE28");
        assert!(decode(&buf, 0, 21, 0).is_ok());
        match decode(&buf, 0, 20, 0) {
            Err(DecodeError::Structural(StructuralError::SubPacketTooLarge { consumed, budget, .. })) => {
                assert_eq!((consumed, budget), (21, 20));
            }
            other => panic!("expected SubPacketTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn caller_count_budget_is_enforced() {
        let buf = bytes("EE00D40C823060");
        assert!(decode(&buf, 0, 0, 3).is_ok());
        assert!(matches!(
            decode(&buf, 0, 0, 2),
            Err(DecodeError::Structural(StructuralError::TooManySubPackets { count: 3, budget: 2, .. }))
        ));
    }

    #[test]
    fn truncated_literal_underruns() {
        // 000 100 1xxxx with the continuation bit set on the last group
        let buf = [0b0001_0011, 0b1111_0001];
        assert!(matches!(
            decode(&buf, 0, 0, 0),
            Err(DecodeError::BufferUnderrun { offset: 16, .. })
        ));
    }

    #[test]
    fn literal_wider_than_u64_is_rejected() {
        // 17 groups of 1_1111, then 0_1111
        let mut w = crate::bits::BitWriter::new();
        w.write_bits(0b000_100, 6);
        for _ in 0..17 {
            w.write_bits(0b1_1111, 5);
        }
        w.write_bits(0b0_1111, 5);
        assert!(matches!(
            decode(&w.finish(), 0, 0, 0),
            Err(DecodeError::Structural(StructuralError::LiteralOverflow { offset: 6 }))
        ));
    }

    #[test]
    fn depth_limit() {
        // sum(sum(1)) in count mode
        let mut w = crate::bits::BitWriter::new();
        for _ in 0..2 {
            w.write_bits(0b000_000, 6);
            w.write_bit(true);
            w.write_bits(1, 11);
        }
        w.write_bits(0b000_100_00001, 11);
        let buf = w.finish();

        let shallow = Decoder::new(DecodeOptions { max_depth: 2, ..Default::default() });
        assert!(matches!(
            shallow.decode_message(&buf),
            Err(DecodeError::Structural(StructuralError::DepthLimitExceeded { offset: 36, limit: 2 }))
        ));
        let deep = Decoder::new(DecodeOptions { max_depth: 3, ..Default::default() });
        assert_eq!(deep.decode_message(&buf).unwrap().depth(), 3);
    }

    #[test]
    fn zero_padding_check() {
        let strict = Decoder::new(DecodeOptions { require_zero_padding: true, ..Default::default() });
        assert!(strict.decode_message(&bytes("D2FE28")).is_ok());
        assert!(strict.decode_message(&bytes("D2FE29")).is_err());
        assert!(Decoder::default().decode_message(&bytes("D2FE29")).is_ok());
    }

    #[test]
    fn decode_hex_line_with_terminator() {
        let p = Decoder::default().decode_hex("d2fe28\r\n").unwrap();
        assert_eq!(p, Packet::literal(6, 2021));
    }
}
