//! Hex plumbing: one line of hex digits in, a byte buffer out.

use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Strip one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// Hex-decode a single line. Digits are case-insensitive; the digit count must
/// be even.
pub fn decode_hex_line(line: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(strip_line_terminator(line))?)
}

pub fn read_hex<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    decode_hex_line(&text)
}

pub fn read_hex_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let text = std::fs::read_to_string(path)?;
    decode_hex_line(&text)
}
