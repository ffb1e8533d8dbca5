//! Indented, one-field-per-line view of a packet tree.

use crate::packet::Packet;
use std::fmt;

/// Render `packet` with children indented two spaces per level:
///
/// ```text
/// Version: 1
/// TypeID: 6
///   Version: 6
///   TypeID: 4
///   Value: 10
/// ```
pub fn dump_tree(packet: &Packet) -> String {
    TreeDump(packet).to_string()
}

/// `Display` adapter behind [`dump_tree`], for writing straight into a
/// formatter or stream without building the string first.
pub struct TreeDump<'a>(pub &'a Packet);

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dump_into(f, self.0, 0)
    }
}

fn dump_into(out: &mut impl fmt::Write, packet: &Packet, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    writeln!(out, "{}Version: {}", indent, packet.version())?;
    writeln!(out, "{}TypeID: {}", indent, packet.type_id())?;
    if let Packet::Literal { value, .. } = packet {
        writeln!(out, "{}Value: {}", indent, value)?;
    }
    for child in packet.children() {
        dump_into(out, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Operator;

    #[test]
    fn dump_nested() {
        let p = Packet::operator(1, Operator::Lesser, vec![Packet::literal(6, 10), Packet::literal(2, 20)]);
        let expected = "Version: 1\nTypeID: 6\n  Version: 6\n  TypeID: 4\n  Value: 10\n  Version: 2\n  TypeID: 4\n  Value: 20\n";
        assert_eq!(dump_tree(&p), expected);
    }

    #[test]
    fn adapter_writes_into_formatter() {
        let p = Packet::operator(5, Operator::Sum, vec![Packet::operator(3, Operator::Maximum, vec![Packet::literal(0, 7)])]);
        let framed = format!("[{}]", TreeDump(&p));
        assert_eq!(
            framed,
            "[Version: 5\nTypeID: 0\n  Version: 3\n  TypeID: 3\n    Version: 0\n    TypeID: 4\n    Value: 7\n]"
        );
    }
}
