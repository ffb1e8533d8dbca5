//! Decoded packet tree.
//!
//! A packet is either a literal leaf or an operator node; the payloads are
//! mutually exclusive by construction. `Display` writes the text form read back
//! by [`expr::parse`](crate::expr::parse), e.g. `v6:sum(v4:1, v0:2)`.

use crate::error::StructuralError;
use crate::header::{Header, LITERAL_TYPE_ID};
use std::fmt;

/// Operator semantics selected by a non-literal type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Sum,
    Product,
    Minimum,
    Maximum,
    Greater,
    Lesser,
    Equal,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Sum,
        Operator::Product,
        Operator::Minimum,
        Operator::Maximum,
        Operator::Greater,
        Operator::Lesser,
        Operator::Equal,
    ];

    pub fn type_id(self) -> u8 {
        match self {
            Operator::Sum => 0,
            Operator::Product => 1,
            Operator::Minimum => 2,
            Operator::Maximum => 3,
            Operator::Greater => 5,
            Operator::Lesser => 6,
            Operator::Equal => 7,
        }
    }

    /// Greater, Lesser and Equal compare exactly two operands.
    pub fn is_relational(self) -> bool {
        matches!(self, Operator::Greater | Operator::Lesser | Operator::Equal)
    }

    /// Name used by the text syntax.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Sum => "sum",
            Operator::Product => "product",
            Operator::Minimum => "min",
            Operator::Maximum => "max",
            Operator::Greater => "gt",
            Operator::Lesser => "lt",
            Operator::Equal => "eq",
        }
    }

    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl TryFrom<u8> for Operator {
    type Error = StructuralError;

    fn try_from(type_id: u8) -> Result<Self, Self::Error> {
        match type_id {
            0 => Ok(Operator::Sum),
            1 => Ok(Operator::Product),
            2 => Ok(Operator::Minimum),
            3 => Ok(Operator::Maximum),
            5 => Ok(Operator::Greater),
            6 => Ok(Operator::Lesser),
            7 => Ok(Operator::Equal),
            other => Err(StructuralError::UnknownTypeId(other)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an operator declares the extent of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthType {
    /// 15-bit total length of all children, in bits.
    BitLength,
    /// 11-bit number of children.
    Count,
}

impl LengthType {
    pub const SELECTOR_BITS: usize = 1;

    pub fn from_selector(bit: bool) -> Self {
        if bit {
            LengthType::Count
        } else {
            LengthType::BitLength
        }
    }

    pub fn selector(self) -> bool {
        self == LengthType::Count
    }

    /// Width of the length field that follows the selector.
    pub fn field_bits(self) -> usize {
        match self {
            LengthType::BitLength => 15,
            LengthType::Count => 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Literal {
        version: u8,
        value: u64,
    },
    Operator {
        version: u8,
        op: Operator,
        children: Vec<Packet>,
    },
}

impl Packet {
    pub fn literal(version: u8, value: u64) -> Self {
        Packet::Literal { version, value }
    }

    pub fn operator(version: u8, op: Operator, children: Vec<Packet>) -> Self {
        Packet::Operator { version, op, children }
    }

    pub fn version(&self) -> u8 {
        match self {
            Packet::Literal { version, .. } | Packet::Operator { version, .. } => *version,
        }
    }

    pub fn type_id(&self) -> u8 {
        match self {
            Packet::Literal { .. } => LITERAL_TYPE_ID,
            Packet::Operator { op, .. } => op.type_id(),
        }
    }

    pub fn header(&self) -> Header {
        Header {
            version: self.version(),
            type_id: self.type_id(),
        }
    }

    /// Children in stream order; empty for literals.
    pub fn children(&self) -> &[Packet] {
        match self {
            Packet::Literal { .. } => &[],
            Packet::Operator { children, .. } => children,
        }
    }

    /// Total number of packets in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Packet::count).sum::<usize>()
    }

    /// Nesting depth; a lone literal has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Packet::depth).max().unwrap_or(0)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Literal { version, value } => write!(f, "v{}:{}", version, value),
            Packet::Operator { version, op, children } => {
                write!(f, "v{}:{}(", version, op)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}
