//! Error types for decoding, evaluation and encoding.
//!
//! Every failure is fatal for the message being processed: there is no skip or
//! repair, the error simply carries enough context (bit offsets, budgets) to
//! report where the stream went wrong.

use crate::packet::Operator;

/// Failure while turning hex text or bits into a [`Packet`](crate::Packet).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    /// Odd digit count or a character outside `[0-9a-fA-F]`.
    #[error("Malformed hex: {0}")]
    MalformedHex(#[from] hex::FromHexError),

    /// A read would run past the last bit of the buffer.
    #[error("Buffer underrun at bit {offset}: requested {requested} bits, {available} available")]
    BufferUnderrun {
        offset: usize,
        requested: usize,
        available: usize,
    },

    #[error("Invalid bit count: {0} (max {max})", max = crate::bits::MAX_READ_BITS)]
    InvalidBitCount(usize),

    #[error("Structural: {0}")]
    Structural(#[from] StructuralError),
}

/// Layout violations: budgets, arity and type ids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("sub-packet too large at bit {offset}: {consumed} bits against a budget of {budget}")]
    SubPacketTooLarge {
        offset: usize,
        consumed: usize,
        budget: usize,
    },

    #[error("too many sub-packets at bit {offset}: {count} declared, at most {budget} allowed")]
    TooManySubPackets {
        offset: usize,
        count: usize,
        budget: usize,
    },

    #[error("literal at bit {offset} does not fit in 64 bits")]
    LiteralOverflow { offset: usize },

    #[error("unknown packet type id {0}")]
    UnknownTypeId(u8),

    #[error("{op} takes exactly two operands, got {children}")]
    RelationalArity { op: Operator, children: usize },

    #[error("{op} needs at least one operand")]
    EmptyOperands { op: Operator },

    #[error("nesting deeper than {limit} at bit {offset}")]
    DepthLimitExceeded { offset: usize, limit: usize },

    #[error("non-zero padding in the {bits} bits after the root packet (from bit {offset})")]
    TrailingData { offset: usize, bits: usize },
}

/// Failure while evaluating an already decoded tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("Structural: {0}")]
    Structural(#[from] StructuralError),

    #[error("{op} overflows a 64-bit value")]
    Overflow { op: Operator },
}

/// Failure while writing a tree back to bits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("version {0} does not fit in 3 bits")]
    VersionOutOfRange(u8),

    #[error("{count} children do not fit an 11-bit count")]
    TooManyChildren { count: usize },

    #[error("{bits} bits of children do not fit a 15-bit length")]
    ChildrenTooLong { bits: usize },
}

/// Failure while reading the text expression syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    #[error("Parse error: {0}")]
    Syntax(String),

    #[error("version {0} does not fit in 3 bits")]
    VersionOutOfRange(u8),

    #[error("literal {0} does not fit in 64 bits")]
    LiteralOutOfRange(String),

    #[error("expression nests deeper than {limit} packets")]
    DepthLimitExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
