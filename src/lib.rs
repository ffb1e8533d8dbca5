//! # bitpacket — decoder and evaluator for bit-packed packet expressions
//!
//! A message is one line of hex. Its bits form a single root packet; packets
//! nest, and the tree reads as an arithmetic/logic expression.
//!
//! ## Wire format
//!
//! Every packet starts with a 3-bit version and a 3-bit type id, MSB-first and
//! with no byte alignment.
//!
//! - **Literal** (type id 4): 5-bit groups, a continuation bit then a nibble,
//!   until a group whose continuation bit is 0.
//! - **Operator** (any other type id): a 1-bit length type, then either a
//!   15-bit total length of the children in bits, or an 11-bit child count.
//!
//! | Type id | Operator |
//! |---------|----------|
//! | 0 | sum |
//! | 1 | product |
//! | 2 | minimum |
//! | 3 | maximum |
//! | 5 | greater than (two operands) |
//! | 6 | less than (two operands) |
//! | 7 | equal to (two operands) |
//!
//! ## Usage
//!
//! ```
//! use bitpacket::{evaluate, sum_versions, Decoder};
//!
//! let packet = Decoder::default().decode_hex("9C0141080250320F1802104A08\n").unwrap();
//! assert_eq!(evaluate(&packet).unwrap(), 1);
//! assert_eq!(packet.to_string(), "v4:eq(v2:sum(v2:1, v4:3), v6:product(v0:2, v2:2))");
//! assert_eq!(sum_versions(&packet), 20);
//! ```
//!
//! Trees can also be written as text with [`expr::parse`] and encoded with
//! [`encode::encode_hex`].

pub mod bits;
pub mod decode;
pub mod dump;
pub mod encode;
pub mod error;
pub mod eval;
pub mod expr;
pub mod header;
pub mod input;
pub mod packet;

pub use decode::{decode, decode_message, DecodeOptions, Decoder, DEFAULT_MAX_DEPTH};
pub use encode::{encode, encode_hex};
pub use error::{DecodeError, EncodeError, EvalError, ExprError, StructuralError};
pub use eval::{evaluate, sum_versions};
pub use header::{read_header, Header};
pub use packet::{LengthType, Operator, Packet};
