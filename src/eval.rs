//! Tree walks over a decoded packet: version sum and expression value.

use crate::error::{EvalError, StructuralError};
use crate::packet::{Operator, Packet};

/// Sum of the header versions of `packet` and every packet below it.
pub fn sum_versions(packet: &Packet) -> u64 {
    packet.version() as u64 + packet.children().iter().map(sum_versions).sum::<u64>()
}

/// Evaluate the expression rooted at `packet`.
///
/// Relational operators need exactly two operands, all others at least one.
/// Sum and Product fail with [`EvalError::Overflow`] instead of wrapping.
pub fn evaluate(packet: &Packet) -> Result<u64, EvalError> {
    let (op, children) = match packet {
        Packet::Literal { value, .. } => return Ok(*value),
        Packet::Operator { op, children, .. } => (*op, children.as_slice()),
    };

    if op.is_relational() {
        let [lhs, rhs] = children else {
            return Err(StructuralError::RelationalArity {
                op,
                children: children.len(),
            }
            .into());
        };
        let (lhs, rhs) = (evaluate(lhs)?, evaluate(rhs)?);
        let holds = match op {
            Operator::Greater => lhs > rhs,
            Operator::Lesser => lhs < rhs,
            _ => lhs == rhs,
        };
        return Ok(holds as u64);
    }

    if children.is_empty() {
        return Err(StructuralError::EmptyOperands { op }.into());
    }
    let mut values = children.iter().map(evaluate);
    let first = values.next().unwrap_or(Ok(0))?;
    values.try_fold(first, |acc, v| {
        let v = v?;
        match op {
            Operator::Sum => acc.checked_add(v).ok_or(EvalError::Overflow { op }),
            Operator::Product => acc.checked_mul(v).ok_or(EvalError::Overflow { op }),
            Operator::Minimum => Ok(acc.min(v)),
            _ => Ok(acc.max(v)),
        }
    })
}
