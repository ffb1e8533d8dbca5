//! Parse the text form of a packet tree using PEST.
//!
//! ```text
//! v6:sum(v4:1, 2)        sum of two literals, root version 6
//! eq(sum(1, 3), product(2, 2))
//! ```
//!
//! This is the syntax `Display for Packet` writes, so any printed tree no
//! deeper than [`DEFAULT_MAX_DEPTH`] parses back to an equal tree. Deeper
//! input is rejected before the grammar runs.

use crate::decode::DEFAULT_MAX_DEPTH;
use crate::error::ExprError;
use crate::packet::{Operator, Packet};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "expr.pest"]
struct ExprParser;

/// Parse one packet expression.
pub fn parse(source: &str) -> Result<Packet, ExprError> {
    check_nesting(source, DEFAULT_MAX_DEPTH)?;
    let pairs = ExprParser::parse(Rule::expr, source).map_err(|e| ExprError::Syntax(e.to_string()))?;
    let expr = pairs
        .into_iter()
        .next()
        .ok_or_else(|| ExprError::Syntax("empty expression".to_string()))?;
    let packet = expr
        .into_inner()
        .find(|p| p.as_rule() == Rule::packet)
        .ok_or_else(|| ExprError::Syntax("missing packet".to_string()))?;
    build_packet(packet)
}

// Each open parenthesis adds one level below the packet that owns it.
fn check_nesting(source: &str, limit: usize) -> Result<(), ExprError> {
    let mut open = 0usize;
    for b in source.bytes() {
        match b {
            b'(' => {
                open += 1;
                if open >= limit {
                    return Err(ExprError::DepthLimitExceeded { limit });
                }
            }
            b')' => open = open.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn build_packet(pair: Pair<Rule>) -> Result<Packet, ExprError> {
    let mut version = 0u8;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::version => version = parse_version(inner.as_str())?,
            Rule::literal => return Ok(Packet::literal(version, parse_literal(inner.as_str())?)),
            Rule::operator => return build_operator(inner, version),
            _ => {}
        }
    }
    Err(ExprError::Syntax("packet: missing literal or operator".to_string()))
}

fn build_operator(pair: Pair<Rule>, version: u8) -> Result<Packet, ExprError> {
    let mut op = None;
    let mut children = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::op_name => op = Operator::from_name(inner.as_str()),
            Rule::packet => children.push(build_packet(inner)?),
            _ => {}
        }
    }
    let op = op.ok_or_else(|| ExprError::Syntax("operator: missing name".to_string()))?;
    Ok(Packet::operator(version, op, children))
}

// "v6:" -> 6
fn parse_version(s: &str) -> Result<u8, ExprError> {
    let digit = s
        .trim_start_matches('v')
        .trim_end_matches(':')
        .parse::<u8>()
        .map_err(|e| ExprError::Syntax(format!("version {}: {}", s, e)))?;
    if digit > 7 {
        return Err(ExprError::VersionOutOfRange(digit));
    }
    Ok(digit)
}

fn parse_literal(s: &str) -> Result<u64, ExprError> {
    s.parse::<u64>()
        .map_err(|_| ExprError::LiteralOutOfRange(s.to_string()))
}
