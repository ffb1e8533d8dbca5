//! Text syntax tests: parse, print, encode and evaluate expressions written by hand.

use bitpacket::expr::parse;
use bitpacket::{decode_message, encode_hex, evaluate, sum_versions, ExprError, LengthType, Operator, Packet};

#[test]
fn parse_every_operator_name() {
    for op in Operator::ALL {
        let src = format!("{}(1, 2)", op.name());
        let p = parse(&src).expect("parse");
        assert_eq!(p, Packet::operator(0, op, vec![Packet::literal(0, 1), Packet::literal(0, 2)]));
    }
}

#[test]
fn parse_with_whitespace_and_newlines() {
    let src = "
v4:eq(
    v2:sum(v2:1, v4:3),
    v6:product(2, v2:2)
)
";
    let p = parse(src).expect("parse");
    assert_eq!(sum_versions(&p), 20);
    assert_eq!(evaluate(&p).unwrap(), 1);
}

#[test]
fn printed_sample_matches_reference_hex() {
    let p = parse("v6:sum(v6:1, v2:2)").expect("parse");
    assert_eq!(encode_hex(&p, LengthType::BitLength).unwrap(), "C200B40A82");

    let p = parse("v0:product(v5:6, v3:9)").expect("parse");
    assert_eq!(encode_hex(&p, LengthType::BitLength).unwrap(), "04005AC33890");
}

#[test]
fn decoded_tree_prints_and_parses_back() {
    let bytes = hex::decode("A0016C880162017C3686B18A3D4780").unwrap();
    let p = decode_message(&bytes).unwrap();
    let text = p.to_string();
    assert_eq!(text, "v5:sum(v1:sum(v3:sum(v7:6, v6:6, v5:12, v2:15, v2:15)))");
    assert_eq!(parse(&text).unwrap(), p);
}

#[test]
fn expression_to_hex_and_back() {
    let p = parse("max(min(3, 9), gt(10, 2), product(4, 5, 6))").expect("parse");
    assert_eq!(evaluate(&p).unwrap(), 120);
    for length_type in [LengthType::BitLength, LengthType::Count] {
        let line = encode_hex(&p, length_type).unwrap();
        let decoded = bitpacket::Decoder::default().decode_hex(&line).unwrap();
        assert_eq!(decoded, p);
    }
}

#[test]
fn syntax_errors_carry_the_location() {
    match parse("sum(1 2)") {
        Err(ExprError::Syntax(msg)) => assert!(msg.contains("1:"), "unexpected message: {}", msg),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn version_nine_is_out_of_range() {
    assert_eq!(parse("sum(v9:1)"), Err(ExprError::VersionOutOfRange(9)));
}

fn nested_sums(depth: usize) -> Packet {
    let mut p = Packet::literal(2, 9);
    for _ in 1..depth {
        p = Packet::operator(3, Operator::Sum, vec![p]);
    }
    p
}

#[test]
fn deepest_accepted_tree_prints_and_parses_back() {
    let p = nested_sums(bitpacket::DEFAULT_MAX_DEPTH);
    let bytes = bitpacket::encode(&p, LengthType::Count).expect("encode");
    let decoded = decode_message(&bytes).expect("decode");
    assert_eq!(parse(&decoded.to_string()).expect("parse"), p);
}

#[test]
fn expression_nested_past_the_limit_is_rejected() {
    let text = nested_sums(bitpacket::DEFAULT_MAX_DEPTH + 1).to_string();
    assert_eq!(
        parse(&text),
        Err(ExprError::DepthLimitExceeded { limit: bitpacket::DEFAULT_MAX_DEPTH })
    );
}
