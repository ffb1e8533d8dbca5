//! Decode a hex-encoded packet message and print its version sum and value.
//!
//! Usage:
//!   packet_eval [OPTIONS] [FILE]
//!   packet_eval < input.txt
//!   packet_eval --encode 'eq(sum(1, 3), product(2, 2))'
//!
//! Options:
//!   --dump, -d          Print the decoded tree, one header field per line
//!   --expr, -e          Print the decoded tree as an expression
//!   --strict, -s        Reject non-zero bits after the root packet
//!   --encode EXPR       Encode an expression to hex instead of decoding
//!   --count-mode, -c    With --encode: declare children by count, not bit length
//!
//! Logging goes to stderr and is controlled by RUST_LOG (default: warn).

use anyhow::Context;
use bitpacket::dump::TreeDump;
use bitpacket::input::{read_hex, read_hex_file};
use bitpacket::{encode_hex, evaluate, expr, sum_versions, DecodeOptions, Decoder, LengthType};
use std::path::Path;
use tracing::info;

fn take_flag(args: &mut Vec<String>, long: &str, short: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == long || a == short) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_value(args: &mut Vec<String>, long: &str) -> anyhow::Result<Option<String>> {
    match args.iter().position(|a| a == long) {
        Some(pos) if pos + 1 < args.len() => {
            let value = args.remove(pos + 1);
            args.remove(pos);
            Ok(Some(value))
        }
        Some(_) => anyhow::bail!("{} needs a value", long),
        None => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let dump = take_flag(&mut args, "--dump", "-d");
    let show_expr = take_flag(&mut args, "--expr", "-e");
    let strict = take_flag(&mut args, "--strict", "-s");
    let count_mode = take_flag(&mut args, "--count-mode", "-c");
    let encode_src = take_value(&mut args, "--encode")?;

    if let Some(src) = encode_src {
        let packet = expr::parse(&src).context("parsing expression")?;
        let length_type = if count_mode { LengthType::Count } else { LengthType::BitLength };
        println!("{}", encode_hex(&packet, length_type)?);
        return Ok(());
    }

    let buf = match args.as_slice() {
        [] => read_hex(std::io::stdin().lock()).context("reading stdin")?,
        [path] => {
            let path = Path::new(path);
            read_hex_file(path).with_context(|| format!("reading {}", path.display()))?
        }
        _ => anyhow::bail!("expected at most one input file, got {}", args.len()),
    };
    info!(bytes = buf.len(), "input loaded");

    let decoder = Decoder::new(DecodeOptions {
        require_zero_padding: strict,
        ..Default::default()
    });
    let packet = decoder.decode_message(&buf).context("decoding message")?;

    if dump {
        print!("{}", TreeDump(&packet));
    }
    if show_expr {
        println!("{}", packet);
    }
    println!("Part 1: {}", sum_versions(&packet));
    println!("Part 2: {}", evaluate(&packet).context("evaluating packet")?);
    Ok(())
}
