//! Decoder fuzz target: feed arbitrary bytes to the packet decoder.
//! Decoding and evaluation must not panic; they return Ok or a typed error.
//! Whatever decodes must survive a count-mode re-encode unchanged.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let packet = match bitpacket::decode_message(data) {
        Ok(p) => p,
        Err(_) => return,
    };
    let _ = bitpacket::sum_versions(&packet);
    let _ = bitpacket::evaluate(&packet);
    if let Ok(bytes) = bitpacket::encode(&packet, bitpacket::LengthType::Count) {
        let again = bitpacket::decode_message(&bytes).expect("re-encoded message decodes");
        assert_eq!(again, packet);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
