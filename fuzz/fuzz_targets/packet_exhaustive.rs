//! Exhaustive positive space fuzzer for packet encoding/decoding
//!
//! Unlike random stream fuzzing (stream_decode.rs), this fuzzer walks every
//! combination of:
//! - Both framings
//! - Edge-case target and command values
//! - Payload sizes at and around the length field boundaries
//!
//! Each combination must round-trip through a fresh decoder.

#![no_main]

use feiyu_proto::{Framing, Packet, StreamDecoder};
use libfuzzer_sys::fuzz_target;

const FRAMINGS: &[Framing] = &[Framing::Short, Framing::Long];

// Edge-case values for the 8-bit header fields
const U8_EDGES: &[u8] = &[0x00, 0x01, 0x0d, 0x30, 0x55, 0x5a, 0xa5, 0xaa, 0xfe, 0xff];

// Payload sizes to test
const PAYLOAD_SIZES: &[usize] = &[
    0,     // Empty
    1,     // Single byte
    2,     // Typical control payload
    254,   // Just under short max
    255,   // Short max
    256,   // Long form only
    65535, // Long max
];

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    let framing = FRAMINGS[data[0] as usize % FRAMINGS.len()];
    let target = U8_EDGES[data[1] as usize % U8_EDGES.len()];
    let command = U8_EDGES[data[2] as usize % U8_EDGES.len()];
    let size = PAYLOAD_SIZES[data[3] as usize % PAYLOAD_SIZES.len()];
    let fill = data[4];

    let result = Packet::from_marker(framing.marker(), target, command, vec![fill; size]);
    let Ok(packet) = result else {
        assert!(size > framing.format().max_payload(), "valid size rejected");
        return;
    };

    let wire = packet.encode();
    assert_eq!(wire.len(), packet.encoded_len());

    let decoded: Vec<_> = StreamDecoder::new().feed(&wire).collect();
    assert_eq!(decoded, vec![packet]);
});
