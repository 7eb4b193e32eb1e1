//! Snapshot tests for wire format stability.
//!
//! The gimbal firmware is fixed, so the encoding must stay bit-exact. Each
//! snapshot is the hex of one encoded frame; a failing snapshot means the
//! codec no longer talks to real hardware.

use feiyu_proto::{Framing, LONG_FORM, Packet, SHORT_FORM, StreamDecoder};
use insta::assert_snapshot;

/// Helper to encode a packet to a hex string for snapshot
fn packet_to_hex(packet: &Packet) -> String {
    hex::encode(packet.encode())
}

/// Decode a complete wire buffer with a fresh decoder
fn decode_all(wire: &[u8]) -> Vec<Packet> {
    StreamDecoder::new().feed(wire).collect()
}

// =============================================================================
// Short form
// =============================================================================

#[test]
fn snapshot_short_form_with_payload() {
    let packet = Packet::new(0x01).with_payload(vec![0x05, 0x00]).expect("payload fits");

    assert_snapshot!(packet_to_hex(&packet), @"a55a000102050021e7");
}

#[test]
fn snapshot_short_form_single_byte_payload() {
    let packet =
        Packet::from_marker(SHORT_FORM, 0x01, 0x03, vec![0x01]).expect("packet creation should succeed");

    assert_snapshot!(packet_to_hex(&packet), @"a55a01030101f40c");
}

#[test]
fn snapshot_short_form_empty_payload() {
    let packet = Packet::new(0x05);

    assert_snapshot!(packet_to_hex(&packet), @"a55a000500f5ff");
}

#[test]
fn snapshot_short_form_to_second_target() {
    let packet = Packet::new(0x08)
        .with_target(0x02)
        .with_payload(vec![0x2a, 0x00, 0x10, 0x27])
        .expect("payload fits");

    assert_snapshot!(packet_to_hex(&packet), @"a55a0208042a001027b4ec");
}

// =============================================================================
// Long form
// =============================================================================

#[test]
fn snapshot_long_form_empty_payload() {
    let packet = Packet::from_marker(LONG_FORM, 0x00, 0x00, Vec::<u8>::new())
        .expect("packet creation should succeed");

    assert_snapshot!(packet_to_hex(&packet), @"55aa00000000c084");
}

#[test]
fn snapshot_long_form_with_payload() {
    let payload: Vec<u8> = (0..16).collect();
    let packet =
        Packet::from_marker(LONG_FORM, 0x02, 0x00, payload).expect("packet creation should succeed");

    assert_snapshot!(
        packet_to_hex(&packet),
        @"55aa02001000000102030405060708090a0b0c0d0e0f1c3e"
    );
}

#[test]
fn snapshot_long_form_all_ones() {
    let packet = Packet::from_marker(LONG_FORM, 0xff, 0xff, vec![0xff; 4])
        .expect("packet creation should succeed");

    assert_snapshot!(packet_to_hex(&packet), @"55aaffff0400ffffffff6e9f");
}

// =============================================================================
// Length field boundaries
// =============================================================================

#[test]
fn short_form_max_payload() {
    let packet = Packet::new(0x00).with_payload(vec![0u8; 255]).expect("255 bytes fit");
    let wire = packet.encode();

    assert_eq!(wire.len(), 262);
    assert_eq!(&wire[..5], [0xa5, 0x5a, 0x00, 0x00, 0xff]);
    assert_snapshot!(hex::encode(&wire[wire.len() - 4..]), @"0000a9c0");

    assert_eq!(decode_all(&wire), vec![packet]);
}

#[test]
fn long_form_max_payload() {
    let packet = Packet::from_marker(LONG_FORM, 0x00, 0x00, vec![0u8; 65535])
        .expect("65535 bytes fit");
    let wire = packet.encode();

    assert_eq!(wire.len(), 65535 + 8);
    assert_snapshot!(hex::encode(&wire[..6]), @"55aa0000ffff");
    assert_snapshot!(hex::encode(&wire[wire.len() - 2..]), @"90dd");

    assert_eq!(decode_all(&wire), vec![packet]);
}

#[test]
fn long_form_carries_more_than_short_form() {
    let packet = Packet::from_marker(LONG_FORM, 0x00, 0x00, vec![0x11; 256])
        .expect("long form takes 256 bytes");

    assert!(packet.clone().with_framing(Framing::Short).is_err());
    assert_eq!(decode_all(&packet.encode()), vec![packet]);
}

#[test]
fn short_form_vector_decodes() {
    let wire = hex::decode("a55a000102050021e7").expect("valid hex");
    let packets = decode_all(&wire);

    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].framing(), Framing::Short);
    assert_eq!(packets[0].target(), 0x00);
    assert_eq!(packets[0].command(), 0x01);
    assert_eq!(packets[0].payload().as_ref(), [0x05, 0x00]);
}
