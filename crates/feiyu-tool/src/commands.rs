//! Subcommand implementations.
//!
//! Both commands write plain text to the given sink so tests can capture it.

use std::io::{Read, Write};

use feiyu_proto::{DecoderStats, Framing, Packet, StreamDecoder};

use crate::{
    cli::{DecodeArgs, EncodeArgs},
    error::{Result, ToolError},
};

/// Build the requested packet and write its wire bytes as one hex line.
pub fn encode(args: &EncodeArgs, out: &mut impl Write) -> Result<()> {
    let payload = hex::decode(strip_whitespace(&args.payload))?;
    let framing = Framing::from(args.framing);

    let packet = Packet::from_marker(framing.marker(), args.target, args.command, payload)?;
    tracing::debug!(%packet, "Encoding");

    writeln!(out, "{}", hex::encode(packet.encode()))?;
    Ok(())
}

/// Stream `input` through a decoder in `args.chunk`-sized reads.
///
/// Prints one line per decoded packet followed by a summary line, and returns
/// the final decoder counters.
pub fn decode(args: &DecodeArgs, input: &mut impl Read, out: &mut impl Write) -> Result<DecoderStats> {
    if args.chunk == 0 {
        return Err(ToolError::ZeroChunk);
    }

    let mut decoder = StreamDecoder::new();

    if args.hex {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        let bytes = hex::decode(strip_whitespace(&text))?;
        for chunk in bytes.chunks(args.chunk) {
            print_packets(&mut decoder, chunk, out)?;
        }
    } else {
        let mut buf = vec![0u8; args.chunk];
        loop {
            let read = input.read(&mut buf)?;
            if read == 0 {
                break;
            }
            print_packets(&mut decoder, &buf[..read], out)?;
        }
    }

    let stats = decoder.stats();
    writeln!(
        out,
        "packets={} crc_errors={} skipped_bytes={} buffered={}",
        stats.packets,
        stats.crc_errors,
        stats.skipped_bytes,
        decoder.buffered()
    )?;

    if decoder.buffered() > 0 {
        tracing::info!(buffered = decoder.buffered(), "Input ended inside a frame");
    }

    Ok(stats)
}

fn print_packets(decoder: &mut StreamDecoder, chunk: &[u8], out: &mut impl Write) -> Result<()> {
    for packet in decoder.feed(chunk) {
        writeln!(out, "{packet}")?;
    }
    Ok(())
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FramingArg;

    fn encode_to_string(args: &EncodeArgs) -> Result<String> {
        let mut out = Vec::new();
        encode(args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn encode_short_form() {
        let args = EncodeArgs {
            framing: FramingArg::Short,
            target: 0,
            command: 1,
            payload: "05 00".to_string(),
        };
        assert_eq!(encode_to_string(&args).unwrap(), "a55a000102050021e7\n");
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let args = EncodeArgs {
            framing: FramingArg::Short,
            target: 0,
            command: 0,
            payload: "00".repeat(256),
        };
        assert!(matches!(
            encode_to_string(&args),
            Err(ToolError::Protocol(feiyu_proto::ProtocolError::PayloadTooLarge { .. }))
        ));
    }

    #[test]
    fn encode_rejects_bad_hex() {
        let args = EncodeArgs {
            framing: FramingArg::Long,
            target: 0,
            command: 0,
            payload: "0g".to_string(),
        };
        assert!(matches!(encode_to_string(&args), Err(ToolError::Hex(_))));
    }

    #[test]
    fn decode_hex_input_in_small_chunks() {
        let args = DecodeArgs { input: None, hex: true, chunk: 2 };
        let mut input = "ff ff a55a000102050021e7 00".as_bytes();
        let mut out = Vec::new();

        let stats = decode(&args, &mut input, &mut out).unwrap();

        assert_eq!(stats.packets, 1);
        assert_eq!(stats.skipped_bytes, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<Pkt-5AA5 t=00 cmd=01 [0500]>\npackets=1 crc_errors=0 skipped_bytes=2 buffered=1\n"
        );
    }

    #[test]
    fn decode_rejects_zero_chunk() {
        let args = DecodeArgs { input: None, hex: false, chunk: 0 };
        let result = decode(&args, &mut "".as_bytes(), &mut Vec::new());
        assert!(matches!(result, Err(ToolError::ZeroChunk)));
    }
}
