//! End-to-end tests for the tool's library entry point.
//!
//! Captures are written to temporary files and run through [`run`] exactly as
//! the binary would after argument parsing.

use std::io::Write;

use clap::Parser;
use feiyu_proto::{LONG_FORM, Packet};
use feiyu_tool::{Cli, run};
use tempfile::NamedTempFile;

fn run_args(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).expect("valid arguments");
    let mut out = Vec::new();
    run(&cli, &mut out).expect("run should succeed");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn decode_raw_capture_file() {
    let firmware_query =
        Packet::from_marker(LONG_FORM, 0x00, 0x00, Vec::<u8>::new()).expect("valid packet");
    let control = Packet::new(0x01).with_payload(vec![0x05, 0x00]).expect("valid packet");

    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&[0x00, 0x13]).expect("write noise");
    file.write_all(&firmware_query.encode()).expect("write frame");
    file.write_all(&control.encode()).expect("write frame");
    file.flush().expect("flush");

    let path = file.path().to_str().expect("utf-8 path");
    let output = run_args(&["feiyu-tool", "decode", "--input", path, "--chunk", "3"]);

    assert_eq!(
        output,
        "<Pkt-AA55 t=00 cmd=00 []>\n\
         <Pkt-5AA5 t=00 cmd=01 [0500]>\n\
         packets=2 crc_errors=0 skipped_bytes=2 buffered=0\n"
    );
}

#[test]
fn decode_hex_capture_with_corrupt_frame() {
    let mut file = NamedTempFile::new().expect("temp file");
    // Second frame has its CRC damaged
    writeln!(file, "a55a000102050021e7").expect("write");
    writeln!(file, "a55a000102050021e8").expect("write");
    writeln!(file, "a55a000500f5ff").expect("write");
    file.flush().expect("flush");

    let path = file.path().to_str().expect("utf-8 path");
    let output = run_args(&["feiyu-tool", "decode", "--hex", "--input", path]);

    assert_eq!(
        output,
        "<Pkt-5AA5 t=00 cmd=01 [0500]>\n\
         <Pkt-5AA5 t=00 cmd=05 []>\n\
         packets=2 crc_errors=1 skipped_bytes=0 buffered=0\n"
    );
}

#[test]
fn encode_then_decode_round_trip() {
    let encoded = run_args(&[
        "feiyu-tool", "encode", "--framing", "long", "--target", "2", "--command", "0x0b",
        "--payload", "deadbeef",
    ]);
    assert_eq!(encoded.len(), 2 * 12 + 1);

    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(encoded.as_bytes()).expect("write");
    file.flush().expect("flush");

    let path = file.path().to_str().expect("utf-8 path");
    let output = run_args(&["feiyu-tool", "decode", "--hex", "--input", path]);

    assert!(output.starts_with("<Pkt-AA55 t=02 cmd=0b [deadbeef]>\n"));
}

#[test]
fn missing_input_file_is_an_error() {
    let cli = Cli::try_parse_from(["feiyu-tool", "decode", "--input", "/nonexistent/capture.bin"])
        .expect("valid arguments");
    let result = run(&cli, &mut Vec::new());
    assert!(matches!(result, Err(feiyu_tool::ToolError::Io(_))));
}
