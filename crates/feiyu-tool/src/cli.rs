//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use feiyu_proto::Framing;

/// Encode and decode Feiyu gimbal protocol frames.
#[derive(Debug, Parser)]
#[command(name = "feiyu-tool", version, about)]
pub struct Cli {
    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build one frame and print it as hex
    Encode(EncodeArgs),
    /// Decode a byte stream and print every packet found
    Decode(DecodeArgs),
}

/// Arguments for `encode`.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Frame layout
    #[arg(long, value_enum, default_value_t = FramingArg::Short)]
    pub framing: FramingArg,

    /// Target sub-device address (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0", value_parser = parse_byte)]
    pub target: u8,

    /// Command code (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_byte)]
    pub command: u8,

    /// Payload as hex
    #[arg(long, default_value = "")]
    pub payload: String,
}

/// Arguments for `decode`.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Read from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Input is hex text rather than raw bytes
    #[arg(long)]
    pub hex: bool,

    /// Bytes handed to the decoder per read
    #[arg(long, default_value_t = 64)]
    pub chunk: usize,
}

/// Framing choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// 0x5AA5, up to 255 payload bytes
    Short,
    /// 0xAA55, up to 65535 payload bytes
    Long,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Short => Self::Short,
            FramingArg::Long => Self::Long,
        }
    }
}

/// Parse a byte given as decimal or `0x` hex.
pub fn parse_byte(input: &str) -> Result<u8, String> {
    let input = input.trim();
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => input.parse(),
    };
    parsed.map_err(|e| format!("invalid byte {input:?}: {e}"))
}
