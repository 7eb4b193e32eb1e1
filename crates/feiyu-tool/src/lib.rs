//! Command-line front end for the Feiyu gimbal protocol.
//!
//! A thin shell over [`feiyu_proto`]: `encode` builds one frame and prints it
//! as hex, `decode` streams a capture through a
//! [`StreamDecoder`](feiyu_proto::StreamDecoder) the way a serial port would
//! deliver it. The serial port itself is out of scope; captures come from a
//! file or stdin.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;

use std::{fs::File, io::Write};

pub use cli::{Cli, Command, DecodeArgs, EncodeArgs, FramingArg};
pub use error::{Result, ToolError};

/// Execute a parsed command line, writing results to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Encode(args) => commands::encode(args, out),
        Command::Decode(args) => {
            match &args.input {
                Some(path) => commands::decode(args, &mut File::open(path)?, out)?,
                None => commands::decode(args, &mut std::io::stdin().lock(), out)?,
            };
            Ok(())
        },
    }
}
