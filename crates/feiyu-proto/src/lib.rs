//! Wire format for the Feiyu gimbal serial protocol.
//!
//! The gimbal's microcontrollers exchange small binary frames:
//!
//! ```text
//! marker(2) | target(1) | command(1) | length(1 or 2) | payload(length) | crc16(2)
//! ```
//!
//! All multi-byte integers are little-endian. The marker selects one of two
//! framings, which fix the width of the length field and the seed of the
//! CRC-16 that protects `target..payload`.
//!
//! This crate only knows about structure. It never interprets command codes or
//! payload contents, performs no I/O, and keeps no state beyond the receive
//! buffer owned by [`StreamDecoder`].
//!
//! # Components
//!
//! - [`format`]: the two recognized framings and their parameters
//! - [`mod@crc`]: the hqx CRC-16 used by both framings
//! - [`header`]: zero-copy views of the fixed-size header region
//! - [`packet`]: the logical [`Packet`] value and its serializer
//! - [`decoder`]: streaming, resynchronizing [`StreamDecoder`]
//! - [`errors`]: error types
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crc;
pub mod decoder;
pub mod errors;
pub mod format;
pub mod header;
pub mod packet;

pub use decoder::{Decoded, DecoderStats, Packets, StreamDecoder};
pub use errors::{ProtocolError, Result};
pub use format::{FrameFormat, Framing, LONG_FORM, SHORT_FORM};
pub use packet::Packet;
