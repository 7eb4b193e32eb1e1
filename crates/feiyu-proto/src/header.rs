//! Header region with zero-copy parsing.
//!
//! The header sits between the marker and the payload:
//! `target(1) | command(1) | length(1 or 2)`. Its size depends on the framing,
//! so each framing gets its own unaligned `zerocopy` layout and [`Header`]
//! gives both a common shape.

use bytes::BufMut;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::little_endian::U16,
};

use crate::format::Framing;

/// Short-form header (3 bytes)
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
struct ShortHeader {
    target: u8,
    command: u8,
    length: u8,
}

/// Long-form header (4 bytes, little-endian length)
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
struct LongHeader {
    target: u8,
    command: u8,
    length: U16,
}

/// Parsed header fields, independent of framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Recipient sub-device address
    pub target: u8,
    /// Operation code
    pub command: u8,
    /// Declared payload length
    pub length: u16,
}

impl Header {
    /// Parse the header for `framing` from the front of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than the framing's header. Every
    /// bit pattern is a valid header; the length is only checked against what
    /// is buffered later.
    pub fn parse(framing: Framing, bytes: &[u8]) -> Option<Self> {
        match framing {
            Framing::Short => {
                let (raw, _) = ShortHeader::ref_from_prefix(bytes).ok()?;
                Some(Self { target: raw.target, command: raw.command, length: raw.length.into() })
            },
            Framing::Long => {
                let (raw, _) = LongHeader::ref_from_prefix(bytes).ok()?;
                Some(Self { target: raw.target, command: raw.command, length: raw.length.get() })
            },
        }
    }

    /// Write the header for `framing` into `dst`.
    ///
    /// The caller guarantees `length` fits the framing's length field; the
    /// short form keeps only the low byte.
    pub fn write(&self, framing: Framing, dst: &mut impl BufMut) {
        match framing {
            Framing::Short => {
                let raw = ShortHeader {
                    target: self.target,
                    command: self.command,
                    length: self.length as u8,
                };
                dst.put_slice(raw.as_bytes());
            },
            Framing::Long => {
                let raw = LongHeader {
                    target: self.target,
                    command: self.command,
                    length: U16::new(self.length),
                };
                dst.put_slice(raw.as_bytes());
            },
        }
    }
}
