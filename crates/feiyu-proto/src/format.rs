//! Framing registry.
//!
//! Every frame starts with a 2-byte little-endian marker. Only two markers are
//! recognized; each one fixes the width of the length field and the CRC seed.
//!
//! | Marker   | Framing | Length field | CRC seed |
//! |----------|---------|--------------|----------|
//! | `0xAA55` | long    | u16          | `0xFFFF` |
//! | `0x5AA5` | short   | u8           | `0x0000` |

use std::fmt;

use crate::{
    crc,
    errors::{ProtocolError, Result},
};

/// Marker of the long form (16-bit length field)
pub const LONG_FORM: u16 = 0xAA55;

/// Marker of the short form (8-bit length field)
pub const SHORT_FORM: u16 = 0x5AA5;

/// Size of the marker on the wire
pub const MARKER_SIZE: usize = 2;

/// Size of the trailing CRC on the wire
pub const CRC_SIZE: usize = 2;

/// Structural parameters of one framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    /// Marker value identifying the framing
    pub marker: u16,
    /// Width of the payload length field in bytes (1 or 2)
    pub length_width: usize,
    /// Initial CRC register value
    pub crc_seed: u16,
}

static FORMATS: [FrameFormat; 2] = [
    FrameFormat { marker: LONG_FORM, length_width: 2, crc_seed: 0xFFFF },
    FrameFormat { marker: SHORT_FORM, length_width: 1, crc_seed: 0x0000 },
];

/// Look up the format parameters registered for `marker`.
pub fn lookup(marker: u16) -> Option<&'static FrameFormat> {
    FORMATS.iter().find(|format| format.marker == marker)
}

impl FrameFormat {
    /// Header size after the marker: target, command and length field.
    pub const fn header_len(&self) -> usize {
        2 + self.length_width
    }

    /// Largest payload the length field can describe.
    pub const fn max_payload(&self) -> usize {
        if self.length_width == 1 { u8::MAX as usize } else { u16::MAX as usize }
    }

    /// Wire size of a frame carrying `payload_len` bytes.
    pub const fn frame_len(&self, payload_len: usize) -> usize {
        MARKER_SIZE + self.header_len() + payload_len + CRC_SIZE
    }

    /// CRC over the header and payload, seeded for this framing.
    pub fn checksum(&self, header: &[u8], payload: &[u8]) -> u16 {
        crc::crc16_parts(self.crc_seed, &[header, payload])
    }
}

/// The two recognized framings.
///
/// Short form is the everyday command framing; long form carries larger
/// transfers such as firmware identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Framing {
    /// `0xAA55`, 16-bit length, CRC seed `0xFFFF`
    Long,
    /// `0x5AA5`, 8-bit length, CRC seed `0x0000`
    #[default]
    Short,
}

impl Framing {
    /// Resolve a marker, or `None` if it is not registered.
    pub fn from_marker(marker: u16) -> Option<Self> {
        match marker {
            LONG_FORM => Some(Self::Long),
            SHORT_FORM => Some(Self::Short),
            _ => None,
        }
    }

    /// Marker value written at the start of each frame.
    pub const fn marker(self) -> u16 {
        match self {
            Self::Long => LONG_FORM,
            Self::Short => SHORT_FORM,
        }
    }

    /// Format parameters for this framing.
    pub fn format(self) -> &'static FrameFormat {
        match self {
            Self::Long => &FORMATS[0],
            Self::Short => &FORMATS[1],
        }
    }
}

impl TryFrom<u16> for Framing {
    type Error = ProtocolError;

    fn try_from(marker: u16) -> Result<Self> {
        Self::from_marker(marker).ok_or(ProtocolError::UnknownFraming(marker))
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_exactly_two_entries() {
        let long = lookup(0xAA55).unwrap();
        assert_eq!(long.length_width, 2);
        assert_eq!(long.crc_seed, 0xFFFF);
        assert_eq!(long.max_payload(), 65535);

        let short = lookup(0x5AA5).unwrap();
        assert_eq!(short.length_width, 1);
        assert_eq!(short.crc_seed, 0x0000);
        assert_eq!(short.max_payload(), 255);

        assert!(lookup(0x55AA).is_none());
        assert!(lookup(0xA55A).is_none());
        assert!(lookup(0x0000).is_none());
    }

    #[test]
    fn framing_and_registry_agree() {
        for framing in [Framing::Long, Framing::Short] {
            assert_eq!(lookup(framing.marker()), Some(framing.format()));
            assert_eq!(Framing::from_marker(framing.marker()), Some(framing));
        }
    }

    #[test]
    fn try_from_rejects_unknown_marker() {
        assert_eq!(Framing::try_from(0x1234), Err(ProtocolError::UnknownFraming(0x1234)));
        assert_eq!(Framing::try_from(0xAA55), Ok(Framing::Long));
    }

    #[test]
    fn frame_len_accounts_for_marker_header_and_crc() {
        assert_eq!(Framing::Short.format().frame_len(0), 7);
        assert_eq!(Framing::Long.format().frame_len(0), 8);
        assert_eq!(Framing::Short.format().frame_len(2), 9);
    }

    #[test]
    fn display_is_upper_hex_marker() {
        assert_eq!(Framing::Short.to_string(), "5AA5");
        assert_eq!(Framing::Long.to_string(), "AA55");
    }
}
