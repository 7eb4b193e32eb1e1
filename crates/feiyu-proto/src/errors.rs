//! Error types for the Feiyu wire codec.

use thiserror::Error;

/// Errors raised while building or decoding frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    // Construction errors
    /// Marker is not one of the registered framings
    #[error("unknown framing type {0:#06x}")]
    UnknownFraming(u16),

    /// Payload does not fit in the framing's length field
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size
        size: usize,
        /// Largest length the framing can express
        max: usize,
    },

    // Stream errors
    /// Trailing CRC does not match the frame contents
    ///
    /// Recoverable: the decoder has already dropped the frame and moves on.
    #[error("CRC mismatch on {marker:#06x} frame: received {received:#06x}, computed {computed:#06x}")]
    CrcMismatch {
        /// Framing marker of the rejected frame
        marker: u16,
        /// CRC carried on the wire
        received: u16,
        /// CRC computed over the received header and payload
        computed: u16,
    },
}

/// Convenient Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
