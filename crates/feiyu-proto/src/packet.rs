//! Logical packet and its serializer.
//!
//! A `Packet` is what both directions of the codec agree on: callers build one
//! and [`Packet::encode`] it for the transport, and the
//! [`StreamDecoder`](crate::StreamDecoder) hands them back out of a byte
//! stream.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    errors::{ProtocolError, Result},
    format::Framing,
    header::Header,
};

/// One protocol message.
///
/// # Invariants
///
/// - **Registered Framing**: `framing` is always one of the recognized
///   framings. Raw markers go through [`Packet::from_marker`], which rejects
///   anything else with [`ProtocolError::UnknownFraming`].
///
/// - **Length Fits**: `payload.len()` never exceeds the framing's length field
///   maximum (255 short, 65535 long). Every constructor checks this, so
///   [`Packet::encode`] cannot fail and never truncates.
///
/// - **Immutable**: there are no setters. The `with_*` methods consume the
///   packet and return a new one.
///
/// The codec is blind to what `command` and `payload` mean.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    framing: Framing,
    target: u8,
    command: u8,
    payload: Bytes,
}

impl Packet {
    /// Short-form packet for `command`, addressed to target 0, no payload.
    pub fn new(command: u8) -> Self {
        Self { framing: Framing::Short, target: 0, command, payload: Bytes::new() }
    }

    /// Fully specified packet from a raw framing marker.
    pub fn from_marker(
        marker: u16,
        target: u8,
        command: u8,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        let framing = Framing::try_from(marker)?;
        Self::with_parts(framing, target, command, payload.into())
    }

    /// Same packet addressed to `target`.
    #[must_use]
    pub fn with_target(self, target: u8) -> Self {
        Self { target, ..self }
    }

    /// Same packet carrying `payload`.
    pub fn with_payload(self, payload: impl Into<Bytes>) -> Result<Self> {
        Self::with_parts(self.framing, self.target, self.command, payload.into())
    }

    /// Same packet using `framing`.
    ///
    /// Fails if the current payload does not fit the new framing.
    pub fn with_framing(self, framing: Framing) -> Result<Self> {
        Self::with_parts(framing, self.target, self.command, self.payload)
    }

    /// Build from already-validated parts. Used by the decoder, whose lengths
    /// come straight from the wire and always fit.
    pub(crate) fn from_wire(framing: Framing, target: u8, command: u8, payload: Bytes) -> Self {
        debug_assert!(payload.len() <= framing.format().max_payload());
        Self { framing, target, command, payload }
    }

    fn with_parts(framing: Framing, target: u8, command: u8, payload: Bytes) -> Result<Self> {
        let max = framing.format().max_payload();
        if payload.len() > max {
            return Err(ProtocolError::PayloadTooLarge { size: payload.len(), max });
        }

        Ok(Self { framing, target, command, payload })
    }

    /// Framing used on the wire
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Recipient sub-device address
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Operation code
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Opaque payload bytes
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Exact number of bytes [`Packet::encode`] produces.
    pub fn encoded_len(&self) -> usize {
        self.framing.format().frame_len(self.payload.len())
    }

    /// Serialize to wire bytes.
    ///
    /// Layout: `[marker:2][target:1][command:1][length:1|2][payload][crc:2]`,
    /// little-endian throughout.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Serialize into `dst`.
    pub fn encode_into(&self, dst: &mut impl BufMut) {
        let format = self.framing.format();

        let header = Header {
            target: self.target,
            command: self.command,
            length: self.payload.len() as u16,
        };
        // Longest header is 4 bytes (long form)
        let mut scratch = [0u8; 4];
        header.write(self.framing, &mut &mut scratch[..]);
        let header_bytes = &scratch[..format.header_len()];

        let crc = format.checksum(header_bytes, &self.payload);

        dst.put_u16_le(format.marker);
        dst.put_slice(header_bytes);
        dst.put_slice(&self.payload);
        dst.put_u16_le(crc);
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Pkt-{} t={:02x} cmd={:02x} [{}]>",
            self.framing,
            self.target,
            self.command,
            hex::encode(&self.payload)
        )
    }
}
