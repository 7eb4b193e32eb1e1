//! Streaming frame decoder.
//!
//! Bytes arrive from the transport in arbitrary chunks. [`StreamDecoder`]
//! accumulates them and pulls complete, CRC-valid frames off the front of its
//! buffer.
//!
//! # Extraction
//!
//! ```text
//!            ┌─────────────────────┐
//!   feed ───>│ < 2 bytes buffered? │── yes ──> wait for more
//!            └─────────────────────┘
//!                      │ no
//!                      ↓
//!            ┌─────────────────────┐
//!            │ marker registered?  │── no ───> drop 1 byte, retry
//!            └─────────────────────┘
//!                      │ yes
//!                      ↓
//!            ┌─────────────────────┐
//!            │ whole frame there?  │── no ───> wait for more (nothing consumed)
//!            └─────────────────────┘
//!                      │ yes
//!                      ↓
//!            consume frame, check CRC ── bad ──> report, retry
//!                      │ ok
//!                      ↓
//!                yield Packet
//! ```
//!
//! # Resynchronization
//!
//! An unrecognized marker costs exactly one byte, so a real marker hidden
//! anywhere in line noise is found at byte granularity. Once a marker is
//! recognized the declared length is trusted for buffer accounting: a frame
//! that fails its CRC is consumed whole and is not rescanned.
//!
//! Partial frames stay buffered indefinitely. Detecting a stalled link is the
//! transport's job.

use bytes::{Buf, BytesMut};

use crate::{
    Packet,
    errors::{ProtocolError, Result},
    format::{CRC_SIZE, Framing, MARKER_SIZE},
    header::Header,
};

/// Initial receive buffer capacity. Grows on demand up to one long-form frame
/// plus whatever a single `feed` delivers.
const DEFAULT_CAPACITY: usize = 1024;

/// Running counters, for diagnostics only.
///
/// They never influence parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames that passed the CRC check and were yielded
    pub packets: u64,
    /// Frames dropped because of a CRC mismatch
    pub crc_errors: u64,
    /// Bytes discarded one at a time while hunting for a marker
    pub skipped_bytes: u64,
}

/// Resynchronizing decoder for a raw byte stream.
///
/// The receive buffer is the only state that matters for parsing. It persists
/// across [`StreamDecoder::feed`] calls, so frames split across chunks are
/// reassembled and no byte is lost or yielded twice.
///
/// `feed` takes `&mut self`; a transport with several producers has to
/// serialize its calls.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buffer: BytesMut,
    stats: DecoderStats,
}

impl StreamDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty decoder with a preallocated receive buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: BytesMut::with_capacity(capacity), stats: DecoderStats::default() }
    }

    /// Append `data` and iterate over the packets now available.
    ///
    /// CRC mismatches are logged, counted and skipped. The iterator is lazy:
    /// frames it does not reach stay buffered for the next call.
    pub fn feed(&mut self, data: &[u8]) -> Packets<'_> {
        Packets { inner: self.feed_checked(data) }
    }

    /// Like [`StreamDecoder::feed`], but CRC mismatches are yielded in-band as
    /// [`ProtocolError::CrcMismatch`] entries.
    ///
    /// An error entry never ends the iteration; later frames still follow.
    pub fn feed_checked(&mut self, data: &[u8]) -> Decoded<'_> {
        self.buffer.extend_from_slice(data);
        Decoded { decoder: self }
    }

    /// Bytes received but not yet resolved into a packet or discarded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Diagnostic counters since creation.
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Drop any buffered bytes, e.g. after the transport reconnects.
    pub fn clear(&mut self) {
        if !self.buffer.is_empty() {
            tracing::debug!(discarded = self.buffer.len(), "Clearing receive buffer");
        }
        self.buffer.clear();
    }

    /// One extraction attempt against the front of the buffer.
    ///
    /// Returns `None` when more bytes are needed. Never consumes part of a
    /// recognized frame: it either takes all of it or nothing.
    fn next_frame(&mut self) -> Option<Result<Packet>> {
        loop {
            if self.buffer.len() < MARKER_SIZE {
                return None;
            }

            let marker = u16::from_le_bytes([self.buffer[0], self.buffer[1]]);
            let Some(framing) = Framing::from_marker(marker) else {
                tracing::trace!(byte = self.buffer[0], "Skipping byte outside any frame");
                self.buffer.advance(1);
                self.stats.skipped_bytes += 1;
                continue;
            };

            let format = framing.format();
            let header_len = format.header_len();

            // Smallest possible frame: marker, header, CRC
            if self.buffer.len() < MARKER_SIZE + header_len + CRC_SIZE {
                return None;
            }

            let header = Header::parse(framing, &self.buffer[MARKER_SIZE..])?;
            let payload_len = usize::from(header.length);
            let total = format.frame_len(payload_len);

            if self.buffer.len() < total {
                return None;
            }

            let mut frame = self.buffer.split_to(total);
            frame.advance(MARKER_SIZE);
            let header_bytes = frame.split_to(header_len);
            let payload = frame.split_to(payload_len).freeze();
            let received = frame.get_u16_le();

            let computed = format.checksum(&header_bytes, &payload);
            if received != computed {
                self.stats.crc_errors += 1;
                tracing::warn!(
                    marker = format_args!("{marker:#06x}"),
                    received = format_args!("{received:#06x}"),
                    computed = format_args!("{computed:#06x}"),
                    "CRC mismatch, dropping frame"
                );
                return Some(Err(ProtocolError::CrcMismatch { marker, received, computed }));
            }

            self.stats.packets += 1;
            tracing::debug!(
                framing = %framing,
                target = header.target,
                command = header.command,
                payload_len,
                "Decoded frame"
            );

            return Some(Ok(Packet::from_wire(framing, header.target, header.command, payload)));
        }
    }
}

/// Iterator over decode results, returned by [`StreamDecoder::feed_checked`].
#[derive(Debug)]
pub struct Decoded<'a> {
    decoder: &'a mut StreamDecoder,
}

impl Iterator for Decoded<'_> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_frame()
    }
}

/// Iterator over valid packets, returned by [`StreamDecoder::feed`].
#[derive(Debug)]
pub struct Packets<'a> {
    inner: Decoded<'a>,
}

impl Iterator for Packets<'_> {
    type Item = Packet;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(Result::ok)
    }
}
