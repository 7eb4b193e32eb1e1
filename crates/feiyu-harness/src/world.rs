//! Lockstep driver for model-based tests.
//!
//! ```text
//! Vec<Operation> ──> DecoderWorld ──┬──> StreamDecoder (real)
//!                                   └──> ModelDecoder  (reference)
//!                                            │
//!                               compare events and buffer size
//! ```
//!
//! Operations queue bytes on a simulated wire and then deliver them in chunks
//! to both decoders. After every delivery the two must report the same events
//! and hold the same number of unresolved bytes.

use arbitrary::Arbitrary;
use feiyu_proto::{Framing, Packet, ProtocolError, StreamDecoder};
use thiserror::Error;

use crate::model::{ModelDecoder, ModelEvent};

/// One step of a generated scenario.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Queue an encoded frame (payload cut to fit the framing)
    Send {
        /// Long form if set, short form otherwise
        long: bool,
        /// Target address
        target: u8,
        /// Command code
        command: u8,
        /// Payload bytes
        payload: Vec<u8>,
    },
    /// Queue raw bytes
    Noise(Vec<u8>),
    /// Flip one bit in the queued bytes, if any
    FlipBit {
        /// Byte offset, taken modulo the queue length
        offset: u16,
        /// Bit index, taken modulo 8
        bit: u8,
    },
    /// Deliver up to `len` queued bytes
    Deliver {
        /// Maximum bytes to deliver
        len: u16,
    },
    /// Deliver everything queued
    Flush,
}

/// The real decoder and the model disagreed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Divergence {
    /// Different events for the same delivery
    #[error("step {step}: decoder yielded {real:?}, model yielded {model:?}")]
    Events {
        /// Operation index
        step: usize,
        /// Events from the real decoder
        real: Vec<ModelEvent>,
        /// Events from the model
        model: Vec<ModelEvent>,
    },

    /// Different amounts of unresolved data
    #[error("step {step}: decoder buffers {real} bytes, model buffers {model}")]
    Buffered {
        /// Operation index
        step: usize,
        /// Bytes buffered by the real decoder
        real: usize,
        /// Bytes buffered by the model
        model: usize,
    },

    /// The real decoder raised an error the model has no counterpart for
    #[error("step {step}: unexpected error: {error}")]
    Unexpected {
        /// Operation index
        step: usize,
        /// The error
        error: ProtocolError,
    },
}

/// Real decoder, reference model and the bytes queued between them.
#[derive(Debug, Default)]
pub struct DecoderWorld {
    decoder: StreamDecoder,
    model: ModelDecoder,
    queued: Vec<u8>,
    step: usize,
    packets: Vec<Packet>,
}

impl DecoderWorld {
    /// Fresh world with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every operation, then flush, stopping at the first divergence.
    pub fn run(&mut self, operations: &[Operation]) -> Result<(), Divergence> {
        for operation in operations {
            self.apply(operation)?;
        }
        self.apply(&Operation::Flush)
    }

    /// Apply one operation.
    pub fn apply(&mut self, operation: &Operation) -> Result<(), Divergence> {
        let step = self.step;
        self.step += 1;

        match operation {
            Operation::Send { long, target, command, payload } => {
                let framing = if *long { Framing::Long } else { Framing::Short };
                let max = framing.format().max_payload();
                let payload = payload[..payload.len().min(max)].to_vec();

                let packet = Packet::from_marker(framing.marker(), *target, *command, payload)
                    .map_err(|error| Divergence::Unexpected { step, error })?;
                self.queued.extend_from_slice(&packet.encode());
                Ok(())
            },
            Operation::Noise(bytes) => {
                self.queued.extend_from_slice(bytes);
                Ok(())
            },
            Operation::FlipBit { offset, bit } => {
                if !self.queued.is_empty() {
                    let position = usize::from(*offset) % self.queued.len();
                    self.queued[position] ^= 1 << (bit % 8);
                }
                Ok(())
            },
            Operation::Deliver { len } => {
                let len = usize::from(*len).min(self.queued.len());
                self.deliver(step, len)
            },
            Operation::Flush => self.deliver(step, self.queued.len()),
        }
    }

    /// Packets the real decoder has yielded so far.
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// The real decoder.
    pub fn decoder(&self) -> &StreamDecoder {
        &self.decoder
    }

    fn deliver(&mut self, step: usize, len: usize) -> Result<(), Divergence> {
        let chunk: Vec<u8> = self.queued.drain(..len).collect();

        let mut real = Vec::new();
        for result in self.decoder.feed_checked(&chunk) {
            match result {
                Ok(packet) => {
                    real.push(ModelEvent::Packet {
                        marker: packet.framing().marker(),
                        target: packet.target(),
                        command: packet.command(),
                        payload: packet.payload().to_vec(),
                    });
                    self.packets.push(packet);
                },
                Err(ProtocolError::CrcMismatch { marker, received, computed }) => {
                    real.push(ModelEvent::CrcMismatch { marker, received, computed });
                },
                Err(error) => return Err(Divergence::Unexpected { step, error }),
            }
        }

        let model = self.model.feed(&chunk);
        if real != model {
            return Err(Divergence::Events { step, real, model });
        }

        let (real, model) = (self.decoder.buffered(), self.model.buffered());
        if real != model {
            return Err(Divergence::Buffered { step, real, model });
        }

        Ok(())
    }
}
