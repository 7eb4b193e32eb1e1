//! Reference decoder.
//!
//! A slow, obviously-correct restatement of the extraction rules: a plain
//! `Vec<u8>`, index arithmetic, and a bitwise CRC that shares no code with
//! `feiyu_proto`. The real decoder must agree with it on every input.

/// What the model saw at the front of its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A frame with a valid CRC
    Packet {
        /// Framing marker
        marker: u16,
        /// Target address
        target: u8,
        /// Command code
        command: u8,
        /// Payload bytes
        payload: Vec<u8>,
    },
    /// A structurally complete frame whose CRC did not match
    CrcMismatch {
        /// Framing marker
        marker: u16,
        /// CRC carried on the wire
        received: u16,
        /// CRC computed over header and payload
        computed: u16,
    },
}

/// Naive decoder used as the oracle in model-based tests.
#[derive(Debug, Default)]
pub struct ModelDecoder {
    buffer: Vec<u8>,
}

/// Length field width and CRC seed for each marker.
fn params(marker: u16) -> Option<(usize, u16)> {
    match marker {
        0xAA55 => Some((2, 0xFFFF)),
        0x5AA5 => Some((1, 0x0000)),
        _ => None,
    }
}

/// Bitwise CRC-16, polynomial 0x1021, MSB first.
pub fn crc_hqx(seed: u16, bytes: &[u8]) -> u16 {
    let mut crc = seed;
    for &byte in bytes {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 == 0 { crc << 1 } else { (crc << 1) ^ 0x1021 };
        }
    }
    crc
}

impl ModelDecoder {
    /// Empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes not yet resolved.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append `data` and return every event it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<ModelEvent> {
        self.buffer.extend_from_slice(data);
        let mut events = Vec::new();

        while self.buffer.len() >= 2 {
            let marker = u16::from_le_bytes([self.buffer[0], self.buffer[1]]);
            let Some((width, seed)) = params(marker) else {
                self.buffer.remove(0);
                continue;
            };

            let header_len = 2 + width;
            if self.buffer.len() < header_len + 4 {
                break;
            }

            let length = if width == 1 {
                usize::from(self.buffer[4])
            } else {
                usize::from(u16::from_le_bytes([self.buffer[4], self.buffer[5]]))
            };
            if self.buffer.len() < header_len + length + 4 {
                break;
            }

            let body_end = 2 + header_len + length;
            let received = u16::from_le_bytes([self.buffer[body_end], self.buffer[body_end + 1]]);
            let computed = crc_hqx(seed, &self.buffer[2..body_end]);

            let event = if received == computed {
                ModelEvent::Packet {
                    marker,
                    target: self.buffer[2],
                    command: self.buffer[3],
                    payload: self.buffer[2 + header_len..body_end].to_vec(),
                }
            } else {
                ModelEvent::CrcMismatch { marker, received, computed }
            };

            self.buffer.drain(..body_end + 2);
            events.push(event);
        }

        events
    }
}
