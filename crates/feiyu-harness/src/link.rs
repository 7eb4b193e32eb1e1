//! Seeded noisy serial link.

use bytes::Bytes;
use feiyu_proto::{Packet, StreamDecoder};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Knobs for how badly the link misbehaves.
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    /// Largest chunk handed to the receiver in one read (at least 1)
    pub max_chunk: usize,
    /// Chance of a noise burst before each frame
    pub noise_probability: f64,
    /// Longest noise burst in bytes
    pub max_noise: usize,
    /// Chance that a frame gets one bit flipped
    pub corruption_probability: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { max_chunk: 16, noise_probability: 0.25, max_noise: 8, corruption_probability: 0.1 }
    }
}

/// What went over the wire, and what the receiver should make of it.
#[derive(Debug, Clone, Default)]
pub struct Transmission {
    /// Reads as the receiver sees them, in order
    pub chunks: Vec<Bytes>,
    /// Packets that arrived undamaged, in order
    pub intact: Vec<Packet>,
    /// Frames that had a bit flipped
    pub corrupted: usize,
    /// Noise bytes injected between frames
    pub noise_bytes: usize,
}

impl Transmission {
    /// All chunks joined back together.
    pub fn wire(&self) -> Vec<u8> {
        self.chunks.iter().flat_map(|chunk| chunk.iter().copied()).collect()
    }

    /// Feed every chunk into `decoder` and collect what comes out.
    pub fn replay(&self, decoder: &mut StreamDecoder) -> Vec<Packet> {
        let mut packets = Vec::new();
        for chunk in &self.chunks {
            packets.extend(decoder.feed(chunk));
        }
        packets
    }
}

/// Deterministic channel simulator.
///
/// Noise never contains `0x55` or `0xA5`, the only bytes a marker can start
/// with, so it cannot fake a frame. Corruption never touches the marker or the
/// length field, so a damaged frame keeps its boundaries and costs exactly
/// one CRC error.
pub struct NoisyLink {
    rng: ChaCha20Rng,
    config: NoiseConfig,
}

impl NoisyLink {
    /// Link with default noise settings.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, NoiseConfig::default())
    }

    /// Link with custom noise settings.
    pub fn with_config(seed: u64, config: NoiseConfig) -> Self {
        Self { rng: ChaCha20Rng::seed_from_u64(seed), config }
    }

    /// Send `packets` across the link.
    pub fn transmit(&mut self, packets: &[Packet]) -> Transmission {
        let mut out = Transmission::default();
        let mut wire = Vec::new();

        for packet in packets {
            if self.roll(self.config.noise_probability) && self.config.max_noise > 0 {
                let burst = self.rng.gen_range(1..=self.config.max_noise);
                wire.extend((0..burst).map(|_| self.noise_byte()));
                out.noise_bytes += burst;
            }

            let mut frame = packet.encode().to_vec();
            if self.roll(self.config.corruption_probability) {
                self.flip_bit(packet, &mut frame);
                out.corrupted += 1;
            } else {
                out.intact.push(packet.clone());
            }
            wire.extend_from_slice(&frame);
        }

        let max_chunk = self.config.max_chunk.max(1);
        let mut rest = Bytes::from(wire);
        while !rest.is_empty() {
            let len = self.rng.gen_range(1..=max_chunk).min(rest.len());
            out.chunks.push(rest.split_to(len));
        }

        tracing::debug!(
            frames = packets.len(),
            chunks = out.chunks.len(),
            corrupted = out.corrupted,
            noise_bytes = out.noise_bytes,
            "Transmitted"
        );

        out
    }

    fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn noise_byte(&mut self) -> u8 {
        loop {
            let byte = self.rng.gen_range(0..=u8::MAX);
            if !matches!(byte, 0x55 | 0xa5) {
                return byte;
            }
        }
    }

    /// Flip one bit in target, command, payload or CRC.
    fn flip_bit(&mut self, packet: &Packet, frame: &mut [u8]) {
        let payload_start = 2 + packet.framing().format().header_len();
        let candidates: Vec<usize> = [2, 3].into_iter().chain(payload_start..frame.len()).collect();

        let position = candidates[self.rng.gen_range(0..candidates.len())];
        let bit = self.rng.gen_range(0..8u8);
        frame[position] ^= 1 << bit;

        tracing::trace!(position, bit, "Flipped bit");
    }
}
