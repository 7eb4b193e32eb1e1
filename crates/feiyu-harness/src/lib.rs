//! Deterministic test harness for the Feiyu wire codec.
//!
//! Two tools for exercising [`feiyu_proto::StreamDecoder`] the way a real
//! serial line would:
//!
//! - [`NoisyLink`]: seeded channel simulator that fragments a packet stream,
//!   injects line noise and flips bits, and records what the receiver should
//!   still see.
//! - [`ModelDecoder`] and [`DecoderWorld`]: a deliberately naive reference
//!   decoder and a world that drives it in lockstep with the real one from a
//!   sequence of [`Operation`]s.
//!
//! Every random choice comes from a seed, so failures replay exactly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod link;
pub mod model;
pub mod world;

pub use link::{NoiseConfig, NoisyLink, Transmission};
pub use model::{ModelDecoder, ModelEvent};
pub use world::{DecoderWorld, Divergence, Operation};
