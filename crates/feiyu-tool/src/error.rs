//! Tool error types.

use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Packet could not be built
    #[error(transparent)]
    Protocol(#[from] feiyu_proto::ProtocolError),

    /// Input was not valid hex
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunk size of zero would never make progress
    #[error("chunk size must be at least 1")]
    ZeroChunk,
}

/// Result alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;
