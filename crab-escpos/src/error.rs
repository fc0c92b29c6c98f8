//! Error types for the encoder

use thiserror::Error;

/// Character conversion error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The target table has no byte sequence for this character
    #[error("Character {ch:?} cannot be represented in {encoding}")]
    Unmappable { ch: char, encoding: &'static str },

    /// Input too large to size an output buffer for
    #[error("Input of {0} bytes is too large to encode")]
    InputTooLarge(usize),
}

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Write or read failure on the underlying stream
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Text could not be converted to the printer's code page
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The connection has already been closed
    #[error("Printer connection is closed")]
    Closed,

    /// Payload does not fit the command's length field
    #[error("Payload too long: {len} bytes (max {max})")]
    PayloadTooLong { len: usize, max: usize },

    /// Payload bytes the command cannot carry
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Could not open the connection
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
