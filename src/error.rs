//! Error types for ODS operations.

/// Errors that can occur while encoding, decoding, or editing ODS data.
#[derive(Debug, thiserror::Error)]
pub enum OdsError {
    /// Header fields are inconsistent or the buffer under/overflowed
    /// during a structured parse.
    #[error("malformed tag data: {0}")]
    Malformed(String),

    /// A keyed traversal attempted to descend into a compressed object.
    #[error("unable to traverse the compressed object '{0}'; decompress it first")]
    CompressedTraversal(String),

    /// A type id with no built-in or registered handler was read while
    /// tolerant mode is off.
    #[error("unknown tag type id: {0}")]
    UnknownType(u8),

    /// A custom tag registration used an id inside the reserved range.
    #[error("tag type id {0} is reserved (0..=15)")]
    ReservedTypeId(u8),

    /// A compressed object named a compressor that is not registered.
    #[error("unknown compressor: {0}")]
    UnknownCompressor(String),

    /// A registered custom tag codec rejected its payload.
    #[error("invalid custom tag: {0}")]
    InvalidCustomTag(String),

    /// `set` was asked to delete a key that does not exist.
    #[error("the key '{0}' does not exist")]
    KeyNotFound(String),

    /// An underlying stream, file, or compression failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OdsError {
    /// Wraps any displayable cause as a `Malformed` error.
    pub(crate) fn malformed(e: impl std::fmt::Display) -> Self {
        Self::Malformed(e.to_string())
    }
}
