//! Error types.

use crate::Phase;

/// Result type with the `aes-gcm-stream` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type.
///
/// Every error is reported before the offending word is consumed: the engine's state is exactly
/// what it was before the rejected call.
///
/// A failed tag comparison is *not* an error. It is reported through
/// [`Engine::verified`](crate::Engine::verified).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Port width is not a power of two between 1 and 16 bytes.
    #[error("invalid word width: {0} bytes (expected a power of two up to 16)")]
    InvalidWordWidth(usize),

    /// Key size is not one of 128, 192 or 256 bits.
    #[error("unsupported key size: {0} bits")]
    UnsupportedKeySize(usize),

    /// Key material did not add up to the configured key size.
    #[error("invalid key length (expected {expected} bytes)")]
    InvalidKeyLength {
        /// Configured key size in bytes
        expected: usize,
    },

    /// IV field ended without any bytes.
    #[error("IV must not be empty")]
    EmptyIv,

    /// Word carries more bytes than the port width.
    #[error("word of {len} bytes exceeds port width of {width} bytes")]
    WordTooLong {
        /// Length of the rejected word
        len: usize,
        /// Port width
        width: usize,
    },

    /// Only the final word of a field may be shorter than the port width.
    #[error("short word without the last marker")]
    ShortWord,

    /// The port does not accept data in the engine's current phase.
    #[error("port does not accept data in phase {0:?}")]
    UnexpectedPhase(Phase),

    /// The port is applying backpressure; retry after draining an output port.
    #[error("port is not ready")]
    NotReady,

    /// Session started from an IV alone, but no key has been loaded.
    #[error("no key loaded")]
    NoKey,

    /// Supplied tag was not exactly 16 bytes, or its last marker was misplaced.
    #[error("invalid tag length")]
    InvalidTagLength,

    /// Associated data exceeded [`A_MAX`](crate::A_MAX).
    #[error("associated data too long")]
    AadTooLong,

    /// Plaintext or ciphertext exceeded [`P_MAX`](crate::P_MAX).
    #[error("text too long")]
    TextTooLong,
}
