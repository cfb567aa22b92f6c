//! Port words.

use crate::{Error, Result};
use gf128::BLOCK_SIZE;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// One transfer on a streaming port: up to 16 bytes plus the end-of-field marker.
///
/// Words are plain values. The engine copies out of them, so a word handed to a port can be
/// dropped or reused immediately.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct Word {
    data: [u8; BLOCK_SIZE],
    len: u8,
    last: bool,
}

impl Word {
    /// Non-final word.
    ///
    /// # Errors
    ///
    /// [`Error::WordTooLong`] if `bytes` is longer than 16.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        Self::checked(bytes, false)
    }

    /// Final word of a field.
    ///
    /// # Errors
    ///
    /// [`Error::WordTooLong`] if `bytes` is longer than 16.
    pub fn new_last(bytes: &[u8]) -> Result<Self> {
        Self::checked(bytes, true)
    }

    /// Empty final word, which ends a field without adding bytes to it.
    #[must_use]
    pub const fn empty_last() -> Self {
        Self {
            data: [0; BLOCK_SIZE],
            len: 0,
            last: true,
        }
    }

    fn checked(bytes: &[u8], last: bool) -> Result<Self> {
        if bytes.len() > BLOCK_SIZE {
            return Err(Error::WordTooLong {
                len: bytes.len(),
                width: BLOCK_SIZE,
            });
        }

        Ok(Self::from_parts(bytes, last))
    }

    /// Build a word from at most 16 bytes; anything past that is ignored.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_parts(bytes: &[u8], last: bool) -> Self {
        let n = bytes.len().min(BLOCK_SIZE);
        let mut data = [0u8; BLOCK_SIZE];
        data[..n].copy_from_slice(&bytes[..n]);

        Self {
            data,
            len: n as u8,
            last,
        }
    }

    /// Payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        let n = self.len();
        &mut self.data[..n]
    }

    /// Number of payload bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the word carries no payload.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this word ends its field.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.last
    }
}

impl core::fmt::Debug for Word {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Word")
            .field("len", &self.len)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Word {
    fn zeroize(&mut self) {
        self.data.zeroize();
        self.len.zeroize();
    }
}
