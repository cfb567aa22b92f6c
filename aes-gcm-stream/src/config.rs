//! Session configuration.

use crate::{Error, Result, Word};
use gf128::BLOCK_SIZE;

/// AES key size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeySize {
    /// AES-128
    Aes128,

    /// AES-192
    Aes192,

    /// AES-256
    Aes256,
}

impl KeySize {
    /// Look up a key size by its length in bits.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedKeySize`] for anything other than 128, 192 or 256.
    pub const fn from_bits(bits: usize) -> Result<Self> {
        match bits {
            128 => Ok(Self::Aes128),
            192 => Ok(Self::Aes192),
            256 => Ok(Self::Aes256),
            _ => Err(Error::UnsupportedKeySize(bits)),
        }
    }

    /// Key length in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        self.bytes() * 8
    }
}

/// Direction of a session.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Plaintext in, ciphertext and tag out.
    Encrypt,

    /// Ciphertext and tag in, plaintext and verification result out.
    Decrypt,
}

/// Byte width of every streaming port.
///
/// A power of two between 1 and 16, so a full word never straddles a 128-bit block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WordWidth(usize);

impl WordWidth {
    /// One full block per word.
    pub const DEFAULT: Self = Self(BLOCK_SIZE);

    /// Validate a port width in bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWordWidth`] unless `bytes` is a power of two no larger than 16.
    pub const fn new(bytes: usize) -> Result<Self> {
        if bytes.is_power_of_two() && bytes <= BLOCK_SIZE {
            Ok(Self(bytes))
        } else {
            Err(Error::InvalidWordWidth(bytes))
        }
    }

    /// Width in bytes.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Cut one field into words of this width, marking the final word as last.
    ///
    /// An empty field yields a single empty last word.
    #[must_use]
    pub fn split(self, field: &[u8]) -> Words<'_> {
        Words {
            rest: field,
            width: self.0,
            done: false,
        }
    }

    /// Check that `word` may be presented on a port of this width.
    pub(crate) fn check(self, word: &Word) -> Result<()> {
        if word.len() > self.0 {
            return Err(Error::WordTooLong {
                len: word.len(),
                width: self.0,
            });
        }

        if !word.is_last() && word.len() != self.0 {
            return Err(Error::ShortWord);
        }

        Ok(())
    }
}

impl Default for WordWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Iterator over the words of one field, see [`WordWidth::split`].
#[derive(Clone, Debug)]
pub struct Words<'a> {
    rest: &'a [u8],
    width: usize,
    done: bool,
}

impl Iterator for Words<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        if self.done {
            return None;
        }

        if self.rest.len() <= self.width {
            self.done = true;
            return Some(Word::from_parts(self.rest, true));
        }

        let (head, tail) = self.rest.split_at(self.width);
        self.rest = tail;
        Some(Word::from_parts(head, false))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done {
            0
        } else {
            self.rest.len().div_ceil(self.width).max(1)
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Words<'_> {}

impl core::iter::FusedIterator for Words<'_> {}

/// Engine configuration, fixed for the engine's lifetime.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    key_size: KeySize,
    direction: Direction,
    word_width: WordWidth,
}

impl Config {
    /// Configuration with full-block (16 byte) ports.
    #[must_use]
    pub const fn new(key_size: KeySize, direction: Direction) -> Self {
        Self {
            key_size,
            direction,
            word_width: WordWidth::DEFAULT,
        }
    }

    /// Use a narrower port width.
    #[must_use]
    pub const fn with_word_width(mut self, word_width: WordWidth) -> Self {
        self.word_width = word_width;
        self
    }

    /// Key size.
    #[must_use]
    pub const fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// Encrypt or decrypt.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Port width.
    #[must_use]
    pub const fn word_width(&self) -> WordWidth {
        self.word_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_width_validation() {
        for ok in [1, 2, 4, 8, 16] {
            assert_eq!(WordWidth::new(ok).map(WordWidth::get), Ok(ok));
        }
        for bad in [0, 3, 12, 32] {
            assert_eq!(WordWidth::new(bad), Err(Error::InvalidWordWidth(bad)));
        }
        assert_eq!(WordWidth::default().get(), 16);
    }

    #[test]
    fn key_size_lookup() {
        assert_eq!(KeySize::from_bits(192), Ok(KeySize::Aes192));
        assert_eq!(KeySize::Aes256.bytes(), 32);
        assert_eq!(KeySize::Aes128.bits(), 128);
        assert_eq!(KeySize::from_bits(64), Err(Error::UnsupportedKeySize(64)));
    }

    #[test]
    fn split_marks_last_word() {
        let width = WordWidth::new(4).unwrap();
        let data = [7u8; 10];
        assert_eq!(width.split(&data).len(), 3);

        let shape = width.split(&data).map(|w| (w.len(), w.is_last()));
        assert!(shape.eq([(4, false), (4, false), (2, true)]));
    }

    #[test]
    fn split_exact_multiple_ends_on_full_word() {
        let width = WordWidth::new(8).unwrap();
        let mut words = width.split(&[1u8; 16]);
        assert!(!words.next().unwrap().is_last());
        assert!(words.next().unwrap().is_last());
        assert!(words.next().is_none());
    }

    #[test]
    fn split_empty_field() {
        let mut words = WordWidth::DEFAULT.split(&[]);
        let word = words.next().unwrap();
        assert!(word.is_empty());
        assert!(word.is_last());
        assert!(words.next().is_none());
    }

    #[test]
    fn check_rejects_malformed_words() {
        let width = WordWidth::new(4).unwrap();
        let long = Word::new(&[0; 8]).unwrap();
        assert_eq!(
            width.check(&long),
            Err(Error::WordTooLong { len: 8, width: 4 })
        );
        assert_eq!(width.check(&Word::new(&[0; 2]).unwrap()), Err(Error::ShortWord));
        assert_eq!(width.check(&Word::new_last(&[0; 2]).unwrap()), Ok(()));
        assert_eq!(width.check(&Word::empty_last()), Ok(()));
    }
}
