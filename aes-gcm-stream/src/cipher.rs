//! Block cipher seam.
//!
//! The engine only ever needs "encrypt one 128-bit block under the session key". Key expansion
//! and the round function live in the [`aes`] crate.

use crate::{Error, KeySize};
use aes::cipher::{BlockEncrypt, KeyInit};
use gf128::Block;

/// Single-block encryption under an already expanded key.
///
/// Implemented for the [`aes`] crate's ciphers. Implement it for other AES providers (e.g. a
/// hardware engine) to use them with [`AesGcm`](crate::AesGcm).
pub trait EncryptBlock {
    /// Encrypt `block` in place.
    fn encrypt_block(&self, block: &mut Block);
}

macro_rules! impl_encrypt_block {
    ($($aes:ty),+) => {
        $(
            impl EncryptBlock for $aes {
                #[inline]
                fn encrypt_block(&self, block: &mut Block) {
                    BlockEncrypt::encrypt_block(self, block);
                }
            }
        )+
    };
}

impl_encrypt_block!(aes::Aes128, aes::Aes192, aes::Aes256);

/// AES with the key size picked at run time.
#[derive(Clone)]
pub enum AesCipher {
    /// AES-128
    Aes128(aes::Aes128),

    /// AES-192
    Aes192(aes::Aes192),

    /// AES-256
    Aes256(aes::Aes256),
}

impl AesCipher {
    /// Expand `key`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKeyLength`] if `key` is not `key_size.bytes()` long.
    pub fn new(key_size: KeySize, key: &[u8]) -> crate::Result<Self> {
        let invalid = |_| Error::InvalidKeyLength {
            expected: key_size.bytes(),
        };

        Ok(match key_size {
            KeySize::Aes128 => Self::Aes128(aes::Aes128::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes192 => Self::Aes192(aes::Aes192::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes256 => Self::Aes256(aes::Aes256::new_from_slice(key).map_err(invalid)?),
        })
    }

    /// Key size of the expanded key.
    #[must_use]
    pub const fn key_size(&self) -> KeySize {
        match self {
            Self::Aes128(_) => KeySize::Aes128,
            Self::Aes192(_) => KeySize::Aes192,
            Self::Aes256(_) => KeySize::Aes256,
        }
    }

    /// Hash subkey `H = E_K(0^128)`.
    #[must_use]
    pub fn hash_subkey(&self) -> Block {
        let mut h = Block::default();
        EncryptBlock::encrypt_block(self, &mut h);
        h
    }
}

impl EncryptBlock for AesCipher {
    #[inline]
    fn encrypt_block(&self, block: &mut Block) {
        match self {
            Self::Aes128(cipher) => EncryptBlock::encrypt_block(cipher, block),
            Self::Aes192(cipher) => EncryptBlock::encrypt_block(cipher, block),
            Self::Aes256(cipher) => EncryptBlock::encrypt_block(cipher, block),
        }
    }
}

opaque_debug::implement!(AesCipher);

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn hash_subkey_of_zero_key() {
        let cipher = AesCipher::new(KeySize::Aes128, &[0; 16]).unwrap();
        assert_eq!(
            cipher.hash_subkey().as_slice(),
            &hex!("66e94bd4ef8a2c3b884cfa59ca342b2e")
        );
        assert_eq!(cipher.key_size(), KeySize::Aes128);
    }

    #[test]
    fn key_length_must_match_size() {
        assert_eq!(
            AesCipher::new(KeySize::Aes256, &[0; 16]).err(),
            Some(Error::InvalidKeyLength { expected: 32 })
        );
        assert!(AesCipher::new(KeySize::Aes192, &[0; 24]).is_ok());
    }
}
