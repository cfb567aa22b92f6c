//! One-shot AES-GCM over whole in-memory messages.

use crate::{
    A_MAX, C_MAX, EncryptBlock, P_MAX,
    ctr::{Keystream, derive_j0, length_block},
};
use aead::{
    AeadCore, AeadInPlace, Error, Key, KeyInit, KeySizeUser, Nonce, Tag,
    consts::{U0, U12, U16},
};
use core::fmt;
use gf128::{BLOCK_SIZE, Block, GHash, universal_hash::UniversalHash};
use subtle::ConstantTimeEq;

/// AES-GCM with a 128-bit key.
pub type Aes128Gcm<const D: usize = 128> = AesGcm<aes::Aes128, D>;

/// AES-GCM with a 192-bit key.
pub type Aes192Gcm<const D: usize = 128> = AesGcm<aes::Aes192, D>;

/// AES-GCM with a 256-bit key.
pub type Aes256Gcm<const D: usize = 128> = AesGcm<aes::Aes256, D>;

/// AES-GCM over whole messages, generic over the AES implementation and the GHASH digit width.
///
/// Implements the [`aead`] traits with a 96-bit nonce and a 128-bit tag. The `*_with_iv`
/// methods accept an IV of any non-zero length.
///
/// Decryption checks the tag before decrypting anything: on failure the buffer still holds the
/// ciphertext it was given.
#[derive(Clone)]
pub struct AesGcm<Aes, const D: usize = 128> {
    cipher: Aes,

    /// GHASH keyed with `H`, left empty; each message works on a clone
    ghash: GHash<D>,
}

impl<Aes, const D: usize> KeySizeUser for AesGcm<Aes, D>
where
    Aes: KeySizeUser,
{
    type KeySize = Aes::KeySize;
}

impl<Aes, const D: usize> KeyInit for AesGcm<Aes, D>
where
    Aes: EncryptBlock + KeyInit,
{
    fn new(key: &Key<Self>) -> Self {
        Aes::new(key).into()
    }
}

impl<Aes, const D: usize> From<Aes> for AesGcm<Aes, D>
where
    Aes: EncryptBlock,
{
    fn from(cipher: Aes) -> Self {
        let mut h = Block::default();
        cipher.encrypt_block(&mut h);

        Self {
            cipher,
            ghash: GHash::new(&h),
        }
    }
}

impl<Aes, const D: usize> AeadCore for AesGcm<Aes, D> {
    type NonceSize = U12;
    type TagSize = U16;
    type CiphertextOverhead = U0;
}

impl<Aes, const D: usize> AeadInPlace for AesGcm<Aes, D>
where
    Aes: EncryptBlock,
{
    fn encrypt_in_place_detached(
        &self,
        nonce: &Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<Tag<Self>, Error> {
        self.encrypt_in_place_detached_with_iv(nonce, associated_data, buffer)
    }

    fn decrypt_in_place_detached(
        &self,
        nonce: &Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &Tag<Self>,
    ) -> Result<(), Error> {
        self.decrypt_in_place_detached_with_iv(nonce, associated_data, buffer, tag)
    }
}

impl<Aes, const D: usize> AesGcm<Aes, D>
where
    Aes: EncryptBlock,
{
    /// Encrypt `buffer` in place under an IV of any non-zero length and return the tag.
    ///
    /// # Errors
    ///
    /// [`aead::Error`] for an empty IV or data beyond [`A_MAX`] / [`P_MAX`].
    pub fn encrypt_in_place_detached_with_iv(
        &self,
        iv: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<Tag<Self>, Error> {
        if iv.is_empty()
            || associated_data.len() as u64 > A_MAX
            || buffer.len() as u64 > P_MAX
        {
            return Err(Error);
        }

        let (mut keystream, mask) = self.init_ctr(iv);
        keystream.apply_keystream(&self.cipher, buffer);
        Ok(self.compute_tag(mask, associated_data, buffer))
    }

    /// Verify `tag` and, only if it matches, decrypt `buffer` in place.
    ///
    /// `tag` must be 16 bytes. On failure `buffer` is left untouched.
    ///
    /// # Errors
    ///
    /// [`aead::Error`] on tag mismatch, a tag of the wrong length, an empty IV or data beyond
    /// [`A_MAX`] / [`C_MAX`].
    pub fn decrypt_in_place_detached_with_iv(
        &self,
        iv: &[u8],
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &[u8],
    ) -> Result<(), Error> {
        if iv.is_empty()
            || tag.len() != BLOCK_SIZE
            || associated_data.len() as u64 > A_MAX
            || buffer.len() as u64 + BLOCK_SIZE as u64 > C_MAX
        {
            return Err(Error);
        }

        let (mut keystream, mask) = self.init_ctr(iv);
        let expected = self.compute_tag(mask, associated_data, buffer);

        if bool::from(expected.as_slice().ct_eq(tag)) {
            keystream.apply_keystream(&self.cipher, buffer);
            Ok(())
        } else {
            Err(Error)
        }
    }

    /// Keystream positioned at the first text block, and the tag mask `E_K(J0)`.
    fn init_ctr(&self, iv: &[u8]) -> (Keystream, Block) {
        let keystream = Keystream::new(derive_j0(&self.ghash, iv));
        let mask = keystream.tag_mask(&self.cipher);
        (keystream, mask)
    }

    fn compute_tag(&self, mask: Block, associated_data: &[u8], ciphertext: &[u8]) -> Tag<Self> {
        let mut ghash = self.ghash.clone();
        ghash.update_padded(associated_data);
        ghash.update_padded(ciphertext);
        ghash.fold(&length_block(
            associated_data.len() as u64,
            ciphertext.len() as u64,
        ));

        let mut tag = ghash.finalize();
        for (t, m) in tag.iter_mut().zip(mask.iter()) {
            *t ^= m;
        }
        tag
    }
}

impl<Aes, const D: usize> fmt::Debug for AesGcm<Aes, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcm")
            .field("digit_width", &D)
            .finish_non_exhaustive()
    }
}
