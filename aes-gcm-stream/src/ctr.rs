//! Counter-mode keystream.

use crate::EncryptBlock;
use gf128::{BLOCK_SIZE, Block, GHash, universal_hash::UniversalHash};

/// Length of the IV for which `J0` is formed directly instead of hashed.
pub const FAST_IV_SIZE: usize = 12;

/// Keystream generator anchored at the pre-counter block `J0`.
///
/// Counter index 0 is `J0` itself and is used only for the tag mask. Index `i >= 1` is
/// `inc32^i(J0)`: the low 32 bits of `J0` advanced by `i`, modulo 2^32, with the upper 96 bits
/// left alone.
// not `Copy`: wiped on drop under the `zeroize` feature
#[allow(missing_copy_implementations)]
#[derive(Clone)]
pub struct Keystream {
    j0: Block,
    counter: u32,
}

impl Keystream {
    /// Start a keystream at `J0`; the first block produced is `E_K(inc32(J0))`.
    #[must_use]
    pub fn new(j0: Block) -> Self {
        Self { j0, counter: 0 }
    }

    /// Start a keystream from a 96-bit IV, i.e. `J0 = IV || 0^31 || 1`.
    #[must_use]
    pub fn from_iv(iv: &[u8; FAST_IV_SIZE]) -> Self {
        let mut j0 = Block::default();
        j0[..FAST_IV_SIZE].copy_from_slice(iv);
        j0[BLOCK_SIZE - 1] = 1;
        Self::new(j0)
    }

    /// Restart at a new `J0`.
    pub fn reset(&mut self, j0: Block) {
        self.j0 = j0;
        self.counter = 0;
    }

    /// Pre-counter block.
    #[must_use]
    pub fn j0(&self) -> &Block {
        &self.j0
    }

    /// Tag mask `E_K(J0)`.
    #[must_use]
    pub fn tag_mask(&self, cipher: &impl EncryptBlock) -> Block {
        let mut mask = self.j0;
        cipher.encrypt_block(&mut mask);
        mask
    }

    /// Next keystream block.
    pub fn next_block(&mut self, cipher: &impl EncryptBlock) -> Block {
        self.counter = self.counter.wrapping_add(1);

        let mut block = self.j0;
        let mut low = [0u8; 4];
        low.copy_from_slice(&block[BLOCK_SIZE - 4..]);
        let low = u32::from_be_bytes(low).wrapping_add(self.counter);
        block[BLOCK_SIZE - 4..].copy_from_slice(&low.to_be_bytes());

        cipher.encrypt_block(&mut block);
        block
    }

    /// XOR the keystream into `buf`, one block per 16 bytes (the final chunk may be partial).
    pub fn apply_keystream(&mut self, cipher: &impl EncryptBlock, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(BLOCK_SIZE) {
            let ks = self.next_block(cipher);
            for (byte, k) in chunk.iter_mut().zip(ks.iter()) {
                *byte ^= k;
            }
        }
    }
}

opaque_debug::implement!(Keystream);

#[cfg(feature = "zeroize")]
impl Drop for Keystream {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.j0.as_mut_slice().zeroize();
        self.counter.zeroize();
    }
}

/// Derive `J0` from an IV of any non-zero length.
///
/// A 96-bit IV is used directly. Any other length is hashed:
/// `J0 = GHASH_H(IV || 0^s || 0^64 || [len(IV)]_64)`. `ghash` must be keyed with `H` and hold no
/// data; it is not modified.
#[must_use]
pub fn derive_j0<const D: usize>(ghash: &GHash<D>, iv: &[u8]) -> Block {
    if let Ok(iv) = <&[u8; FAST_IV_SIZE]>::try_from(iv) {
        return *Keystream::from_iv(iv).j0();
    }

    let mut ghash = ghash.clone();
    ghash.update_padded(iv);
    ghash.fold(&length_block(0, iv.len() as u64));
    ghash.finalize()
}

/// GCM length block `[bits(a)]_64 || [bits(b)]_64` for byte counts `a` and `b`.
pub(crate) fn length_block(a: u64, b: u64) -> Block {
    let mut block = Block::default();
    block[..8].copy_from_slice(&(a * 8).to_be_bytes());
    block[8..].copy_from_slice(&(b * 8).to_be_bytes());
    block
}
