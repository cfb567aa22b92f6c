//! **GHASH**: universal hash over GF(2^128) used by AES-GCM.

use crate::{Block, FieldElement, Key, Multiplier, Tag};
use core::fmt::{self, Debug};
use universal_hash::{
    KeyInit, Reset, UhfBackend, UhfClosure, UniversalHash,
    consts::{U1, U16},
    crypto_common::{BlockSizeUser, KeySizeUser, ParBlocksSizeUser},
};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// **GHASH** accumulator.
///
/// Holds the hash subkey `H` (as a digit-serial [`Multiplier`]) and the running value `Y`. Every
/// block folded in updates `Y = (Y + X) * H`. The caller is responsible for zero-padding partial
/// blocks and for appending the GCM length block; [`UniversalHash::update_padded`] covers the
/// former.
///
/// `D` is the multiplier digit width, see [`Multiplier`].
#[derive(Clone)]
pub struct GHash<const D: usize = 128> {
    /// Multiplier by the hash subkey `H`, frozen for the lifetime of the key
    h: Multiplier<D>,

    /// Field element representing the computed universal hash
    y: FieldElement,
}

impl<const D: usize> GHash<D> {
    /// Initialize GHASH with the given `H` field element.
    #[must_use]
    pub fn new(h: &Key) -> Self {
        Self {
            h: Multiplier::new(h.into()),
            y: FieldElement::default(),
        }
    }

    /// Fold one full block into the accumulator.
    #[inline]
    pub fn fold(&mut self, x: &Block) {
        self.y = self.h.mul(self.y + FieldElement::from(x));
    }

    /// Current accumulator value, without consuming or resetting it.
    #[must_use]
    pub fn value(&self) -> Tag {
        self.y.into()
    }
}

impl<const D: usize> KeySizeUser for GHash<D> {
    type KeySize = U16;
}

impl<const D: usize> KeyInit for GHash<D> {
    /// Initialize GHASH with the given `H` field element
    #[inline]
    fn new(h: &Key) -> Self {
        Self::new(h)
    }
}

impl<const D: usize> BlockSizeUser for GHash<D> {
    type BlockSize = U16;
}

impl<const D: usize> ParBlocksSizeUser for GHash<D> {
    type ParBlocksSize = U1;
}

impl<const D: usize> UhfBackend for GHash<D> {
    fn proc_block(&mut self, x: &Block) {
        self.fold(x);
    }
}

impl<const D: usize> UniversalHash for GHash<D> {
    fn update_with_backend(&mut self, f: impl UhfClosure<BlockSize = Self::BlockSize>) {
        f.call(self);
    }

    /// Get GHASH output
    #[inline]
    fn finalize(self) -> Tag {
        self.y.into()
    }
}

impl<const D: usize> Reset for GHash<D> {
    fn reset(&mut self) {
        self.y = FieldElement::default();
    }
}

impl<const D: usize> Debug for GHash<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("GHash")
            .field("digit_width", &D)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl<const D: usize> Drop for GHash<D> {
    fn drop(&mut self) {
        self.h.zeroize();
        self.y.zeroize();
    }
}
