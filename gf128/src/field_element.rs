//! GF(2^128) field element in GCM's bit-reflected convention.

pub(crate) mod digit_serial;

use crate::{BLOCK_SIZE, Block};
use core::{
    fmt::{self, Debug},
    ops::{Add, AddAssign, Mul, MulAssign},
};
use digit_serial::Multiplier;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Reduction constant `x^128 mod P`, i.e. `1 + x + x^2 + x^7`, in reflected bit order.
pub(crate) const R: u128 = 0xE1 << 120;

/// Digit width used by the `Mul` operator impl.
const OPERATOR_DIGIT_WIDTH: usize = 8;

/// An element of GCM's binary field.
///
/// This type represents an element of GF(2^128) modulo the irreducible polynomial
/// `x^128 + x^7 + x^2 + x + 1` as described in [NIST SP 800-38D §6.3].
///
/// # Representation
///
/// GCM uses a bit-reflected convention: the first byte of a block holds the coefficients of
/// `x^0..x^7`, with `x^0` in its most significant bit. Internally the element is kept as the
/// big-endian `u128` of the block, so the coefficient of `x^i` lives at bit `127 - i` and
/// multiplication by `x` is a right shift.
///
/// - Addition is XOR.
/// - Multiplication is carryless and reduced modulo the polynomial above.
///
/// [NIST SP 800-38D §6.3]: https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38d.pdf
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct FieldElement(u128);

impl FieldElement {
    /// The multiplicative identity (`x^0`).
    pub const ONE: Self = Self(1 << 127);

    /// Multiply this element by `x`.
    #[inline]
    #[must_use]
    pub const fn mul_x(self) -> Self {
        Self(mul_x(self.0))
    }

    /// Encode this element as a big-endian block.
    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; BLOCK_SIZE] {
        self.0.to_be_bytes()
    }
}

/// Multiply a reflected `u128` by `x`, folding the `x^128` carry back in.
#[inline]
pub(crate) const fn mul_x(v: u128) -> u128 {
    let carry = v & 1;
    (v >> 1) ^ (R & 0u128.wrapping_sub(carry))
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(")?;
        for byte in self.to_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl From<Block> for FieldElement {
    #[inline]
    fn from(block: Block) -> Self {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes.copy_from_slice(&block);
        Self::from(bytes)
    }
}

impl From<&Block> for FieldElement {
    #[inline]
    fn from(block: &Block) -> Self {
        Self::from(*block)
    }
}

impl From<FieldElement> for Block {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        fe.to_bytes().into()
    }
}

impl From<[u8; BLOCK_SIZE]> for FieldElement {
    #[inline]
    fn from(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }
}

impl From<FieldElement> for [u8; BLOCK_SIZE] {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        fe.to_bytes()
    }
}

impl From<u128> for FieldElement {
    #[inline]
    fn from(x: u128) -> Self {
        Self(x)
    }
}

impl From<FieldElement> for u128 {
    #[inline]
    fn from(fe: FieldElement) -> Self {
        fe.0
    }
}

impl Add for FieldElement {
    type Output = Self;

    /// Adds two field elements.
    ///
    /// In a binary field, addition is the equivalent operation to XOR.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for FieldElement {
    type Output = Self;

    /// Perform carryless multiplication modulo GCM's polynomial.
    ///
    /// Builds a one-off digit table for `rhs`; use [`Multiplier`] directly when one operand is
    /// fixed across many products.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Multiplier::<OPERATOR_DIGIT_WIDTH>::new(rhs).mul(self)
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
