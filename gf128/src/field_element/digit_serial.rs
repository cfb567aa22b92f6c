//! Digit-serial (comb) multiplication in GF(2^128).
//!
//! Operand `A` is consumed `D` bits at a time, highest-degree digit first, Horner style:
//!
//! ```text
//! acc = 0
//! for each digit a_j of A, from the top:
//!     acc = acc * x^D  mod P
//!     acc = acc + a_j * B  mod P
//! ```
//!
//! `a_j * B` is the XOR of the precomputed multiples `B * x^k` selected by the bits of the
//! digit, and `acc * x^D` folds the `D` bits shifted past `x^127` back in with the key-independent
//! multiples `x^(128 + k) mod P`. Both loops select with masks rather than branches, so the
//! sequence of operations does not depend on operand bits.
//!
//! A hardware datapath retires one digit per clock; [`Multiplier::STEPS`] is that latency. The
//! table of multiples of `B` has `D` entries, which is the resource side of the trade-off.

use super::{FieldElement, R, mul_x};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// Multiplier by a fixed operand `B`, processing `D` bits of the other operand per step.
///
/// `D` must divide 128. `D = 128` is the single-step (combinational) configuration; `D = 1` is
/// fully bit-serial.
#[derive(Clone)]
pub struct Multiplier<const D: usize> {
    /// `B * x^k mod P` for `k` in `0..D`
    table: [u128; D],
}

impl<const D: usize> Multiplier<D> {
    /// Number of digit steps (clock cycles in a hardware rendering) per product.
    pub const STEPS: usize = {
        assert!(D > 0 && D <= 128 && 128 % D == 0, "digit width must divide 128");
        128 / D
    };

    /// `x^(128 + k) mod P` for `k` in `0..D`
    const REDUCTION: [u128; D] = reduction_table::<D>();

    #[allow(clippy::cast_possible_truncation)]
    const SHIFT: u32 = D as u32;

    const DIGIT_MASK: u128 = u128::MAX >> (128 - D);

    /// Precompute the digit table for the fixed operand `b`.
    #[must_use]
    pub fn new(b: FieldElement) -> Self {
        let mut table = [0u128; D];
        let mut v = u128::from(b);
        for entry in &mut table {
            *entry = v;
            v = mul_x(v);
        }
        Self { table }
    }

    /// Compute `a * B`.
    #[must_use]
    pub fn mul(&self, a: FieldElement) -> FieldElement {
        let a = u128::from(a);
        let mut acc = 0u128;

        for step in 0..Self::STEPS {
            // digit `j` holds the coefficients of x^(jD)..x^(jD + D - 1)
            let digit = Self::STEPS - 1 - step;
            let top = 127 - digit * D;

            acc = Self::shift_reduce(acc);
            for (k, multiple) in self.table.iter().enumerate() {
                let bit = (a >> (top - k)) & 1;
                acc ^= multiple & 0u128.wrapping_sub(bit);
            }
        }

        acc.into()
    }

    /// Digit width this multiplier was instantiated with.
    #[must_use]
    pub const fn digit_width(&self) -> usize {
        D
    }

    /// `acc * x^D mod P`
    #[inline]
    fn shift_reduce(acc: u128) -> u128 {
        let overflow = acc & Self::DIGIT_MASK;
        let mut shifted = acc.checked_shr(Self::SHIFT).unwrap_or(0);

        // overflow bit `D - 1 - k` was the coefficient that now sits at x^(128 + k)
        for (k, multiple) in Self::REDUCTION.iter().enumerate() {
            let bit = (overflow >> (D - 1 - k)) & 1;
            shifted ^= multiple & 0u128.wrapping_sub(bit);
        }

        shifted
    }
}

impl<const D: usize> core::fmt::Debug for Multiplier<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Multiplier")
            .field("digit_width", &D)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl<const D: usize> Zeroize for Multiplier<D> {
    fn zeroize(&mut self) {
        self.table.zeroize();
    }
}

const fn reduction_table<const D: usize>() -> [u128; D] {
    let mut table = [0u128; D];
    let mut v = R;
    let mut k = 0;
    while k < D {
        table[k] = v;
        v = mul_x(v);
        k += 1;
    }
    table
}
