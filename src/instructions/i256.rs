//! Two's-complement interpretation of the 256-bit machine word, as needed
//! by SDIV, SMOD, SLT, SGT and SAR.

use core::cmp::Ordering;
use core::ops::{Div, Rem};
use ethereum_types::U256;

/// Sign of an [`I256`]. Zero is always `NoSign`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sign {
    Plus,
    Minus,
    NoSign,
}

/// Magnitude of the most negative representable value, `2^255`.
pub(crate) const MIN_NEGATIVE_MAGNITUDE: U256 = U256([0, 0, 0, 0x8000_0000_0000_0000]);

/// Signed 256-bit integer in sign-and-magnitude form.
///
/// Conversions to and from [`U256`] apply the two's-complement encoding; the
/// arithmetic operators carry the EVM's conventions (division by zero yields
/// zero, `MIN / -1` wraps back to `MIN`, remainder takes the dividend sign).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct I256(pub(crate) Sign, pub(crate) U256);

#[inline]
fn twos_complement(v: U256) -> U256 {
    (!v).overflowing_add(U256::one()).0
}

impl I256 {
    pub(crate) fn zero() -> Self {
        I256(Sign::NoSign, U256::zero())
    }

    fn new(sign: Sign, magnitude: U256) -> Self {
        if magnitude.is_zero() {
            Self::zero()
        } else {
            I256(sign, magnitude)
        }
    }

    fn min_negative() -> Self {
        I256(Sign::Minus, MIN_NEGATIVE_MAGNITUDE)
    }
}

impl From<U256> for I256 {
    fn from(v: U256) -> Self {
        if v.is_zero() {
            Self::zero()
        } else if v.bit(255) {
            I256(Sign::Minus, twos_complement(v))
        } else {
            I256(Sign::Plus, v)
        }
    }
}

impl From<I256> for U256 {
    fn from(v: I256) -> Self {
        match v.0 {
            Sign::Plus | Sign::NoSign => v.1,
            Sign::Minus => twos_complement(v.1),
        }
    }
}

impl Div for I256 {
    type Output = I256;

    fn div(self, rhs: Self) -> Self {
        if rhs.1.is_zero() {
            return Self::zero();
        }
        if self == Self::min_negative() && rhs.0 == Sign::Minus && rhs.1 == U256::one() {
            return Self::min_negative();
        }

        let magnitude = self.1 / rhs.1;
        let sign = if self.0 == rhs.0 { Sign::Plus } else { Sign::Minus };
        Self::new(sign, magnitude)
    }
}

impl Rem for I256 {
    type Output = I256;

    fn rem(self, rhs: Self) -> Self {
        if rhs.1.is_zero() {
            return Self::zero();
        }

        // Truncated remainder: the result carries the dividend's sign.
        Self::new(self.0, self.1 % rhs.1)
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Sign::Minus, Sign::Plus | Sign::NoSign) => Ordering::Less,
            (Sign::Plus | Sign::NoSign, Sign::Minus) => Ordering::Greater,
            // Both negative: the larger magnitude is the smaller value.
            (Sign::Minus, Sign::Minus) => other.1.cmp(&self.1),
            _ => self.1.cmp(&other.1),
        }
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn neg(v: u64) -> U256 {
        twos_complement(U256::from(v))
    }

    #[test]
    fn roundtrip() {
        for raw in [
            U256::zero(),
            u(1),
            u(0xffff_ffff),
            neg(1),
            neg(12345),
            MIN_NEGATIVE_MAGNITUDE,
            U256::MAX,
        ] {
            assert_eq!(U256::from(I256::from(raw)), raw);
        }
    }

    #[test]
    fn signed_division() {
        let div = |a: U256, b: U256| U256::from(I256::from(a) / I256::from(b));

        assert_eq!(div(u(100), u(7)), u(14));
        assert_eq!(div(neg(100), u(7)), neg(14));
        assert_eq!(div(u(100), neg(7)), neg(14));
        assert_eq!(div(neg(100), neg(7)), u(14));

        // Division by zero yields zero.
        assert_eq!(div(u(100), U256::zero()), U256::zero());

        // The overflow case wraps back to MIN.
        assert_eq!(
            div(MIN_NEGATIVE_MAGNITUDE, U256::MAX),
            MIN_NEGATIVE_MAGNITUDE
        );
    }

    #[test]
    fn signed_remainder() {
        let rem = |a: U256, b: U256| U256::from(I256::from(a) % I256::from(b));

        assert_eq!(rem(u(100), u(7)), u(2));
        assert_eq!(rem(neg(100), u(7)), neg(2));
        assert_eq!(rem(u(100), neg(7)), u(2));
        assert_eq!(rem(neg(100), neg(7)), neg(2));
        assert_eq!(rem(u(100), U256::zero()), U256::zero());
    }

    #[test]
    fn ordering() {
        let i = |v: U256| I256::from(v);

        assert!(i(neg(2)) < i(neg(1)));
        assert!(i(neg(1)) < i(U256::zero()));
        assert!(i(U256::zero()) < i(u(1)));
        assert!(i(u(1)) < i(u(2)));
        assert!(i(MIN_NEGATIVE_MAGNITUDE) < i(neg(1)));
        assert!(i(MIN_NEGATIVE_MAGNITUDE) < i(u(1)));
    }
}
