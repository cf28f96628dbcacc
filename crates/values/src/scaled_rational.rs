//! Exact `raw / divisor` numbers.
//!
//! Account data stores amounts as integers with an implied divisor (token
//! decimals, price exponents). Values with different divisors are only
//! combined after rebasing both onto the smaller of the two divisors.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};
use tracing::trace;

use crate::ValueError;

/// Arbitrary-precision fraction `raw / divisor`. The divisor is never zero.
///
/// Equality is structural: `1/2` and `2/4` are different values until one is
/// rebased onto the other's divisor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScaledRational {
    raw: BigInt,
    divisor: BigUint,
}

impl ScaledRational {
    pub fn new(raw: impl Into<BigInt>, divisor: impl Into<BigUint>) -> Result<Self, ValueError> {
        let divisor = divisor.into();
        if divisor.is_zero() {
            return Err(ValueError::ZeroDivisor);
        }
        Ok(Self {
            raw: raw.into(),
            divisor,
        })
    }

    pub fn from_u64(raw: u64, divisor: u64) -> Result<Self, ValueError> {
        Self::new(raw, divisor)
    }

    /// `raw / 10^decimals`, the usual token-amount scaling.
    pub fn from_decimals(raw: impl Into<BigInt>, decimals: u32) -> Self {
        Self {
            raw: raw.into(),
            divisor: BigUint::from(10u32).pow(decimals),
        }
    }

    pub fn raw(&self) -> &BigInt {
        &self.raw
    }

    pub fn divisor(&self) -> &BigUint {
        &self.divisor
    }

    pub fn into_parts(self) -> (BigInt, BigUint) {
        (self.raw, self.divisor)
    }

    /// The same quotient over `new_divisor`: `raw * new_divisor / divisor`,
    /// truncated toward zero. A smaller divisor loses precision.
    pub fn rebase(&self, new_divisor: impl Into<BigUint>) -> Result<Self, ValueError> {
        let mut out = self.clone();
        out.rebase_in_place(new_divisor)?;
        Ok(out)
    }

    /// In-place [`rebase`](Self::rebase). On error the value is unchanged.
    pub fn rebase_in_place(&mut self, new_divisor: impl Into<BigUint>) -> Result<(), ValueError> {
        let new_divisor = new_divisor.into();
        if new_divisor.is_zero() {
            return Err(ValueError::ZeroDivisor);
        }
        if new_divisor == self.divisor {
            return Ok(());
        }
        if new_divisor < self.divisor {
            trace!(from = %self.divisor, to = %new_divisor, "rebasing onto a smaller divisor");
        }
        self.raw = rescale(&self.raw, &self.divisor, &new_divisor);
        self.divisor = new_divisor;
        Ok(())
    }

    /// Approximate quotient for display. Never feed this back into arithmetic.
    pub fn display_value(&self) -> f64 {
        let divisor = BigInt::from(self.divisor.clone());
        let whole = &self.raw / &divisor;
        let frac = &self.raw % &divisor;
        let whole = whole.to_f64().unwrap_or(f64::NAN);
        let frac = frac.to_f64().unwrap_or(f64::NAN) / divisor.to_f64().unwrap_or(f64::NAN);
        whole + frac
    }

    /// `self / other` over the common divisor: `raw = a * divisor / b`.
    pub fn checked_div(&self, other: &Self) -> Result<Self, ValueError> {
        let (a, b, divisor) = normalize(self, other);
        if b.is_zero() {
            return Err(ValueError::ZeroDivisor);
        }
        let raw = a * BigInt::from(divisor.clone()) / b;
        Ok(Self { raw, divisor })
    }

    fn combine(&self, other: &Self, op: impl FnOnce(BigInt, BigInt, &BigUint) -> BigInt) -> Self {
        let (a, b, divisor) = normalize(self, other);
        let raw = op(a, b, &divisor);
        Self { raw, divisor }
    }
}

/// `raw / from` re-expressed over `to`, truncated toward zero.
fn rescale(raw: &BigInt, from: &BigUint, to: &BigUint) -> BigInt {
    raw * BigInt::from(to.clone()) / BigInt::from(from.clone())
}

/// Raw values of both operands over the smaller of their divisors.
fn normalize(a: &ScaledRational, b: &ScaledRational) -> (BigInt, BigInt, BigUint) {
    use std::cmp::Ordering;

    match a.divisor.cmp(&b.divisor) {
        Ordering::Equal => (a.raw.clone(), b.raw.clone(), a.divisor.clone()),
        Ordering::Less => (
            a.raw.clone(),
            rescale(&b.raw, &b.divisor, &a.divisor),
            a.divisor.clone(),
        ),
        Ordering::Greater => (
            rescale(&a.raw, &a.divisor, &b.divisor),
            b.raw.clone(),
            b.divisor.clone(),
        ),
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&ScaledRational> for &ScaledRational {
            type Output = ScaledRational;

            fn $method(self, other: &ScaledRational) -> ScaledRational {
                self.combine(other, $op)
            }
        }

        impl $trait for ScaledRational {
            type Output = ScaledRational;

            fn $method(self, other: ScaledRational) -> ScaledRational {
                (&self).$method(&other)
            }
        }
    };
}

binary_op!(Add, add, |a, b, _| a + b);
binary_op!(Sub, sub, |a, b, _| a - b);
binary_op!(Mul, mul, |a, b, d: &BigUint| a * b / BigInt::from(d.clone()));

impl fmt::Display for ScaledRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.raw, self.divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(raw: i64, divisor: u64) -> ScaledRational {
        ScaledRational::new(raw, divisor).unwrap()
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert_eq!(ScaledRational::new(1, 0u32), Err(ValueError::ZeroDivisor));
        assert_eq!(r(1, 10).rebase(0u32), Err(ValueError::ZeroDivisor));
    }

    #[test]
    fn rebase_scales_raw_value() {
        let v = r(12_345, 100);
        assert_eq!(v.rebase(10_000u32).unwrap(), r(1_234_500, 10_000));
        assert_eq!(v.rebase(10u32).unwrap(), r(1_234, 10));
    }

    #[test]
    fn rebase_truncates_toward_zero() {
        assert_eq!(r(-12_345, 100).rebase(10u32).unwrap(), r(-1_234, 10));
        assert_eq!(r(19, 10).rebase(1u32).unwrap(), r(1, 1));
        assert_eq!(r(-19, 10).rebase(1u32).unwrap(), r(-1, 1));
    }

    #[test]
    fn rebase_in_place_leaves_value_on_error() {
        let mut v = r(5, 10);
        assert_eq!(v.rebase_in_place(0u32), Err(ValueError::ZeroDivisor));
        assert_eq!(v, r(5, 10));
        v.rebase_in_place(100u32).unwrap();
        assert_eq!(v, r(50, 100));
    }

    #[test]
    fn display_value() {
        assert_eq!(r(150, 100).display_value(), 1.5);
        assert_eq!(r(-25, 100).display_value(), -0.25);
        assert_eq!(ScaledRational::from_decimals(1_000_000_000, 9).display_value(), 1.0);
        assert_eq!(r(3, 4).to_string(), "3/4");
    }

    #[test]
    fn arithmetic_uses_smaller_divisor() {
        let a = r(150, 100); // 1.5
        let b = r(2_500, 1_000); // 2.5
        assert_eq!(&a + &b, r(400, 100));
        assert_eq!(&b - &a, r(100, 100));
        assert_eq!(&a - &b, r(-100, 100));
        assert_eq!(&a * &b, r(375, 100));
        assert_eq!(a.checked_div(&b).unwrap(), r(60, 100));
        assert_eq!(a.clone() + b.clone(), &a + &b);
    }

    #[test]
    fn division_by_zero_value() {
        assert_eq!(r(1, 10).checked_div(&r(0, 10)), Err(ValueError::ZeroDivisor));
        // 0.001 vanishes when brought onto divisor 10.
        assert_eq!(r(1, 10).checked_div(&r(1, 1_000)), Err(ValueError::ZeroDivisor));
    }
}
