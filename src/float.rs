//! Scalar capabilities required of bracket endpoints.
//!
//! Bisection over binary floats works on the bit representation: averaging
//! the unsigned integer patterns of two same-signed floats skips half of the
//! representable values between them, so a bracket collapses to an adjacent
//! pair within roughly mantissa-plus-exponent-bits steps. Types without a
//! fixed binary layout fall back to the arithmetic midpoint and report
//! `BITWISE = false`, which routes the bisection entry point to the
//! Alefeld–Potra–Shi solver instead.

use std::fmt::{Debug, Display};

use num_traits::Float;

/// A scalar usable as a bracket endpoint.
///
/// Implementations exist for `f32` and `f64`. An arbitrary-precision type can
/// opt in by setting [`BITWISE`](Bracketable::BITWISE) to `false`, returning
/// [`midpoint`] from [`middle`](Bracketable::middle), and mapping
/// `next_float`/`prev_float` to one representable (or working-precision)
/// step.
pub trait Bracketable: Float + Display + Debug + 'static {
    /// Whether [`middle`](Bracketable::middle) halves the gap in
    /// representable values rather than the arithmetic gap.
    const BITWISE: bool;

    /// A value between `self` and `other` suitable for bisection.
    fn middle(self, other: Self) -> Self;

    /// The next representable value toward `+inf`.
    fn next_float(self) -> Self;

    /// The next representable value toward `-inf`.
    fn prev_float(self) -> Self;
}

macro_rules! impl_bracketable {
    ($t:ty) => {
        impl Bracketable for $t {
            const BITWISE: bool = true;

            fn middle(self, other: Self) -> Self {
                if !self.is_finite() || !other.is_finite() {
                    return self + other;
                }
                // A sign-straddling pair pivots on zero so each half is
                // single-signed, keeping the bit average meaningful.
                if self != 0.0 && other != 0.0 && (self > 0.0) != (other > 0.0) {
                    return 0.0;
                }
                let sum = self.abs().to_bits() + other.abs().to_bits();
                let mid = <$t>::from_bits(sum >> 1);
                if self + other < 0.0 {
                    -mid
                } else {
                    mid
                }
            }

            fn next_float(self) -> Self {
                if self.is_nan() || self == <$t>::INFINITY {
                    return self;
                }
                if self == 0.0 {
                    return <$t>::from_bits(1);
                }
                let bits = self.to_bits();
                if self > 0.0 {
                    <$t>::from_bits(bits + 1)
                } else {
                    <$t>::from_bits(bits - 1)
                }
            }

            fn prev_float(self) -> Self {
                if self.is_nan() || self == <$t>::NEG_INFINITY {
                    return self;
                }
                if self == 0.0 {
                    return -<$t>::from_bits(1);
                }
                let bits = self.to_bits();
                if self > 0.0 {
                    <$t>::from_bits(bits - 1)
                } else {
                    <$t>::from_bits(bits + 1)
                }
            }
        }
    };
}

impl_bracketable!(f32);
impl_bracketable!(f64);

/// Arithmetic midpoint that stays finite when `a + b` overflows.
pub fn midpoint<T: Float>(a: T, b: T) -> T {
    let half = T::from(0.5).unwrap();
    let mid = half * (a + b);
    if mid.is_finite() {
        mid
    } else {
        half * a + half * b
    }
}

/// Lossy view of a generic scalar for error reporting.
pub(crate) fn as_f64<T: Bracketable>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_within_one_binade_is_arithmetic() {
        // All floats in [1, 2) share an exponent, so the bit average is the
        // ordinary midpoint there.
        assert_eq!(1.0f64.middle(2.0), 1.5);
        assert_eq!(3.0f64.middle(4.0), 3.5);
    }

    #[test]
    fn middle_spans_binades_geometrically() {
        // Across many binades the bit average tracks the order of magnitude,
        // not the arithmetic mean.
        let m = 1.0f64.middle(1e300);
        assert!(m > 1e140 && m < 1e160, "m = {m}");
        let m = 1e-100f64.middle(1e100);
        assert!(m > 1e-2 && m < 1e2, "m = {m}");
    }

    #[test]
    fn middle_of_opposite_signs_is_zero() {
        assert_eq!((-1.0f64).middle(2.0), 0.0);
        assert_eq!(3.0f64.middle(-4.0), 0.0);
    }

    #[test]
    fn middle_of_negative_pair_is_negative() {
        let m = (-2.0f64).middle(-1.0);
        assert!(-2.0 < m && m < -1.0);
        assert_eq!(m, -1.5);
    }

    #[test]
    fn middle_stays_inside_same_sign_brackets() {
        let pairs = [(0.0f64, 1.0), (1e-308, 1e308), (2.5, 2.6), (1.0, 1.0 + f64::EPSILON)];
        for (x, y) in pairs {
            let m = x.middle(y);
            assert!(x <= m && m <= y, "middle({x}, {y}) = {m}");
        }
    }

    #[test]
    fn middle_propagates_non_finite() {
        assert!(f64::NAN.middle(1.0).is_nan());
        assert!(1.0f64.middle(f64::NAN).is_nan());
        assert_eq!(f64::INFINITY.middle(1.0), f64::INFINITY);
    }

    #[test]
    fn float_neighbors_step_one_ulp() {
        assert_eq!(1.0f64.next_float(), 1.0 + f64::EPSILON);
        assert_eq!((1.0 + f64::EPSILON).prev_float(), 1.0);
        assert_eq!(0.0f64.next_float(), f64::from_bits(1));
        assert_eq!(0.0f64.prev_float(), -f64::from_bits(1));
        assert!((-1.0f64).next_float() > -1.0);
        assert_eq!(f64::INFINITY.next_float(), f64::INFINITY);
    }

    #[test]
    fn midpoint_survives_overflow() {
        let m = midpoint(f64::MAX, f64::MAX / 2.0);
        assert!(m.is_finite());
        assert!(m > f64::MAX / 2.0 && m < f64::MAX);
    }

    #[test]
    fn single_precision_middle_matches_double_behavior() {
        assert_eq!(1.0f32.middle(2.0), 1.5);
        assert_eq!((-1.0f32).middle(2.0), 0.0);
    }
}
