use super::traits::Semiring;

/// Min-times semiring: ⊕ = min, ⊗ = ×, zero = +∞, one = 1.
///
/// Domain: reals > 0 together with +∞.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinTimes;

impl Semiring for MinTimes {
    fn name(&self) -> &'static str {
        "min-times"
    }

    #[inline]
    fn zero(&self) -> f64 {
        f64::INFINITY
    }

    #[inline]
    fn one(&self) -> f64 {
        1.0
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        if a <= b {
            a
        } else {
            b
        }
    }

    #[inline]
    fn mul(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    #[inline]
    fn pow_raw(&self, a: f64, p: f64) -> f64 {
        a.powf(p)
    }

    #[inline]
    fn invert(&self, a: f64) -> f64 {
        if self.is_zero(a) {
            a
        } else {
            1.0 / a
        }
    }

    #[inline]
    fn contains(&self, a: f64) -> bool {
        !a.is_nan() && a > 0.0
    }
}
