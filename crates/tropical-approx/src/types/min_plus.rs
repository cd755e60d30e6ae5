use super::traits::Semiring;

/// Min-plus semiring: ⊕ = min, ⊗ = +, zero = +∞, one = 0.
///
/// Domain: ℝ ∪ {+∞}. The dual of [`MaxPlus`](super::MaxPlus), used for
/// concave approximation and shortest paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MinPlus;

impl Semiring for MinPlus {
    fn name(&self) -> &'static str {
        "min-plus"
    }

    #[inline]
    fn zero(&self) -> f64 {
        f64::INFINITY
    }

    #[inline]
    fn one(&self) -> f64 {
        0.0
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
        a + b
    }

    #[inline]
    fn pow_raw(&self, a: f64, p: f64) -> f64 {
        a * p
    }

    #[inline]
    fn invert(&self, a: f64) -> f64 {
        if self.is_zero(a) {
            a
        } else {
            -a
        }
    }

    #[inline]
    fn contains(&self, a: f64) -> bool {
        !a.is_nan() && a != f64::NEG_INFINITY
    }
}
