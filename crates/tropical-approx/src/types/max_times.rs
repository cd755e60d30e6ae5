use super::traits::Semiring;

/// Max-times semiring: ⊕ = max, ⊗ = ×, zero = 0, one = 1.
///
/// Domain: finite reals ≥ 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaxTimes;

impl Semiring for MaxTimes {
    fn name(&self) -> &'static str {
        "max-times"
    }

    #[inline]
    fn zero(&self) -> f64 {
        0.0
    }

    #[inline]
    fn one(&self) -> f64 {
        1.0
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        if a >= b {
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
        a.is_finite() && a >= 0.0
    }
}
