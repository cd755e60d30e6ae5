use super::traits::Semiring;

/// Max-plus semiring: ⊕ = max, ⊗ = +, zero = −∞, one = 0.
///
/// Domain: ℝ ∪ {−∞}. Used for convex approximation and longest-path style
/// closures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaxPlus;

impl Semiring for MaxPlus {
    fn name(&self) -> &'static str {
        "max-plus"
    }

    #[inline]
    fn zero(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn one(&self) -> f64 {
        0.0
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
        !a.is_nan() && a != f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maxplus_operations() {
        let s = MaxPlus;
        // 3 ⊕ 5 = max(3, 5)
        assert_eq!(s.add(3.0, 5.0), 5.0);
        // 3 ⊗ 5 = 3 + 5
        assert_eq!(s.mul(3.0, 5.0), 8.0);
        assert_eq!(s.add(s.zero(), 4.0), 4.0);
        assert_eq!(s.mul(s.one(), 4.0), 4.0);
    }

    #[test]
    fn test_maxplus_pow_and_invert() {
        let s = MaxPlus;
        // x^p is p·x
        assert_eq!(s.pow(8.0, 1.0 / 2.0).unwrap(), 4.0);
        assert_eq!(s.pow(-2.0, 3.0).unwrap(), -6.0);
        assert_eq!(s.invert(3.0), -3.0);
        assert_eq!(s.invert(s.zero()), s.zero());
    }

    #[test]
    fn test_maxplus_domain() {
        let s = MaxPlus;
        assert!(s.contains(f64::NEG_INFINITY));
        assert!(s.contains(-7.5));
        assert!(!s.contains(f64::INFINITY));
        assert!(!s.contains(f64::NAN));
        assert!(s.element(f64::INFINITY).is_err());
    }
}
