use std::fmt::Debug;

use crate::error::{Result, TropicalError};

/// An idempotent semiring over the extended reals.
///
/// Elements are plain `f64` values; the semiring fixes which values are
/// admissible ([`contains`](Semiring::contains)) and which of them act as
/// the absorbing element ([`zero`](Semiring::zero)) and the multiplicative
/// identity ([`one`](Semiring::one)).
///
/// Laws (for all `a`, `b`, `c` in the domain):
/// - `add` is commutative, associative and idempotent (`add(a, a) == a`)
/// - `zero` is the identity of `add` and annihilates `mul`
/// - `one` is the identity of `mul`
/// - `mul` distributes over `add`
///
/// The trait is object safe, and `&S` is a semiring whenever `S` is.
pub trait Semiring: Debug + Send + Sync {
    /// Short name used in diagnostics, e.g. `"max-plus"`.
    fn name(&self) -> &'static str;

    /// The absorbing element (additive identity).
    fn zero(&self) -> f64;

    /// The multiplicative identity.
    fn one(&self) -> f64;

    /// Tropical addition (⊕). Always returns one of its operands.
    fn add(&self, a: f64, b: f64) -> f64;

    /// Tropical multiplication (⊗).
    fn mul(&self, a: f64, b: f64) -> f64;

    /// Raw power `a^p` for a non-zero `a`, without domain checks.
    fn pow_raw(&self, a: f64, p: f64) -> f64;

    /// Multiplicative inverse. Maps `zero` to `zero`.
    fn invert(&self, a: f64) -> f64;

    /// Whether `a` belongs to the value set of this semiring.
    fn contains(&self, a: f64) -> bool;

    /// Checked power `a^p` for a rational (or real) exponent.
    ///
    /// `zero^p` is `zero` for `p > 0` and `one` for `p == 0`; a negative
    /// power of `zero`, an argument outside the domain or a result outside
    /// the domain is a [`TropicalError::Domain`].
    fn pow(&self, a: f64, p: f64) -> Result<f64> {
        let a = self.element(a)?;
        if self.is_zero(a) {
            return if p > 0.0 {
                Ok(self.zero())
            } else if p == 0.0 {
                Ok(self.one())
            } else {
                Err(self.domain_error(a))
            };
        }
        self.element(self.pow_raw(a, p))
    }

    /// Validate that `a` is an element of this semiring.
    fn element(&self, a: f64) -> Result<f64> {
        if self.contains(a) {
            Ok(a)
        } else {
            Err(self.domain_error(a))
        }
    }

    /// Build the domain error for `value`.
    fn domain_error(&self, value: f64) -> TropicalError {
        TropicalError::Domain {
            semiring: self.name(),
            value,
        }
    }

    #[inline]
    fn is_zero(&self, a: f64) -> bool {
        a == self.zero()
    }

    #[inline]
    fn is_one(&self, a: f64) -> bool {
        a == self.one()
    }

    /// `a` strictly wins over `b` under `add` (`a != b` and `a ⊕ b == a`).
    ///
    /// For the max-based semirings this is `a > b`, for the min-based ones
    /// `a < b`.
    #[inline]
    fn dominates(&self, a: f64, b: f64) -> bool {
        a != b && self.add(a, b) == a
    }
}

impl<S: Semiring + ?Sized> Semiring for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn zero(&self) -> f64 {
        (**self).zero()
    }

    fn one(&self) -> f64 {
        (**self).one()
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        (**self).add(a, b)
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        (**self).mul(a, b)
    }

    fn pow_raw(&self, a: f64, p: f64) -> f64 {
        (**self).pow_raw(a, p)
    }

    fn invert(&self, a: f64) -> f64 {
        (**self).invert(a)
    }

    fn contains(&self, a: f64) -> bool {
        (**self).contains(a)
    }

    fn pow(&self, a: f64, p: f64) -> Result<f64> {
        (**self).pow(a, p)
    }
}

/// ⊕-sum of `values`, skipping `zero` terms. Empty sums are `zero`.
pub(crate) fn sum<S, I>(s: &S, values: I) -> f64
where
    S: Semiring + ?Sized,
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| !s.is_zero(*v))
        .fold(s.zero(), |acc, v| {
            if s.is_zero(acc) {
                v
            } else {
                s.add(acc, v)
            }
        })
}
