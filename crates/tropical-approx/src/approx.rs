//! Tropical polynomial and rational approximation of sampled data.
//!
//! A tropical Laurent (or, with `d > 1`, Puiseux) polynomial
//!
//! ```text
//! P(x) = ⊕_{m = m_left..m_right} θ_m ⊗ x^(m/d)
//! ```
//!
//! is fitted to samples `(x_i, y_i)` in the Chebyshev sense. The one-sided
//! fit is closed form; the rational fit `P ⊗ Q⁻¹` runs the
//! [two-sided solver](crate::solver) on `X ⊗ θ = (Y ⊗ X) ⊗ σ`, where `X` is
//! the [`exponent_matrix`] and `Y` the [`diagonal_matrix`] of the values.
//!
//! In max-plus, convex data is fitted from below by a polynomial; use
//! min-plus for concave data.

use crate::error::{Result, TropicalError};
use crate::matrix::Matrix;
use crate::ops::{multiply, pseudo_inverse, scalar_multiply};
use crate::solver::{Termination, TwoSidedSolver};
use crate::types::{sum, Semiring};

/// Exponents `m_left/d, (m_left+1)/d, …, m_right/d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExponentRange {
    pub m_left: i32,
    pub m_right: i32,
    pub d: u32,
}

impl ExponentRange {
    /// Integer exponents `m_left..=m_right` (Laurent polynomials).
    pub fn new(m_left: i32, m_right: i32) -> Self {
        Self {
            m_left,
            m_right,
            d: 1,
        }
    }

    /// Fractional exponents with denominator `d` (Puiseux polynomials).
    pub fn puiseux(m_left: i32, m_right: i32, d: u32) -> Self {
        Self { m_left, m_right, d }
    }

    /// Number of exponents in the range.
    pub fn len(&self) -> usize {
        if self.m_right < self.m_left {
            0
        } else {
            (i64::from(self.m_right) - i64::from(self.m_left) + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The exponents as real numbers, in increasing order.
    pub fn exponents(&self) -> Vec<f64> {
        (self.m_left..=self.m_right)
            .map(|m| f64::from(m) / f64::from(self.d))
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.m_right < self.m_left {
            return Err(TropicalError::Configuration(format!(
                "m_right ({}) must not be less than m_left ({})",
                self.m_right, self.m_left
            )));
        }
        if self.d == 0 {
            return Err(TropicalError::Configuration(
                "exponent denominator d must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// `X[i,j] = points[i]^((m_left + j) / d)`, one row per sample point.
///
/// # Errors
/// [`TropicalError::Configuration`] for empty `points`, `m_right < m_left`
/// or `d == 0`; [`TropicalError::Domain`] if a power is undefined.
pub fn exponent_matrix<S: Semiring + ?Sized>(
    points: &[f64],
    range: ExponentRange,
    s: &S,
) -> Result<Matrix> {
    range.check()?;
    if points.is_empty() {
        return Err(TropicalError::Configuration(
            "no sample points given".to_string(),
        ));
    }
    let exponents = range.exponents();
    Matrix::try_from_fn(points.len(), exponents.len(), |i, j| {
        s.pow(points[i], exponents[j])
    })
}

/// Square matrix with `values` on the diagonal and zero elsewhere.
///
/// # Errors
/// [`TropicalError::Configuration`] for empty `values`,
/// [`TropicalError::Domain`] for a value outside the domain.
pub fn diagonal_matrix<S: Semiring + ?Sized>(values: &[f64], s: &S) -> Result<Matrix> {
    if values.is_empty() {
        return Err(TropicalError::Configuration(
            "no sample values given".to_string(),
        ));
    }
    for &v in values {
        s.element(v)?;
    }
    Matrix::from_fn(values.len(), values.len(), |i, j| {
        if i == j {
            values[i]
        } else {
            s.zero()
        }
    })
}

/// A tropical polynomial `⊕_j c_j ⊗ x^(e_j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TropicalPolynomial {
    coefficients: Vec<f64>,
    exponents: Vec<f64>,
}

impl TropicalPolynomial {
    /// Pair the entries of a coefficient column vector with `range`.
    pub fn from_coefficients(coefficients: &Matrix, range: ExponentRange) -> Result<Self> {
        range.check()?;
        if coefficients.shape() != (range.len(), 1) {
            return Err(TropicalError::Shape(format!(
                "expected {}x1 coefficient vector, got {}x{}",
                range.len(),
                coefficients.rows(),
                coefficients.cols()
            )));
        }
        Ok(Self {
            coefficients: coefficients.as_slice().to_vec(),
            exponents: range.exponents(),
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn exponents(&self) -> &[f64] {
        &self.exponents
    }

    /// Tropical value at `x`; terms with a zero coefficient are skipped.
    pub fn evaluate<S: Semiring + ?Sized>(&self, x: f64, s: &S) -> Result<f64> {
        let mut terms = Vec::with_capacity(self.coefficients.len());
        for (&c, &e) in self.coefficients.iter().zip(&self.exponents) {
            if !s.is_zero(c) {
                terms.push(s.mul(c, s.pow(x, e)?));
            }
        }
        Ok(sum(s, terms))
    }
}

/// Result of [`fit_polynomial`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    pub polynomial: TropicalPolynomial,
    /// Chebyshev error measure; the maximal deviation is `Δ^(1/2)`.
    pub delta: f64,
}

impl PolynomialFit {
    pub fn evaluate<S: Semiring + ?Sized>(&self, x: f64, s: &S) -> Result<f64> {
        self.polynomial.evaluate(x, s)
    }
}

/// Fit a tropical polynomial to `values` sampled at `points`.
///
/// ```text
/// important = PI(PI(y) ⊗ X)
/// Δ         = (PI(X ⊗ important) ⊗ y)[0,0]
/// θ         = important ⊗ Δ^(1/2)
/// ```
///
/// # Example
///
/// ```
/// use tropical_approx::approx::{fit_polynomial, ExponentRange};
/// use tropical_approx::MaxPlus;
///
/// // |x| = max(-x, 0, x) is a max-plus polynomial
/// let fit = fit_polynomial(&[-1.0, 0.0, 1.0], &[1.0, 0.0, 1.0], ExponentRange::new(-1, 1), &MaxPlus).unwrap();
/// assert_eq!(fit.delta, 0.0);
/// assert_eq!(fit.evaluate(-2.0, &MaxPlus).unwrap(), 2.0);
/// ```
pub fn fit_polynomial<S: Semiring + ?Sized>(
    points: &[f64],
    values: &[f64],
    range: ExponentRange,
    s: &S,
) -> Result<PolynomialFit> {
    check_samples(points, values)?;
    let x = exponent_matrix(points, range, s)?;
    let y = Matrix::column_vector(values)?;
    y.validate(s)?;

    let important = pseudo_inverse(&multiply(&pseudo_inverse(&y, s), &x, s)?, s);
    let x_important = pseudo_inverse(&multiply(&x, &important, s)?, s);
    let delta = multiply(&x_important, &y, s)?[(0, 0)];
    let theta = scalar_multiply(&important, s.pow(delta, 0.5)?, s)?;

    Ok(PolynomialFit {
        polynomial: TropicalPolynomial::from_coefficients(&theta, range)?,
        delta,
    })
}

/// Result of [`fit_rational`]: `P ⊗ Q⁻¹`.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalFit {
    pub numerator: TropicalPolynomial,
    pub denominator: TropicalPolynomial,
    pub delta: f64,
    pub termination: Termination,
}

impl RationalFit {
    /// `P(x) ⊗ Q(x)⁻¹`.
    pub fn evaluate<S: Semiring + ?Sized>(&self, x: f64, s: &S) -> Result<f64> {
        let p = self.numerator.evaluate(x, s)?;
        let q = self.denominator.evaluate(x, s)?;
        Ok(s.mul(p, s.invert(q)))
    }
}

/// Fit a tropical rational function to `values` sampled at `points` by
/// solving `X ⊗ θ = (Y ⊗ X) ⊗ σ` with the two-sided solver.
pub fn fit_rational<S: Semiring + ?Sized>(
    points: &[f64],
    values: &[f64],
    range: ExponentRange,
    s: &S,
) -> Result<RationalFit> {
    check_samples(points, values)?;
    let x = exponent_matrix(points, range, s)?;
    let y = diagonal_matrix(values, s)?;
    let yx = multiply(&y, &x, s)?;

    let solution = TwoSidedSolver::new(s).solve(&x, &yx)?;
    Ok(RationalFit {
        numerator: TropicalPolynomial::from_coefficients(&solution.theta, range)?,
        denominator: TropicalPolynomial::from_coefficients(&solution.sigma, range)?,
        delta: solution.delta,
        termination: solution.termination,
    })
}

fn check_samples(points: &[f64], values: &[f64]) -> Result<()> {
    if points.len() != values.len() {
        return Err(TropicalError::Shape(format!(
            "{} sample points but {} values",
            points.len(),
            values.len()
        )));
    }
    Ok(())
}
