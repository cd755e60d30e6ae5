//! Traces, spectral radius and the Kleene star (semiring closure).
//!
//! For a square `n×n` matrix `M`:
//!
//! ```text
//! tr(M)  = ⊕_i M[i,i]
//! Tr(M)  = ⊕_{k=1..n} tr(M^k)
//! λ(M)   = ⊕_{k=1..n} tr(M^k)^(1/k)        (spectral radius)
//! M*     = I ⊕ M ⊕ M² ⊕ … ⊕ M^(n-1)        (defined iff Tr(M) ≤ one)
//! ```
//!
//! In max-plus, `λ(M)` is the maximum cycle mean of the weighted graph of
//! `M`, and `Tr(M) ≤ 0` says that no cycle has positive weight, which is
//! exactly when the closure stabilizes after `n` terms.

use tracing::debug;

use crate::error::{Result, TropicalError};
use crate::matrix::Matrix;
use crate::ops::{add, identity_matrix, matrix_powers, multiply, require_square, MatrixPowers};
use crate::types::{sum, Semiring};

/// Default cap on the number of partial sums produced by [`KleeneStarIter`].
pub const DEFAULT_MAX_TERMS: usize = 10_000;

/// Trace (`tr`): ⊕-sum of the diagonal, skipping zero entries.
///
/// # Errors
/// [`TropicalError::Shape`] for a non-square matrix.
pub fn trace<S: Semiring + ?Sized>(matrix: &Matrix, s: &S) -> Result<f64> {
    require_square(matrix)?;
    Ok(diagonal_sum(matrix, s))
}

fn diagonal_sum<S: Semiring + ?Sized>(matrix: &Matrix, s: &S) -> f64 {
    sum(s, (0..matrix.rows()).map(|i| matrix[(i, i)]))
}

/// Power-sum trace (`Tr`): `⊕_{k=1..n} tr(M^k)`.
///
/// ```
/// use tropical_approx::{trace_sum, Matrix, MaxPlus, Semiring};
///
/// let z = MaxPlus.zero();
/// let a = Matrix::from_rows(&[[2.0, 1.0, z], [5.0, 2.0, -1.0], [3.0, 0.0, 1.0]]).unwrap();
/// assert_eq!(trace_sum(&a, &MaxPlus).unwrap(), 8.0);
/// ```
pub fn trace_sum<S: Semiring + ?Sized>(matrix: &Matrix, s: &S) -> Result<f64> {
    let powers = matrix_powers(matrix, matrix.rows(), s, false)?;
    Ok(trace_sum_of(&powers, matrix.rows(), s))
}

fn trace_sum_of<S: Semiring + ?Sized>(powers: &MatrixPowers, n: usize, s: &S) -> f64 {
    sum(s, (1..=n).filter_map(|k| powers.power(k)).map(|p| diagonal_sum(p, s)))
}

/// Spectral radius: `⊕_{k=1..n} tr(M^k)^(1/k)`.
///
/// Zero traces are skipped; if every trace is zero the result is zero.
///
/// # Errors
/// [`TropicalError::Shape`] for a non-square matrix,
/// [`TropicalError::Domain`] if a root is undefined in `s`.
pub fn spectral_radius<S: Semiring + ?Sized>(matrix: &Matrix, s: &S) -> Result<f64> {
    let n = matrix.rows();
    let powers = matrix_powers(matrix, n, s, false)?;
    let mut roots = Vec::with_capacity(n);
    for k in 1..=n {
        if let Some(p) = powers.power(k) {
            let t = diagonal_sum(p, s);
            if !s.is_zero(t) {
                roots.push(s.pow(t, 1.0 / k as f64)?);
            }
        }
    }
    Ok(sum(s, roots))
}

/// Outcome of [`try_kleene_star`].
#[derive(Debug, Clone, PartialEq)]
pub enum Closure {
    /// `Tr(M) ≤ one`: the full closure `I ⊕ M ⊕ … ⊕ M^(n-1)`.
    Exact(Matrix),
    /// The closure diverges; `matrix` is `I ⊕ M ⊕ … ⊕ M^highest_power`.
    Partial {
        matrix: Matrix,
        highest_power: usize,
    },
}

impl Closure {
    pub fn is_exact(&self) -> bool {
        matches!(self, Closure::Exact(_))
    }

    /// The matrix, whether exact or partial.
    pub fn matrix(&self) -> &Matrix {
        match self {
            Closure::Exact(m) => m,
            Closure::Partial { matrix, .. } => matrix,
        }
    }

    pub fn into_matrix(self) -> Matrix {
        match self {
            Closure::Exact(m) => m,
            Closure::Partial { matrix, .. } => matrix,
        }
    }

    /// The exact closure, or `None` for a partial sum.
    pub fn exact(self) -> Option<Matrix> {
        match self {
            Closure::Exact(m) => Some(m),
            Closure::Partial { .. } => None,
        }
    }
}

/// Kleene star `M* = I ⊕ M ⊕ … ⊕ M^(n-1)`.
///
/// # Errors
/// [`TropicalError::Shape`] for a non-square matrix and
/// [`TropicalError::NotWellDefined`] when `Tr(M)` exceeds `one` in the
/// semiring order. Use [`try_kleene_star`] for a non-failing variant.
///
/// # Example
///
/// ```
/// use tropical_approx::{kleene_star, Matrix, MaxPlus, Semiring};
///
/// let z = MaxPlus.zero();
/// let m = Matrix::from_rows(&[[z, 1.0, 1.0], [z, z, 1.0], [-2.0, -1.0, z]]).unwrap();
/// let star = kleene_star(&m, &MaxPlus).unwrap();
/// assert_eq!(star, Matrix::from_rows(&[[0.0, 1.0, 2.0], [-1.0, 0.0, 1.0], [-2.0, -1.0, 0.0]]).unwrap());
/// ```
pub fn kleene_star<S: Semiring + ?Sized>(matrix: &Matrix, s: &S) -> Result<Matrix> {
    let n = matrix.rows();
    let powers = matrix_powers(matrix, n, s, true)?;
    let tr = trace_sum_of(&powers, n, s);
    if s.dominates(tr, s.one()) {
        debug!(trace = tr, semiring = s.name(), "Kleene star not well defined");
        return Err(TropicalError::NotWellDefined {
            trace: tr,
            one: s.one(),
        });
    }
    partial_sum(&powers, n - 1, s)
}

/// Closure that does not reject a diverging square matrix.
///
/// Returns [`Closure::Exact`] when the Kleene star is well defined.
/// Otherwise returns [`Closure::Partial`] holding `I ⊕ M ⊕ … ⊕ M^k`, where
/// `k` defaults to `cols - 1`; powers beyond `M^n` are computed on demand.
///
/// # Errors
/// [`TropicalError::Shape`] for a non-square matrix,
/// [`TropicalError::Domain`] when a power leaves the semiring domain.
pub fn try_kleene_star<S: Semiring + ?Sized>(
    matrix: &Matrix,
    s: &S,
    highest_power: Option<usize>,
) -> Result<Closure> {
    let n = matrix.rows();
    let powers = matrix_powers(matrix, n, s, true)?;
    let tr = trace_sum_of(&powers, n, s);
    if !s.dominates(tr, s.one()) {
        return Ok(Closure::Exact(partial_sum(&powers, n - 1, s)?));
    }

    let k = highest_power.unwrap_or(matrix.cols() - 1);
    debug!(
        trace = tr,
        highest_power = k,
        semiring = s.name(),
        "Kleene star not well defined, returning partial sum"
    );
    let powers = powers.extended(k, s)?;
    Ok(Closure::Partial {
        matrix: partial_sum(&powers, k, s)?,
        highest_power: k,
    })
}

/// `I ⊕ M ⊕ … ⊕ M^k` from a sequence that starts with the identity.
fn partial_sum<S: Semiring + ?Sized>(powers: &MatrixPowers, k: usize, s: &S) -> Result<Matrix> {
    let mut terms = powers.iter().take(k + 1);
    let first = terms.next().cloned().ok_or_else(|| {
        TropicalError::Configuration("power sequence does not start with the identity".to_string())
    })?;
    terms.try_fold(first, |acc, p| add(&acc, p, s))
}

/// Lazy sequence of partial sums `I, I⊕M, I⊕M⊕M², …` of a square matrix.
///
/// The sequence ends the first time a partial sum equals its predecessor
/// (the repeated sum is not yielded, so the last item is the limit), after
/// `max_terms` items, or when a partial sum leaves the semiring domain. In
/// the last case [`error`](KleeneStarIter::error) holds the cause. Clone
/// the iterator, or create a new one with [`kleene_star_iter`], to start
/// over.
///
/// ```
/// use tropical_approx::{kleene_star_iter, Matrix, MaxPlus};
///
/// let m = Matrix::from_rows(&[[-1.0, 2.0], [-3.0, -1.0]]).unwrap();
/// let mut iter = kleene_star_iter(&m, MaxPlus).unwrap();
/// let limit = iter.by_ref().last().unwrap();
/// assert!(iter.converged());
/// assert_eq!(limit, Matrix::from_rows(&[[0.0, 2.0], [-3.0, 0.0]]).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct KleeneStarIter<S: Semiring> {
    base: Matrix,
    semiring: S,
    power: Option<Matrix>,
    sum: Option<Matrix>,
    produced: usize,
    max_terms: usize,
    converged: bool,
    error: Option<TropicalError>,
    done: bool,
}

impl<S: Semiring> KleeneStarIter<S> {
    /// Create the sequence for a square matrix.
    pub fn new(matrix: &Matrix, semiring: S) -> Result<Self> {
        require_square(matrix)?;
        Ok(Self {
            base: matrix.clone(),
            semiring,
            power: None,
            sum: None,
            produced: 0,
            max_terms: DEFAULT_MAX_TERMS,
            converged: false,
            error: None,
            done: false,
        })
    }

    /// Limit the number of partial sums produced.
    pub fn max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    /// Whether the sequence stopped because two partial sums coincided.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// The error that ended the sequence, e.g. a partial sum that left the
    /// semiring domain.
    pub fn error(&self) -> Option<&TropicalError> {
        self.error.as_ref()
    }

    /// Number of partial sums produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    fn advance(&mut self) -> Result<Option<Matrix>> {
        let s = &self.semiring;
        let (power, sum) = match (self.power.take(), self.sum.take()) {
            (Some(power), Some(sum)) => {
                let power = multiply(&power, &self.base, s)?;
                let next = add(&sum, &power, s)?;
                if next == sum {
                    self.converged = true;
                    return Ok(None);
                }
                (power, next)
            }
            _ => {
                let identity = identity_matrix(self.base.rows(), s)?;
                (identity.clone(), identity)
            }
        };
        self.power = Some(power);
        self.sum = Some(sum.clone());
        Ok(Some(sum))
    }
}

impl<S: Semiring> Iterator for KleeneStarIter<S> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        if self.done || self.produced >= self.max_terms {
            self.done = true;
            return None;
        }
        match self.advance() {
            Ok(Some(sum)) => {
                self.produced += 1;
                Some(sum)
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                debug!(error = %e, produced = self.produced, "closure sequence stopped");
                self.error = Some(e);
                self.done = true;
                None
            }
        }
    }
}

/// Lazy closure sequence of `matrix`; see [`KleeneStarIter`].
///
/// # Errors
/// [`TropicalError::Shape`] for a non-square matrix.
pub fn kleene_star_iter<S: Semiring>(matrix: &Matrix, semiring: S) -> Result<KleeneStarIter<S>> {
    KleeneStarIter::new(matrix, semiring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MaxPlus, MaxTimes, MinPlus};

    const Z: f64 = f64::NEG_INFINITY;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn spectral_example() -> Matrix {
        m(&[&[2.0, 1.0, Z], &[5.0, 2.0, -1.0], &[3.0, 0.0, 1.0]])
    }

    fn closure_example() -> Matrix {
        m(&[&[Z, 1.0, 1.0], &[Z, Z, 1.0], &[-2.0, -1.0, Z]])
    }

    #[test]
    fn test_trace() {
        assert_eq!(trace(&spectral_example(), &MaxPlus).unwrap(), 2.0);
        let a = m(&[&[6.0, 3.0, 0.0], &[7.0, 6.0, 1.0], &[5.0, 4.0, 2.0]]);
        assert_eq!(trace(&a, &MaxPlus).unwrap(), 6.0);
        let a = m(&[&[8.0, 7.0, 2.0], &[11.0, 8.0, 5.0], &[9.0, 6.0, 3.0]]);
        assert_eq!(trace(&a, &MaxPlus).unwrap(), 8.0);

        // all-zero diagonal
        assert_eq!(trace(&closure_example(), &MaxPlus).unwrap(), Z);

        assert!(matches!(
            trace(&m(&[&[1.0, 2.0]]), &MaxPlus),
            Err(TropicalError::Shape(_))
        ));
    }

    #[test]
    fn test_trace_sum() {
        // tr(A) = 2, tr(A²) = 6, tr(A³) = 8
        assert_eq!(trace_sum(&spectral_example(), &MaxPlus).unwrap(), 8.0);
        // only cycles of length 3 exist: 1 + 1 - 2 = 0
        assert_eq!(trace_sum(&closure_example(), &MaxPlus).unwrap(), 0.0);
    }

    #[test]
    fn test_spectral_radius() {
        // max(2/1, 6/2, 8/3) = 3
        assert_eq!(spectral_radius(&spectral_example(), &MaxPlus).unwrap(), 3.0);

        // no cycles at all
        let nilpotent = m(&[&[Z, 1.0], &[Z, Z]]);
        assert_eq!(spectral_radius(&nilpotent, &MaxPlus).unwrap(), Z);
    }

    #[test]
    fn test_spectral_radius_maxtimes() {
        // cycle 0 -> 1 -> 0 of weight 2 * 8 = 16, geometric mean 4
        let a = m(&[&[1.0, 2.0], &[8.0, 0.0]]);
        assert_eq!(spectral_radius(&a, &MaxTimes).unwrap(), 4.0);
    }

    #[test]
    fn test_kleene_star() {
        let star = kleene_star(&closure_example(), &MaxPlus).unwrap();
        assert_eq!(
            star,
            m(&[&[0.0, 1.0, 2.0], &[-1.0, 0.0, 1.0], &[-2.0, -1.0, 0.0]])
        );
    }

    #[test]
    fn test_kleene_star_not_well_defined() {
        let err = kleene_star(&spectral_example(), &MaxPlus).unwrap_err();
        assert_eq!(
            err,
            TropicalError::NotWellDefined {
                trace: 8.0,
                one: 0.0
            }
        );
    }

    #[test]
    fn test_kleene_star_normalized_by_spectral_radius() {
        // λ⁻¹ ⊗ A has spectral radius 0, so its closure exists
        let a = spectral_example();
        let lambda = spectral_radius(&a, &MaxPlus).unwrap();
        let normalized = crate::ops::scalar_multiply(&a, MaxPlus.invert(lambda), &MaxPlus).unwrap();
        assert_eq!(trace_sum(&normalized, &MaxPlus).unwrap(), 0.0);
        assert!(kleene_star(&normalized, &MaxPlus).is_ok());
    }

    #[test]
    fn test_kleene_star_minplus_uses_semiring_order() {
        // a negative cycle makes the min-plus closure diverge
        let a = m(&[&[f64::INFINITY, 1.0], &[-3.0, f64::INFINITY]]);
        assert!(matches!(
            kleene_star(&a, &MinPlus),
            Err(TropicalError::NotWellDefined { .. })
        ));

        // shortest paths: 0 -> 1 costs 1, 1 -> 0 costs 2
        let b = m(&[&[f64::INFINITY, 1.0], &[2.0, f64::INFINITY]]);
        let star = kleene_star(&b, &MinPlus).unwrap();
        assert_eq!(star, m(&[&[0.0, 1.0], &[2.0, 0.0]]));
    }

    #[test]
    fn test_try_kleene_star_exact() {
        let closure = try_kleene_star(&closure_example(), &MaxPlus, None).unwrap();
        assert!(closure.is_exact());
        assert_eq!(closure.exact(), Some(kleene_star(&closure_example(), &MaxPlus).unwrap()));
    }

    #[test]
    fn test_try_kleene_star_partial() {
        let a = m(&[&[1.0, Z], &[Z, Z]]);

        // default: I ⊕ A
        let closure = try_kleene_star(&a, &MaxPlus, None).unwrap();
        assert_eq!(
            closure,
            Closure::Partial {
                matrix: m(&[&[1.0, Z], &[Z, 0.0]]),
                highest_power: 1,
            }
        );

        // I ⊕ A ⊕ … ⊕ A⁴, beyond the precomputed powers
        let closure = try_kleene_star(&a, &MaxPlus, Some(4)).unwrap();
        assert!(!closure.is_exact());
        assert_eq!(closure.matrix()[(0, 0)], 4.0);

        let closure = try_kleene_star(&a, &MaxPlus, Some(0)).unwrap();
        assert_eq!(
            closure.into_matrix(),
            crate::ops::identity_matrix(2, &MaxPlus).unwrap()
        );
    }

    #[test]
    fn test_kleene_star_iter_converges_to_star() {
        let sums: Vec<Matrix> = kleene_star_iter(&closure_example(), MaxPlus)
            .unwrap()
            .collect();
        // I, I⊕M, I⊕M⊕M²; adding M³ changes nothing
        assert_eq!(sums.len(), 3);
        assert_eq!(sums[0], crate::ops::identity_matrix(3, &MaxPlus).unwrap());
        assert_eq!(
            sums.last(),
            Some(&kleene_star(&closure_example(), &MaxPlus).unwrap())
        );
    }

    #[test]
    fn test_kleene_star_iter_is_restartable() {
        let iter = kleene_star_iter(&closure_example(), &MaxPlus).unwrap();
        let first: Vec<Matrix> = iter.clone().collect();
        let second: Vec<Matrix> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_kleene_star_iter_respects_cap() {
        // positive cycle: partial sums grow forever
        let a = m(&[&[1.0]]);
        let mut iter = kleene_star_iter(&a, MaxPlus).unwrap().max_terms(5);
        let sums: Vec<Matrix> = iter.by_ref().collect();
        assert_eq!(sums.len(), 5);
        assert_eq!(sums[4][(0, 0)], 4.0);
        assert!(!iter.converged());
        assert_eq!(iter.produced(), 5);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_kleene_star_iter_reports_domain_error() {
        // 2^k overflows to +∞ after 1024 powers
        let a = m(&[&[2.0, 0.0], &[0.0, 0.0]]);
        let mut iter = kleene_star_iter(&a, MaxTimes).unwrap();
        let last = iter.by_ref().last().unwrap();
        assert!(!iter.converged());
        assert!(matches!(
            iter.error(),
            Some(TropicalError::Domain { semiring: "max-times", .. })
        ));
        assert!(iter.produced() < DEFAULT_MAX_TERMS);
        assert!(MaxTimes.contains(last[(0, 0)]));

        // the scalar path fails the same way
        let mut iter = kleene_star_iter(&Matrix::scalar(2.0), MaxTimes).unwrap();
        assert!(iter.by_ref().count() < DEFAULT_MAX_TERMS);
        assert!(iter.error().is_some());
    }

    #[test]
    fn test_kleene_star_iter_cap_is_not_an_error() {
        let mut iter = kleene_star_iter(&m(&[&[1.0]]), MaxPlus).unwrap().max_terms(3);
        assert_eq!(iter.by_ref().count(), 3);
        assert!(iter.error().is_none());
        assert!(!iter.converged());
    }

    #[test]
    fn test_try_kleene_star_propagates_overflow() {
        // Tr = 1e200 exceeds one; the partial sum up to A² overflows
        let a = m(&[&[1e200]]);
        assert!(matches!(
            try_kleene_star(&a, &MaxTimes, Some(2)),
            Err(TropicalError::Domain { .. })
        ));
    }

    #[test]
    fn test_kleene_star_iter_rejects_non_square() {
        assert!(kleene_star_iter(&m(&[&[1.0, 2.0]]), MaxPlus).is_err());
    }
}
