//! Process-wide default semiring.
//!
//! Convenience layer for callers that work in a single algebra: every
//! function here reads the current [`Algebra`] once and forwards to the
//! explicit-semiring function of the same name. The core routines never
//! consult this default.
//!
//! ```
//! use tropical_approx::{current, Algebra, Matrix};
//!
//! current::set_algebra(Algebra::MinPlus);
//! let a = Matrix::from_rows(&[[1.0, 5.0]]).unwrap();
//! let b = Matrix::column_vector(&[2.0, 0.0]).unwrap();
//! // min(1 + 2, 5 + 0) = 3
//! assert_eq!(current::multiply(&a, &b).unwrap()[(0, 0)], 3.0);
//! current::set_algebra(Algebra::default());
//! ```

use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::closure::{self, Closure, KleeneStarIter};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::ops::{self, MatrixPowers};
use crate::solver::{self, TwoSidedSolution};
use crate::types::Algebra;

static CURRENT: Lazy<RwLock<Algebra>> = Lazy::new(|| RwLock::new(Algebra::default()));

/// The algebra used by the functions in this module. Max-plus by default.
pub fn algebra() -> Algebra {
    *CURRENT.read().unwrap_or_else(|e| e.into_inner())
}

/// Replace the process-wide algebra, returning the previous one.
pub fn set_algebra(algebra: Algebra) -> Algebra {
    let mut guard = CURRENT.write().unwrap_or_else(|e| e.into_inner());
    std::mem::replace(&mut *guard, algebra)
}

/// [`ops::multiply`] in the current algebra.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    ops::multiply(a, b, &algebra())
}

/// [`ops::scalar_multiply`] in the current algebra.
pub fn scalar_multiply(matrix: &Matrix, scalar: f64) -> Result<Matrix> {
    ops::scalar_multiply(matrix, scalar, &algebra())
}

/// [`ops::add`] in the current algebra.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    ops::add(a, b, &algebra())
}

/// [`ops::pseudo_inverse`] in the current algebra.
pub fn pseudo_inverse(matrix: &Matrix) -> Matrix {
    ops::pseudo_inverse(matrix, &algebra())
}

/// [`ops::identity_matrix`] in the current algebra.
pub fn identity_matrix(size: usize) -> Result<Matrix> {
    ops::identity_matrix(size, &algebra())
}

/// [`ops::zero_matrix`] in the current algebra.
pub fn zero_matrix(rows: usize, cols: usize) -> Result<Matrix> {
    ops::zero_matrix(rows, cols, &algebra())
}

/// [`ops::vector_of_ones`] in the current algebra.
pub fn vector_of_ones(size: usize) -> Result<Matrix> {
    ops::vector_of_ones(size, &algebra())
}

/// [`ops::matrix_powers`] in the current algebra.
pub fn matrix_powers(matrix: &Matrix, n: usize, with_identity: bool) -> Result<MatrixPowers> {
    ops::matrix_powers(matrix, n, &algebra(), with_identity)
}

/// [`closure::trace`] in the current algebra.
pub fn trace(matrix: &Matrix) -> Result<f64> {
    closure::trace(matrix, &algebra())
}

/// [`closure::trace_sum`] in the current algebra.
pub fn trace_sum(matrix: &Matrix) -> Result<f64> {
    closure::trace_sum(matrix, &algebra())
}

/// [`closure::spectral_radius`] in the current algebra.
pub fn spectral_radius(matrix: &Matrix) -> Result<f64> {
    closure::spectral_radius(matrix, &algebra())
}

/// [`closure::kleene_star`] in the current algebra.
pub fn kleene_star(matrix: &Matrix) -> Result<Matrix> {
    closure::kleene_star(matrix, &algebra())
}

/// [`closure::try_kleene_star`] in the current algebra.
pub fn try_kleene_star(matrix: &Matrix, highest_power: Option<usize>) -> Result<Closure> {
    closure::try_kleene_star(matrix, &algebra(), highest_power)
}

/// The closure sequence keeps the algebra that was current when it was
/// created.
pub fn kleene_star_iter(matrix: &Matrix) -> Result<KleeneStarIter<Algebra>> {
    closure::kleene_star_iter(matrix, algebra())
}

/// [`solver::solve_two_sided`] in the current algebra.
pub fn solve_two_sided(a: &Matrix, b: &Matrix, x0: Option<&Matrix>) -> Result<TwoSidedSolution> {
    solver::solve_two_sided(a, b, &algebra(), x0)
}
