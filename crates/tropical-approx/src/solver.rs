//! Alternating solver for the two-sided equation `A ⊗ θ = B ⊗ σ`.
//!
//! Given `A` (m×n) and `B` (m×p), the solver looks for column vectors `θ`
//! (n×1) and `σ` (p×1) that bring `A ⊗ θ` and `B ⊗ σ` as close together as
//! possible. Starting from `x₀`, it alternates two half-steps:
//!
//! ```text
//! y-step:  important = PI(PI(A ⊗ xᵢ) ⊗ B)
//!          Δ         = (PI(B ⊗ important) ⊗ A ⊗ xᵢ)[0,0]
//!          yᵢ₊₁      = important ⊗ Δ^(1/2)
//!
//! x-step:  the same with A/B and x/y exchanged
//! ```
//!
//! where `PI` is the [`pseudo_inverse`]. A half-step stops the iteration
//! when its `Δ` equals one (the sides agree) or when its new iterate
//! repeats an earlier iterate of the same kind (the sequence has entered a
//! cycle).

use std::fmt;

use tracing::{debug, trace};

use crate::error::{shape_mismatch, Result, TropicalError};
use crate::matrix::{cells_equal, Matrix};
use crate::ops::{multiply, pseudo_inverse, scalar_multiply, vector_of_ones};
use crate::types::Semiring;

/// Default bound on the number of full (y-step + x-step) iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// `Δ` reached one.
    Converged,
    /// A new iterate repeated an earlier one.
    Cycle,
    /// `max_iterations` full iterations were performed.
    IterationLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::Converged => "converged",
            Termination::Cycle => "cycle",
            Termination::IterationLimit => "iteration limit",
        })
    }
}

/// Result of the two-sided solver.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoSidedSolution {
    /// Coefficients for the left-hand matrix (n×1).
    pub theta: Matrix,
    /// Coefficients for the right-hand matrix (p×1).
    pub sigma: Matrix,
    /// `Δ` of the last half-step.
    pub delta: f64,
    /// Number of y-steps performed.
    pub iterations: usize,
    pub termination: Termination,
}

/// Builder for the two-sided solver.
///
/// # Example
///
/// ```
/// use tropical_approx::{Matrix, MaxPlus, Semiring, Termination, TwoSidedSolver};
///
/// let z = MaxPlus.zero();
/// let a = Matrix::from_rows(&[[3.0, z, 0.0], [1.0, 1.0, 0.0], [z, 1.0, 2.0]]).unwrap();
/// let b = Matrix::from_rows(&[[1.0, 1.0], [3.0, 2.0], [3.0, 1.0]]).unwrap();
/// let x0 = Matrix::column_vector(&[5.0, 3.0, 1.0]).unwrap();
///
/// let solution = TwoSidedSolver::new(&MaxPlus)
///     .initial(x0)
///     .solve(&a, &b)
///     .unwrap();
///
/// assert_eq!(solution.theta, Matrix::column_vector(&[3.0, 6.0, 5.0]).unwrap());
/// assert_eq!(solution.sigma, Matrix::column_vector(&[4.0, 5.0]).unwrap());
/// assert_eq!(solution.delta, 0.0);
/// assert_eq!(solution.termination, Termination::Converged);
/// ```
#[derive(Debug, Clone)]
pub struct TwoSidedSolver<'s, S: Semiring + ?Sized> {
    semiring: &'s S,
    initial: Option<Matrix>,
    max_iterations: usize,
    tolerance: f64,
}

impl<'s, S: Semiring + ?Sized> TwoSidedSolver<'s, S> {
    /// Create a solver over `semiring` with default settings.
    pub fn new(semiring: &'s S) -> Self {
        Self {
            semiring,
            initial: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: 0.0,
        }
    }

    /// Start from `x0` (n×1) instead of the vector of ones.
    pub fn initial(mut self, x0: Matrix) -> Self {
        self.initial = Some(x0);
        self
    }

    /// Bound the number of full iterations.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Treat finite values within `tolerance` of each other as equal when
    /// testing `Δ` against one and iterates against earlier iterates.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Run the solver on `A` (m×n) and `B` (m×p).
    ///
    /// # Errors
    /// - [`TropicalError::Shape`] if the row counts differ or `x0` is not n×1.
    /// - [`TropicalError::Domain`] if an input lies outside the semiring
    ///   domain or a square root of `Δ` is undefined.
    /// - [`TropicalError::Configuration`] if no `x0` was given and one is
    ///   outside the domain, or the iteration bound or tolerance is invalid.
    pub fn solve(&self, a: &Matrix, b: &Matrix) -> Result<TwoSidedSolution> {
        let s = self.semiring;
        let x0 = self.check(a, b)?;

        let mut x = x0;
        let mut xs: Vec<Matrix> = Vec::new();
        let mut ys: Vec<Matrix> = Vec::new();
        let mut iteration = 0;

        loop {
            iteration += 1;

            let (y, delta) = half_step(a, b, &x, s)?;
            debug!(iteration, delta, "y-step");
            trace!(y = %y, "new y iterate");
            if let Some(termination) = self.stop(delta, &y, &ys) {
                return Ok(self.finish(x, y, delta, iteration, termination));
            }

            let (next_x, delta) = half_step(b, a, &y, s)?;
            debug!(iteration, delta, "x-step");
            trace!(x = %next_x, "new x iterate");
            xs.push(x);
            if let Some(termination) = self.stop(delta, &next_x, &xs) {
                return Ok(self.finish(next_x, y, delta, iteration, termination));
            }

            if iteration >= self.max_iterations {
                return Ok(self.finish(
                    next_x,
                    y,
                    delta,
                    iteration,
                    Termination::IterationLimit,
                ));
            }

            x = next_x;
            ys.push(y);
        }
    }

    /// Validate the inputs and pick the initial vector.
    fn check(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let s = self.semiring;
        if a.rows() != b.rows() {
            return Err(shape_mismatch("two-sided equation", a.shape(), b.shape()));
        }
        if self.max_iterations == 0 {
            return Err(TropicalError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(TropicalError::Configuration(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        a.validate(s)?;
        b.validate(s)?;

        match &self.initial {
            Some(x0) => {
                if x0.shape() != (a.cols(), 1) {
                    return Err(TropicalError::Shape(format!(
                        "initial vector must be {}x1, got {}x{}",
                        a.cols(),
                        x0.rows(),
                        x0.cols()
                    )));
                }
                x0.validate(s)?;
                Ok(x0.clone())
            }
            None if s.contains(s.one()) => vector_of_ones(a.cols(), s),
            None => Err(TropicalError::Configuration(format!(
                "one ({}) is outside the {} domain; supply an initial vector",
                s.one(),
                s.name()
            ))),
        }
    }

    fn stop(&self, delta: f64, next: &Matrix, earlier: &[Matrix]) -> Option<Termination> {
        if cells_equal(delta, self.semiring.one(), self.tolerance) {
            Some(Termination::Converged)
        } else if earlier.iter().any(|v| v.approx_eq(next, self.tolerance)) {
            Some(Termination::Cycle)
        } else {
            None
        }
    }

    fn finish(
        &self,
        theta: Matrix,
        sigma: Matrix,
        delta: f64,
        iterations: usize,
        termination: Termination,
    ) -> TwoSidedSolution {
        debug!(%termination, iterations, delta, "two-sided solver finished");
        TwoSidedSolution {
            theta,
            sigma,
            delta,
            iterations,
            termination,
        }
    }
}

/// One half-step: the best `rhs`-side vector for the current `lhs ⊗ v`,
/// scaled by `Δ^(1/2)`, together with `Δ`.
fn half_step<S: Semiring + ?Sized>(
    lhs: &Matrix,
    rhs: &Matrix,
    v: &Matrix,
    s: &S,
) -> Result<(Matrix, f64)> {
    let lhs_v = multiply(lhs, v, s)?;
    let important = pseudo_inverse(&multiply(&pseudo_inverse(&lhs_v, s), rhs, s)?, s);

    let rhs_important = pseudo_inverse(&multiply(rhs, &important, s)?, s);
    let delta = multiply(&multiply(&rhs_important, lhs, s)?, v, s)?[(0, 0)];

    let half = s.pow(delta, 0.5)?;
    let next = scalar_multiply(&important, half, s)?;
    Ok((next, delta))
}

/// One-call form of [`TwoSidedSolver`] with default settings.
///
/// `x0` defaults to the vector of ones.
pub fn solve_two_sided<S: Semiring + ?Sized>(
    a: &Matrix,
    b: &Matrix,
    s: &S,
    x0: Option<&Matrix>,
) -> Result<TwoSidedSolution> {
    let solver = TwoSidedSolver::new(s);
    match x0 {
        Some(x0) => solver.initial(x0.clone()).solve(a, b),
        None => solver.solve(a, b),
    }
}
