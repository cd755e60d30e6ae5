//! Matrix algebra over idempotent (tropical) semirings.
//!
//! This crate implements the linear algebra used for tropical function
//! approximation: matrix products and sums over a [`Semiring`], the
//! pseudo-inverse, traces, spectral radius, the Kleene star and an
//! alternating solver for two-sided equations `A ⊗ θ = B ⊗ σ`.
//!
//! # Quick Start
//!
//! ```
//! use tropical_approx::{kleene_star, multiply, Matrix, MaxPlus, Semiring};
//!
//! let z = MaxPlus.zero();
//! let m = Matrix::from_rows(&[[z, 1.0, 1.0], [z, z, 1.0], [-2.0, -1.0, z]]).unwrap();
//!
//! // longest paths of length two
//! let m2 = multiply(&m, &m, &MaxPlus).unwrap();
//! assert_eq!(m2[(0, 2)], 2.0);
//!
//! // longest paths of any length
//! let star = kleene_star(&m, &MaxPlus).unwrap();
//! assert_eq!(star[(2, 0)], -2.0);
//! ```
//!
//! # Semirings
//!
//! | Type | ⊕ | ⊗ | Zero | One |
//! |------|---|---|------|-----|
//! | [`MaxPlus`] | max | + | -∞ | 0 |
//! | [`MinPlus`] | min | + | +∞ | 0 |
//! | [`MaxTimes`] | max | × | 0 | 1 |
//! | [`MinTimes`] | min | × | +∞ | 1 |
//!
//! Every operation takes the semiring explicitly. The [`current`] module
//! offers the same functions over a process-wide default [`Algebra`].
//!
//! # Features
//!
//! - `parallel` (default): compute matrix products row by row with rayon.
//!
//! # Logging
//!
//! The solver and the Kleene routines emit [`tracing`] events at `debug`
//! and `trace` level. No subscriber is installed by this crate.

pub mod approx;
pub mod closure;
pub mod current;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod solver;
pub mod types;

pub use closure::{
    kleene_star, kleene_star_iter, spectral_radius, trace, trace_sum, try_kleene_star, Closure,
    KleeneStarIter,
};
pub use error::{Result, TropicalError};
pub use matrix::Matrix;
pub use ops::{
    add, identity_matrix, matrix_powers, multiply, pseudo_inverse, scalar_multiply,
    vector_of_ones, zero_matrix, MatrixPowers,
};
pub use solver::{solve_two_sided, Termination, TwoSidedSolution, TwoSidedSolver};
pub use types::{Algebra, MaxPlus, MaxTimes, MinPlus, MinTimes, Semiring};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::closure::{kleene_star, try_kleene_star, Closure};
    pub use crate::matrix::Matrix;
    pub use crate::ops::{add, multiply, pseudo_inverse, scalar_multiply};
    pub use crate::solver::{solve_two_sided, TwoSidedSolver};
    pub use crate::types::{Algebra, MaxPlus, MaxTimes, MinPlus, MinTimes, Semiring};
    pub use crate::TropicalError;
}
