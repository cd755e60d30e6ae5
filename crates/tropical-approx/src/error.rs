//! Error types for tropical matrix operations.

use thiserror::Error;

/// Errors that can occur during tropical algebra operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TropicalError {
    /// Matrix dimensions are incompatible with the requested operation.
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// A value lies outside the value set of the semiring.
    #[error("Value {value} is outside the {semiring} domain")]
    Domain {
        /// Name of the semiring that rejected the value.
        semiring: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Kleene star requested for a matrix whose `Tr` exceeds the identity.
    #[error("Kleene star is not well defined: Tr = {trace} exceeds {one}")]
    NotWellDefined {
        /// The power-sum trace `Tr(M)`.
        trace: f64,
        /// The multiplicative identity of the semiring.
        one: f64,
    },

    /// Invalid caller-supplied parameter or missing default.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for tropical algebra operations.
pub type Result<T> = std::result::Result<T, TropicalError>;

pub(crate) fn shape_mismatch(what: &str, left: (usize, usize), right: (usize, usize)) -> TropicalError {
    TropicalError::Shape(format!(
        "{}: {}x{} vs {}x{}",
        what, left.0, left.1, right.0, right.1
    ))
}
