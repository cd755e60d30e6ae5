//! Tropical semiring definitions.
//!
//! A **tropical semiring** replaces the standard arithmetic operations
//! (+, ×) with an idempotent "addition" (max or min) and an ordinary
//! operation as "multiplication" (+ or ×).
//!
//! # What is an Idempotent Semiring?
//!
//! A semiring is an algebraic structure with two binary operations:
//! - **Addition** (⊕): associative, commutative, with identity (zero)
//! - **Multiplication** (⊗): associative, with identity (one)
//!
//! Idempotence means `a ⊕ a = a`, so ⊕ always selects one of its
//! operands. Zero is absorbing: `zero ⊗ a = zero`.
//!
//! | Type | ⊕ (add) | ⊗ (mul) | Zero | One | Domain |
//! |------|---------|---------|------|-----|--------|
//! | [`MaxPlus`] | max | + | -∞ | 0 | ℝ ∪ {-∞} |
//! | [`MinPlus`] | min | + | +∞ | 0 | ℝ ∪ {+∞} |
//! | [`MaxTimes`] | max | × | 0 | 1 | [0, ∞) |
//! | [`MinTimes`] | min | × | +∞ | 1 | (0, +∞] |
//!
//! Powers follow the multiplication: for the additive pair `a^p = p·a`,
//! for the multiplicative pair `a^p` is ordinary exponentiation. The
//! inverse is `-a` or `1/a`, with `zero` mapped to itself.
//!
//! # Example
//!
//! ```
//! use tropical_approx::{MaxPlus, Semiring};
//!
//! let s = MaxPlus;
//! // Tropical addition: max(3, 5) = 5
//! assert_eq!(s.add(3.0, 5.0), 5.0);
//! // Tropical multiplication: 3 + 5 = 8
//! assert_eq!(s.mul(3.0, 5.0), 8.0);
//! // Tropical square root: 8 / 2 = 4
//! assert_eq!(s.pow(8.0, 0.5).unwrap(), 4.0);
//! ```

mod algebra;
mod max_plus;
mod max_times;
mod min_plus;
mod min_times;
mod traits;

pub use algebra::Algebra;
pub use max_plus::MaxPlus;
pub use max_times::MaxTimes;
pub use min_plus::MinPlus;
pub use min_times::MinTimes;
pub use traits::Semiring;

pub(crate) use traits::sum;
