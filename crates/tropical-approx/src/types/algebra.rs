use std::fmt;
use std::str::FromStr;

use super::traits::Semiring;
use super::{MaxPlus, MaxTimes, MinPlus, MinTimes};
use crate::error::TropicalError;

/// Runtime choice of one of the four provided semirings.
///
/// Dispatches every [`Semiring`] method to the matching unit type. This is
/// the value stored by the process-wide default in [`crate::current`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Algebra {
    #[default]
    MaxPlus,
    MinPlus,
    MaxTimes,
    MinTimes,
}

impl Algebra {
    /// All variants, in declaration order.
    pub const ALL: [Algebra; 4] = [
        Algebra::MaxPlus,
        Algebra::MinPlus,
        Algebra::MaxTimes,
        Algebra::MinTimes,
    ];

    fn semiring(&self) -> &'static dyn Semiring {
        match self {
            Algebra::MaxPlus => &MaxPlus,
            Algebra::MinPlus => &MinPlus,
            Algebra::MaxTimes => &MaxTimes,
            Algebra::MinTimes => &MinTimes,
        }
    }
}

impl Semiring for Algebra {
    fn name(&self) -> &'static str {
        self.semiring().name()
    }

    fn zero(&self) -> f64 {
        self.semiring().zero()
    }

    fn one(&self) -> f64 {
        self.semiring().one()
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        self.semiring().add(a, b)
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        self.semiring().mul(a, b)
    }

    fn pow_raw(&self, a: f64, p: f64) -> f64 {
        self.semiring().pow_raw(a, p)
    }

    fn invert(&self, a: f64) -> f64 {
        self.semiring().invert(a)
    }

    fn contains(&self, a: f64) -> bool {
        self.semiring().contains(a)
    }
}

impl fmt::Display for Algebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algebra {
    type Err = TropicalError;

    /// Accepts `max-plus`, `min-plus`, `max-times`, `min-times`, ignoring
    /// case and allowing `_` or no separator (`maxplus`, `MAX_PLUS`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "maxplus" => Ok(Algebra::MaxPlus),
            "minplus" => Ok(Algebra::MinPlus),
            "maxtimes" => Ok(Algebra::MaxTimes),
            "mintimes" => Ok(Algebra::MinTimes),
            _ => Err(TropicalError::Configuration(format!(
                "unknown algebra '{}', expected one of max-plus, min-plus, max-times, min-times",
                s
            ))),
        }
    }
}
