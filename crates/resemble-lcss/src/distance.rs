//! Distance values, pruning bounds and comparison outcomes.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LcssError;

/// A finite, non-negative distance produced by a completed comparison.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Best distance found so far by the caller, used only to prune work.
///
/// A finite bound must be on the same scale as the measure it is passed to.
/// For LCSS that is the normalised `[0, 1]` scale of its own output; passing
/// a bound taken from a differently scaled measure silently mis-prunes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Bound {
    /// No pruning: the comparison always runs to completion.
    #[default]
    Unbounded,

    /// Comparisons that cannot finish strictly below this value are abandoned.
    Finite(f64),
}

impl Bound {
    /// Build a bound from a raw value. Positive infinity means unbounded.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::InvalidBound`] | `value` is NaN |
    pub fn new(value: f64) -> Result<Self, LcssError> {
        if value.is_nan() {
            Err(LcssError::InvalidBound)
        } else if value == f64::INFINITY {
            Ok(Self::Unbounded)
        } else {
            Ok(Self::Finite(value))
        }
    }

    /// The bound as a raw value, `f64::INFINITY` when unbounded.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Unbounded => f64::INFINITY,
            Self::Finite(v) => v,
        }
    }

    /// Whether `distance` beats this bound.
    #[must_use]
    pub fn admits(self, distance: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Finite(b) => distance < b,
        }
    }
}

impl From<Distance> for Bound {
    fn from(d: Distance) -> Self {
        Self::Finite(d.0)
    }
}

/// Outcome of a bounded comparison.
///
/// [`Comparison::Abandoned`] is a regular result, not a failure: it states
/// that the distance is at least the bound the caller supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    /// The comparison ran to completion and beat the bound.
    Distance(Distance),

    /// The distance is provably no better than the bound.
    Abandoned,
}

impl Comparison {
    /// The completed distance, if any.
    #[must_use]
    pub fn distance(self) -> Option<Distance> {
        match self {
            Self::Distance(d) => Some(d),
            Self::Abandoned => None,
        }
    }

    /// Raw value for ordering, `f64::INFINITY` when abandoned.
    #[must_use]
    pub fn value(self) -> f64 {
        self.distance().map_or(f64::INFINITY, Distance::value)
    }

    /// Return true if the comparison was abandoned.
    #[must_use]
    pub fn is_abandoned(self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance(d) => d.fmt(f),
            Self::Abandoned => f.write_str("abandoned"),
        }
    }
}
