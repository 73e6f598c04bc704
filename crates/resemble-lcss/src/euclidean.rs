//! Lock-step Euclidean distance with early abandoning.

use tracing::instrument;

use crate::distance::{Bound, Comparison, Distance};
use crate::error::LcssError;
use crate::measure::DistanceMeasure;
use crate::params::{ParamSet, Parameterized};
use crate::series::TimeSeriesView;

/// Euclidean distance between equal-length series. Has no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Euclidean {
    /// Measure name used in logs and parameter errors.
    pub const NAME: &'static str = "euclidean";

    /// Compute the Euclidean distance, abandoning once the running squared sum
    /// reaches `bound²`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::LengthMismatch`] | `a` and `b` differ in length |
    /// | [`LcssError::InvalidBound`] | `bound` is `Finite(NaN)` |
    #[instrument(skip(a, b), fields(len = a.len()))]
    pub fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError> {
        if a.len() != b.len() {
            return Err(LcssError::LengthMismatch {
                len_a: a.len(),
                len_b: b.len(),
            });
        }
        let cutoff_sq = match bound {
            Bound::Unbounded => f64::INFINITY,
            Bound::Finite(v) if v.is_nan() => return Err(LcssError::InvalidBound),
            Bound::Finite(v) if v <= 0.0 => return Ok(Comparison::Abandoned),
            Bound::Finite(v) => v * v,
        };

        let mut sum = 0.0;
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            sum += (x - y).powi(2);
            if sum >= cutoff_sq {
                return Ok(Comparison::Abandoned);
            }
        }

        let dist = sum.sqrt();
        if !bound.admits(dist) {
            return Ok(Comparison::Abandoned);
        }
        Ok(Comparison::Distance(Distance::new(dist)))
    }
}

impl DistanceMeasure for Euclidean {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError> {
        Euclidean::distance(self, a, b, bound)
    }
}

impl Parameterized for Euclidean {
    fn params(&self) -> ParamSet {
        ParamSet::new()
    }

    fn set_params(&mut self, params: &ParamSet) -> Result<(), LcssError> {
        match params.iter().next() {
            Some((key, _)) => Err(LcssError::UnknownParameter {
                key: key.to_string(),
                measure: Self::NAME,
            }),
            None => Ok(()),
        }
    }
}
