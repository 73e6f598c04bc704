//! The distance-measure capability consumed by nearest-neighbor search.

use crate::distance::{Bound, Comparison};
use crate::error::LcssError;
use crate::series::TimeSeriesView;

/// A distance between two time series that can give up early once it is
/// clear the result cannot beat a caller-supplied bound.
///
/// Implementations must never return [`Comparison::Distance`] with a value
/// greater than or equal to a finite `bound`; when the exact distance is not
/// strictly below the bound they return [`Comparison::Abandoned`]. With
/// [`Bound::Unbounded`] they always return the exact distance.
pub trait DistanceMeasure: Send + Sync {
    /// Short identifier used in logs and result files.
    fn name(&self) -> &'static str;

    /// Compare `a` against `b`, pruning against `bound`.
    ///
    /// `bound` must be on this measure's own scale.
    ///
    /// # Errors
    ///
    /// Shape errors for inputs the measure cannot compare. Errors are never
    /// used to report pruning.
    fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError>;
}

impl<M: DistanceMeasure + ?Sized> DistanceMeasure for &M {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError> {
        (**self).distance(a, b, bound)
    }
}

impl<M: DistanceMeasure + ?Sized> DistanceMeasure for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError> {
        (**self).distance(a, b, bound)
    }
}
