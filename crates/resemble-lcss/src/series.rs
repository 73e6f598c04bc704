//! Validated time series containers.

use std::ops::Index;

use crate::error::LcssError;

/// Check that `values` is non-empty and every value is finite.
fn validate(values: &[f64]) -> Result<(), LcssError> {
    if values.is_empty() {
        return Err(LcssError::EmptySeries);
    }
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(LcssError::NonFiniteValue { index }),
        None => Ok(()),
    }
}

/// Owned time series. Always non-empty, all values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries(Vec<f64>);

impl TimeSeries {
    /// Validate and wrap `values`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::EmptySeries`] | `values` is empty |
    /// | [`LcssError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, LcssError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Borrow as a [`TimeSeriesView`] without re-validating.
    #[must_use]
    pub fn as_view(&self) -> TimeSeriesView<'_> {
        TimeSeriesView(&self.0)
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed series; present for the `len` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = LcssError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<TimeSeriesView<'_>> for TimeSeries {
    fn from(view: TimeSeriesView<'_>) -> Self {
        Self(view.0.to_vec())
    }
}

/// Borrowed time series, carrying the same guarantees as [`TimeSeries`].
///
/// Distance measures take views so callers can compare slices of larger
/// buffers without copying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesView<'a>(&'a [f64]);

impl<'a> TimeSeriesView<'a> {
    /// Validate and borrow `slice`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::EmptySeries`] | `slice` is empty |
    /// | [`LcssError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, LcssError> {
        validate(slice)?;
        Ok(Self(slice))
    }

    /// The underlying values.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for TimeSeriesView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for TimeSeriesView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}
