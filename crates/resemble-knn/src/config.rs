//! Configuration builder for nearest-neighbor search.

use resemble_lcss::{DistanceMeasure, TimeSeries, TimeSeriesView};

use crate::error::KnnError;
use crate::result::Neighbors;

/// Configuration for k-nearest-neighbor search.
///
/// Construct via [`KnnConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `pruning` | true    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnConfig {
    pub(crate) k: usize,
    pub(crate) pruning: bool,
}

impl KnnConfig {
    /// Create a configuration returning the `k` nearest neighbors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::InvalidK`] | `k` is zero |
    pub fn new(k: usize) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK { k });
        }
        Ok(Self { k, pruning: true })
    }

    /// Pass the current k-th best distance to the measure as a bound.
    ///
    /// Disabling pruning makes every comparison run to completion; results
    /// are identical either way.
    #[must_use]
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Return the number of neighbors searched for.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return whether bound-driven pruning is enabled.
    #[must_use]
    pub fn pruning(&self) -> bool {
        self.pruning
    }

    /// Find the `k` reference series closest to `query`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::TooFewReference`] | `reference.len() < k` |
    /// | [`KnnError::Measure`] | The measure rejected a pair |
    pub fn search<M>(
        &self,
        measure: &M,
        query: TimeSeriesView<'_>,
        reference: &[TimeSeries],
    ) -> Result<Neighbors, KnnError>
    where
        M: DistanceMeasure + ?Sized,
    {
        self.check_reference(reference)?;
        crate::search::search_one(self, measure, 0, query, reference)
    }

    /// Search for every query in parallel. Results are in query order.
    ///
    /// # Errors
    ///
    /// Same as [`search`][KnnConfig::search]; the first failing query is reported.
    pub fn search_batch<M>(
        &self,
        measure: &M,
        queries: &[TimeSeries],
        reference: &[TimeSeries],
    ) -> Result<Vec<Neighbors>, KnnError>
    where
        M: DistanceMeasure + ?Sized,
    {
        self.check_reference(reference)?;
        crate::search::search_batch(self, measure, queries, reference)
    }

    fn check_reference(&self, reference: &[TimeSeries]) -> Result<(), KnnError> {
        if reference.len() < self.k {
            return Err(KnnError::TooFewReference {
                n_reference: reference.len(),
                k: self.k,
            });
        }
        Ok(())
    }
}
