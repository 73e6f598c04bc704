use resemble_lcss::LcssError;

/// Errors from nearest-neighbor search.
#[derive(Debug, thiserror::Error)]
pub enum KnnError {
    /// Returned when k is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when the reference set holds fewer series than the requested k.
    #[error("need at least {k} reference series to find {k} neighbors, got {n_reference}")]
    TooFewReference {
        /// Number of reference series provided.
        n_reference: usize,
        /// Requested number of neighbors.
        k: usize,
    },

    /// Wraps a distance error for a specific query/reference pair.
    #[error("distance error comparing query {query} with reference {reference}")]
    Measure {
        /// Index of the query series.
        query: usize,
        /// Index of the reference series.
        reference: usize,
        /// The underlying measure error.
        source: LcssError,
    },
}
