//! Error types for series validation, distance computation and configuration.

/// Errors from time series validation, distance computation and measure configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LcssError {
    /// Returned when an empty slice is provided as a time series.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a time series contains NaN, infinity, or negative infinity.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when the warping window leaves some row of the first series
    /// without any column of the second series to compare against.
    #[error(
        "warping window of radius {radius} leaves row {row} without candidates \
         (first series has {len_a} values, second has {len_b})"
    )]
    EmptyWindow {
        /// First row of the first series whose window is empty.
        row: usize,
        /// Length of the first series.
        len_a: usize,
        /// Length of the second series.
        len_b: usize,
        /// Effective window radius.
        radius: usize,
    },

    /// Returned by lock-step measures when the two series differ in length.
    #[error("lock-step measure requires equal lengths, got {len_a} and {len_b}")]
    LengthMismatch {
        /// Length of the first series.
        len_a: usize,
        /// Length of the second series.
        len_b: usize,
    },

    /// Returned when a bound is NaN.
    #[error("distance bound must not be NaN")]
    InvalidBound,

    /// Returned when a matching tolerance is negative or not finite.
    #[error("tolerance must be finite and non-negative, got {value}")]
    InvalidTolerance {
        /// The rejected tolerance.
        value: f64,
    },

    /// Returned when a parameter set names a key the measure does not expose.
    #[error("unknown parameter \"{key}\" for measure {measure}")]
    UnknownParameter {
        /// The unrecognised key.
        key: String,
        /// Name of the measure being configured.
        measure: &'static str,
    },

    /// Returned when a parameter value has the wrong type for its key.
    #[error("parameter \"{key}\" expects {expected} value")]
    ParameterType {
        /// The offending key.
        key: String,
        /// Human readable description of the expected type.
        expected: &'static str,
    },
}
