//! Tolerance-based LCSS distance for time series.
//!
//! Pure math library, zero I/O. Provides the Longest Common Subsequence
//! distance with a matching tolerance, a warping window and early abandoning
//! against a caller-supplied bound, the [`DistanceMeasure`] capability it
//! implements, and the key/value parameter protocol used to configure
//! measures by name.

mod distance;
mod error;
mod euclidean;
mod lcss;
mod measure;
mod params;
mod series;
mod window;

pub use distance::{Bound, Comparison, Distance};
pub use error::LcssError;
pub use euclidean::Euclidean;
pub use lcss::{Lcss, LcssTrace, TOLERANCE_KEY, WINDOW_KEY};
pub use measure::DistanceMeasure;
pub use params::{ParamSet, ParamValue, Parameterized};
pub use series::{TimeSeries, TimeSeriesView};
pub use window::WarpingWindow;
