//! Nearest-neighbor search over time series.
//!
//! Generic over any [`DistanceMeasure`](resemble_lcss::DistanceMeasure):
//! the running k-th best distance is fed back to the measure as its pruning
//! bound, and batches of queries are searched in parallel with rayon.

mod config;
mod error;
mod result;
mod search;

pub use config::KnnConfig;
pub use error::KnnError;
pub use result::{Neighbor, Neighbors, SearchStats, total_stats};
