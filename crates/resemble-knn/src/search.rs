//! Best-so-far nearest-neighbor search.
//!
//! Reference series are scanned in order while the k best distances are kept
//! sorted. Once k neighbors are known, the k-th best distance is handed to
//! the measure as its bound, so candidates that cannot enter the list are
//! abandoned part way through their comparison.

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use resemble_lcss::{Bound, DistanceMeasure, TimeSeries, TimeSeriesView};

use crate::config::KnnConfig;
use crate::error::KnnError;
use crate::result::{Neighbor, Neighbors, SearchStats, total_stats};

/// Insert `candidate` into `best`, which is sorted by ascending distance and
/// holds at most `k` entries. Equal distances keep the earlier entry first.
fn insert_into_best(best: &mut Vec<Neighbor>, candidate: Neighbor, k: usize) {
    let d = candidate.distance.value();
    let pos = best.partition_point(|n| n.distance.value() <= d);
    if pos < k {
        best.insert(pos, candidate);
        best.truncate(k);
    }
}

pub(crate) fn search_one<M>(
    config: &KnnConfig,
    measure: &M,
    query_index: usize,
    query: TimeSeriesView<'_>,
    reference: &[TimeSeries],
) -> Result<Neighbors, KnnError>
where
    M: DistanceMeasure + ?Sized,
{
    let k = config.k;
    let mut best: Vec<Neighbor> = Vec::with_capacity(k + 1);
    let mut stats = SearchStats::default();

    for (index, candidate) in reference.iter().enumerate() {
        let bound = match best.get(k - 1) {
            Some(kth) if config.pruning => Bound::from(kth.distance),
            _ => Bound::Unbounded,
        };

        let comparison = measure
            .distance(query, candidate.as_view(), bound)
            .map_err(|source| KnnError::Measure {
                query: query_index,
                reference: index,
                source,
            })?;
        stats.evaluated += 1;

        match comparison.distance() {
            Some(distance) => insert_into_best(&mut best, Neighbor { index, distance }, k),
            None => stats.abandoned += 1,
        }
    }

    debug!(
        query = query_index,
        evaluated = stats.evaluated,
        abandoned = stats.abandoned,
        "query searched"
    );
    Ok(Neighbors {
        neighbors: best,
        stats,
    })
}

#[instrument(skip_all, fields(
    measure = measure.name(),
    k = config.k,
    n_queries = queries.len(),
    n_reference = reference.len(),
))]
pub(crate) fn search_batch<M>(
    config: &KnnConfig,
    measure: &M,
    queries: &[TimeSeries],
    reference: &[TimeSeries],
) -> Result<Vec<Neighbors>, KnnError>
where
    M: DistanceMeasure + ?Sized,
{
    let results: Vec<Neighbors> = queries
        .par_iter()
        .enumerate()
        .map(|(i, q)| search_one(config, measure, i, q.as_view(), reference))
        .collect::<Result<_, _>>()?;

    let stats = total_stats(&results);
    info!(
        evaluated = stats.evaluated,
        abandoned = stats.abandoned,
        abandon_rate = stats.abandon_rate(),
        "batch search complete"
    );
    Ok(results)
}
