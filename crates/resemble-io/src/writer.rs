//! JSON result writer for nearest-neighbor searches.

use std::fs;
use std::path::{Path, PathBuf};

use resemble_knn::{Neighbors, total_stats};
use resemble_lcss::ParamSet;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, SeriesId};

/// Everything describing one batch search, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct SearchRun<'a> {
    /// Name of the distance measure used.
    pub measure: &'a str,
    /// Parameters of the measure.
    pub params: &'a ParamSet,
    /// Number of neighbors requested per query.
    pub k: usize,
    /// Whether bound-driven pruning was enabled.
    pub pruning: bool,
    /// Ids of the query series, in query order.
    pub query_ids: &'a [SeriesId],
    /// Ids of the reference series; neighbor indices point into this slice.
    pub reference_ids: &'a [SeriesId],
    /// One result per query.
    pub results: &'a [Neighbors],
}

/// Writes search results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_neighbors.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the neighbors file for this experiment.
    #[must_use]
    pub fn neighbors_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_neighbors.json", self.experiment.as_str()))
    }

    /// Write a batch search to `{experiment}_neighbors.json` and return its path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::ResultCountMismatch`] | `results` and `query_ids` differ in length |
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(measure = run.measure, n_queries = run.query_ids.len()))]
    pub fn write_neighbors(&self, run: &SearchRun<'_>) -> Result<PathBuf, IoError> {
        if run.results.len() != run.query_ids.len() {
            return Err(IoError::ResultCountMismatch {
                n_queries: run.query_ids.len(),
                n_results: run.results.len(),
            });
        }
        let path = self.neighbors_path();

        let queries: Vec<QueryEntry<'_>> = run
            .query_ids
            .iter()
            .zip(run.results)
            .map(|(id, result)| QueryEntry {
                id: id.as_str(),
                evaluated: result.stats.evaluated,
                abandoned: result.stats.abandoned,
                neighbors: result
                    .neighbors()
                    .iter()
                    .map(|n| NeighborEntry {
                        id: run.reference_ids.get(n.index).map(SeriesId::as_str),
                        index: n.index,
                        distance: n.distance.value(),
                    })
                    .collect(),
            })
            .collect();

        let stats = total_stats(run.results);
        let artifact = NeighborsArtifact {
            experiment: self.experiment.as_str(),
            measure: run.measure,
            params: run.params,
            k: run.k,
            pruning: run.pruning,
            n_queries: run.query_ids.len(),
            n_reference: run.reference_ids.len(),
            evaluated: stats.evaluated,
            abandoned: stats.abandoned,
            abandon_rate: stats.abandon_rate(),
            queries,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "neighbors written");
        Ok(path)
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct NeighborsArtifact<'a> {
    experiment: &'a str,
    measure: &'a str,
    params: &'a ParamSet,
    k: usize,
    pruning: bool,
    n_queries: usize,
    n_reference: usize,
    evaluated: usize,
    abandoned: usize,
    abandon_rate: f64,
    queries: Vec<QueryEntry<'a>>,
}

#[derive(Serialize)]
struct QueryEntry<'a> {
    id: &'a str,
    evaluated: usize,
    abandoned: usize,
    neighbors: Vec<NeighborEntry<'a>>,
}

#[derive(Serialize)]
struct NeighborEntry<'a> {
    id: Option<&'a str>,
    index: usize,
    distance: f64,
}
