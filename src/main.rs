use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use resemble_io::{Dataset, ExperimentName, ResultWriter, SearchRun, SeriesReader};
use resemble_knn::{KnnConfig, total_stats};
use resemble_lcss::{
    Bound, DistanceMeasure, Euclidean, Lcss, LcssTrace, ParamSet, Parameterized, TOLERANCE_KEY,
    TimeSeries, WINDOW_KEY,
};

#[derive(Parser)]
#[command(name = "resemble")]
#[command(about = "Tolerance-based LCSS distance and nearest-neighbor search for time series")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum MeasureKind {
    /// Longest common subsequence with a matching tolerance
    Lcss,
    /// Lock-step Euclidean distance (equal lengths only)
    Euclidean,
}

/// Shared distance-measure parameters.
#[derive(Args, Debug, Clone)]
struct MeasureArgs {
    /// Distance measure
    #[arg(long, value_enum, default_value_t = MeasureKind::Lcss)]
    measure: MeasureKind,

    /// LCSS matching tolerance (values within it are equal)
    #[arg(long, default_value_t = Lcss::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// LCSS warping window radius (negative = unconstrained)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    window: i64,

    /// JSON file of measure parameters, e.g. {"e": 0.05, "d": 3}; overrides the flags above
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two series from one CSV file
    Distance {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Id of the first series (the one the distance is normalised by)
        #[arg(long)]
        a: String,

        /// Id of the second series
        #[arg(long)]
        b: String,

        /// Abandon once the distance cannot beat this value
        #[arg(long, allow_negative_numbers = true)]
        bound: Option<f64>,

        #[command(flatten)]
        measure: MeasureArgs,
    },

    /// Find the k nearest reference series for every query series
    Neighbors {
        /// Path to the reference CSV file
        #[arg(long)]
        reference: PathBuf,

        /// Path to the query CSV file
        #[arg(long)]
        queries: PathBuf,

        /// Number of neighbors per query
        #[arg(long, default_value_t = 1)]
        k: usize,

        /// Run every comparison to completion instead of pruning with the k-th best distance
        #[arg(long, default_value_t = false)]
        no_pruning: bool,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        measure: MeasureArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct DistanceOutput {
    measure: &'static str,
    params: ParamSet,
    a: String,
    b: String,
    len_a: usize,
    len_b: usize,
    bound: Option<f64>,
    abandoned: bool,
    distance: Option<f64>,
    trace: Option<TraceOutput>,
}

#[derive(Serialize)]
struct TraceOutput {
    rows_visited: usize,
    cells_visited: usize,
    matches: usize,
    band_width: usize,
}

impl From<LcssTrace> for TraceOutput {
    fn from(t: LcssTrace) -> Self {
        Self {
            rows_visited: t.rows_visited,
            cells_visited: t.cells_visited,
            matches: t.matches,
            band_width: t.band_width,
        }
    }
}

#[derive(Serialize)]
struct NeighborsOutput {
    experiment: String,
    measure: &'static str,
    params: ParamSet,
    k: usize,
    pruning: bool,
    n_queries: usize,
    n_reference: usize,
    evaluated: usize,
    abandoned: usize,
    abandon_rate: f64,
    output: PathBuf,
}

/// A configured measure together with its effective parameters.
enum Measure {
    Lcss(Lcss),
    Euclidean(Euclidean),
}

impl Measure {
    fn as_dyn(&self) -> &dyn DistanceMeasure {
        match self {
            Self::Lcss(m) => m,
            Self::Euclidean(m) => m,
        }
    }

    fn params(&self) -> ParamSet {
        match self {
            Self::Lcss(m) => m.params(),
            Self::Euclidean(m) => m.params(),
        }
    }
}

fn load_params(path: &Path) -> Result<ParamSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse parameter file {}", path.display()))
}

/// LCSS parameters from the flags, overridden key by key by the `--params` file.
fn lcss_params(args: &MeasureArgs, overrides: Option<&ParamSet>) -> ParamSet {
    let mut params = ParamSet::new()
        .with(TOLERANCE_KEY, args.tolerance)
        .with(WINDOW_KEY, args.window);
    if let Some(file) = overrides {
        params.extend(file);
    }
    params
}

fn build_measure(args: &MeasureArgs) -> Result<Measure> {
    let overrides = args.params.as_deref().map(load_params).transpose()?;

    let measure = match args.measure {
        MeasureKind::Lcss => {
            let mut lcss = Lcss::new();
            lcss.set_params(&lcss_params(args, overrides.as_ref()))
                .context("invalid LCSS parameters")?;
            Measure::Lcss(lcss)
        }
        MeasureKind::Euclidean => {
            let mut euclidean = Euclidean;
            if let Some(p) = &overrides {
                euclidean
                    .set_params(p)
                    .context("invalid Euclidean parameters")?;
            }
            Measure::Euclidean(euclidean)
        }
    };
    info!(measure = measure.as_dyn().name(), params = ?measure.params(), "measure configured");
    Ok(measure)
}

fn read_dataset(path: &Path, what: &str) -> Result<Dataset> {
    SeriesReader::new(path)
        .read()
        .with_context(|| format!("failed to read {what} CSV"))
}

fn lookup<'a>(dataset: &'a Dataset, id: &str, path: &Path) -> Result<&'a TimeSeries> {
    dataset
        .get(id)
        .with_context(|| format!("series \"{id}\" not found in {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Distance {
            data,
            a,
            b,
            bound,
            measure,
        } => {
            let measure = build_measure(&measure)?;
            let dataset = read_dataset(&data, "input")?;
            let series_a = lookup(&dataset, &a, &data)?;
            let series_b = lookup(&dataset, &b, &data)?;

            let limit = match bound {
                Some(v) => Bound::new(v).context("invalid --bound")?,
                None => Bound::Unbounded,
            };

            let (comparison, trace) = match &measure {
                Measure::Lcss(lcss) => {
                    let (cmp, trace) = lcss
                        .distance_traced(series_a.as_view(), series_b.as_view(), limit)
                        .context("LCSS comparison failed")?;
                    (cmp, Some(TraceOutput::from(trace)))
                }
                Measure::Euclidean(euclidean) => {
                    let cmp = euclidean
                        .distance(series_a.as_view(), series_b.as_view(), limit)
                        .context("Euclidean comparison failed")?;
                    (cmp, None)
                }
            };

            let output = DistanceOutput {
                measure: measure.as_dyn().name(),
                params: measure.params(),
                len_a: series_a.len(),
                len_b: series_b.len(),
                a,
                b,
                bound,
                abandoned: comparison.is_abandoned(),
                distance: comparison.distance().map(|d| d.value()),
                trace,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Neighbors {
            reference,
            queries,
            k,
            no_pruning,
            experiment,
            output_dir,
            measure,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let measure = build_measure(&measure)?;
            let config = KnnConfig::new(k)?.with_pruning(!no_pruning);

            let reference_set = read_dataset(&reference, "reference")?;
            let query_set = read_dataset(&queries, "query")?;

            let results = config
                .search_batch(measure.as_dyn(), &query_set.series, &reference_set.series)
                .context("neighbor search failed")?;

            let params = measure.params();
            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let path = writer.write_neighbors(&SearchRun {
                measure: measure.as_dyn().name(),
                params: &params,
                k,
                pruning: config.pruning(),
                query_ids: &query_set.ids,
                reference_ids: &reference_set.ids,
                results: &results,
            })?;

            let stats = total_stats(&results);
            let output = NeighborsOutput {
                experiment,
                measure: measure.as_dyn().name(),
                params,
                k,
                pruning: config.pruning(),
                n_queries: query_set.len(),
                n_reference: reference_set.len(),
                evaluated: stats.evaluated,
                abandoned: stats.abandoned,
                abandon_rate: stats.abandon_rate(),
                output: path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
