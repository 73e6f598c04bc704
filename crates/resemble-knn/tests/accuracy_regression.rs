//! Accuracy regression tests for resemble-knn.
//!
//! Pruned searches must return exactly the neighbors an exhaustive search
//! returns. Data comes from seeded generators so failures are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use resemble_knn::{KnnConfig, Neighbors, total_stats};
use resemble_lcss::{Bound, DistanceMeasure, Euclidean, Lcss, TimeSeries, WarpingWindow};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_series(rng: &mut ChaCha8Rng, len: usize) -> TimeSeries {
    let values: Vec<f64> = (0..len).map(|_| f64::from(rng.gen_range(0..5_u8))).collect();
    TimeSeries::new(values).expect("valid test series")
}

fn random_set(rng: &mut ChaCha8Rng, n: usize, len: usize) -> Vec<TimeSeries> {
    (0..n).map(|_| random_series(rng, len)).collect()
}

/// Exhaustive k-nearest search by full sort, stable so ties keep reference order.
fn brute_force<M: DistanceMeasure>(
    measure: &M,
    query: &TimeSeries,
    reference: &[TimeSeries],
    k: usize,
) -> Vec<(usize, f64)> {
    let mut all: Vec<(usize, f64)> = reference
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let d = measure
                .distance(query.as_view(), r.as_view(), Bound::Unbounded)
                .expect("unbounded comparison")
                .value();
            (i, d)
        })
        .collect();
    all.sort_by(|x, y| x.1.total_cmp(&y.1));
    all.truncate(k);
    all
}

fn as_pairs(result: &Neighbors) -> Vec<(usize, f64)> {
    result
        .neighbors()
        .iter()
        .map(|n| (n.index, n.distance.value()))
        .collect()
}

// ---------------------------------------------------------------------------
// a) pruned_search_matches_brute_force
// ---------------------------------------------------------------------------

#[test]
fn pruned_search_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for round in 0..40 {
        let len = rng.gen_range(4..24);
        let reference = random_set(&mut rng, 30, len);
        let query = random_series(&mut rng, len);
        let k = rng.gen_range(1..6);
        let radius = rng.gen_range(0..len + 2);
        let lcss = Lcss::new().with_window(WarpingWindow::Radius(radius));

        let config = KnnConfig::new(k).unwrap();
        let pruned = config.search(&lcss, query.as_view(), &reference).unwrap();
        let full = config
            .with_pruning(false)
            .search(&lcss, query.as_view(), &reference)
            .unwrap();

        let expected = brute_force(&lcss, &query, &reference, k);
        assert_eq!(as_pairs(&pruned), expected, "round {round}: pruned");
        assert_eq!(as_pairs(&full), expected, "round {round}: unpruned");
        assert_eq!(full.stats.abandoned, 0);
        assert_eq!(pruned.stats.evaluated, reference.len());
    }
}

// ---------------------------------------------------------------------------
// b) euclidean_search_matches_brute_force
// ---------------------------------------------------------------------------

#[test]
fn euclidean_search_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let reference = random_set(&mut rng, 50, 16);
    let queries = random_set(&mut rng, 8, 16);
    let config = KnnConfig::new(3).unwrap();

    let results = config.search_batch(&Euclidean, &queries, &reference).unwrap();
    for (query, result) in queries.iter().zip(&results) {
        let expected = brute_force(&Euclidean, query, &reference, 3);
        assert_eq!(as_pairs(result), expected);
    }
}

// ---------------------------------------------------------------------------
// c) pruning_skips_work
// ---------------------------------------------------------------------------

#[test]
fn pruning_skips_work() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let reference = random_set(&mut rng, 100, 32);
    // Query duplicates a reference series, so the bound drops to zero early.
    let mut queries = vec![reference[3].clone()];
    queries.extend(random_set(&mut rng, 4, 32));

    let lcss = Lcss::new().with_window(WarpingWindow::Radius(4));
    let config = KnnConfig::new(1).unwrap();
    let results = config.search_batch(&lcss, &queries, &reference).unwrap();

    assert_eq!(results[0].nearest().unwrap().index, 3);
    assert_eq!(results[0].nearest().unwrap().distance.value(), 0.0);
    assert!(results[0].stats.abandoned >= 96);

    let stats = total_stats(&results);
    assert_eq!(stats.evaluated, 500);
    assert!(stats.abandon_rate() > 0.0);
}
