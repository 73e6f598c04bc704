//! Criterion benchmarks for resemble-lcss: exact and bounded LCSS distance.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use resemble_lcss::{Bound, Lcss, TimeSeries, WarpingWindow};

fn make_sine_series(n: usize, phase: f64) -> TimeSeries {
    let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1 + phase).sin()).collect();
    TimeSeries::new(values).unwrap()
}

fn bench_lcss_distance(c: &mut Criterion) {
    let lengths = [64usize, 256, 1024];
    let windows: &[(WarpingWindow, &str)] = &[
        (WarpingWindow::Unconstrained, "unconstrained"),
        (WarpingWindow::Radius(5), "window_r5"),
        (WarpingWindow::Radius(25), "window_r25"),
    ];

    let mut group = c.benchmark_group("lcss_distance");

    for &len in &lengths {
        for &(window, label) in windows {
            let id = BenchmarkId::new(format!("len{len}"), label);
            let a = make_sine_series(len, 0.0);
            let b = make_sine_series(len, 0.3);
            let lcss = Lcss::new().with_tolerance(0.05).unwrap().with_window(window);

            group.bench_with_input(id, &(a, b, lcss), |bencher, (a, b, lcss)| {
                bencher.iter(|| lcss.distance(a.as_view(), b.as_view(), Bound::Unbounded));
            });
        }
    }

    group.finish();
}

fn bench_lcss_abandoning(c: &mut Criterion) {
    let a = make_sine_series(512, 0.0);
    let b = make_sine_series(512, 2.0);
    let lcss = Lcss::new()
        .with_tolerance(0.05)
        .unwrap()
        .with_window(WarpingWindow::Radius(25));

    c.bench_function("lcss_bounded_512_r25", |bencher| {
        bencher.iter(|| lcss.distance(a.as_view(), b.as_view(), Bound::Finite(0.2)));
    });
}

fn bench_lcss_narrow_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("lcss_narrow_window");
    group.sample_size(20);

    for len in [10_000usize, 40_000] {
        let a = make_sine_series(len, 0.0);
        let lcss = Lcss::new().with_tolerance(0.05).unwrap();
        group.bench_with_input(BenchmarkId::new("r0", len), &a, |bencher, a| {
            bencher.iter(|| lcss.distance(a.as_view(), a.as_view(), Bound::Unbounded));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lcss_distance,
    bench_lcss_abandoning,
    bench_lcss_narrow_window
);
criterion_main!(benches);
