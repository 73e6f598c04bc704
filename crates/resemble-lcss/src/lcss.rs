//! LCSS distance computation.

use tracing::{debug, instrument};

use crate::distance::{Bound, Comparison, Distance};
use crate::error::LcssError;
use crate::measure::DistanceMeasure;
use crate::params::{ParamSet, Parameterized};
use crate::series::TimeSeriesView;
use crate::window::WarpingWindow;

/// Parameter key for the matching tolerance.
pub const TOLERANCE_KEY: &str = "e";

/// Parameter key for the warping window width. Negative means unconstrained.
pub const WINDOW_KEY: &str = "d";

/// Counters collected while filling the LCSS table.
///
/// `cells_visited` is the number of times the tolerance predicate was
/// evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LcssTrace {
    /// Rows of the first series processed, including the row that triggered abandonment.
    pub rows_visited: usize,
    /// Table cells computed.
    pub cells_visited: usize,
    /// Cells where the two values matched within tolerance.
    pub matches: usize,
    /// Columns held per row buffer, `min(2r + 1, len_b)`.
    pub band_width: usize,
}

/// LCSS distance configuration. Copyable and safe to share across threads.
///
/// The distance from `a` to `b` is `1 - L / len(a)`, where `L` is the length
/// of the longest common subsequence in which paired values differ by at
/// most `tolerance` and paired indices differ by at most the window radius.
/// Normalising by the first series only makes the measure asymmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lcss {
    tolerance: f64,
    window: WarpingWindow,
}

impl Default for Lcss {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            window: WarpingWindow::default(),
        }
    }
}

impl Lcss {
    /// Measure name used in logs and parameter errors.
    pub const NAME: &'static str = "lcss";

    /// Tolerance used by [`Lcss::new`].
    pub const DEFAULT_TOLERANCE: f64 = 0.01;

    /// Create an LCSS measure with tolerance 0.01 and window radius 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matching tolerance.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::InvalidTolerance`] | `tolerance` is negative, NaN or infinite |
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, LcssError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(LcssError::InvalidTolerance { value: tolerance });
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Set the warping window.
    #[must_use]
    pub fn with_window(mut self, window: WarpingWindow) -> Self {
        self.window = window;
        self
    }

    /// Return the matching tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Return the warping window.
    #[must_use]
    pub fn window(&self) -> WarpingWindow {
        self.window
    }

    /// Compute the LCSS distance from `a` to `b`, abandoning early against `bound`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::EmptyWindow`] | Some row of `a` has no column of `b` within the window |
    /// | [`LcssError::InvalidBound`] | `bound` is `Finite(NaN)` |
    pub fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError> {
        self.distance_traced(a, b, bound).map(|(cmp, _)| cmp)
    }

    /// Like [`distance`][Lcss::distance], also returning how much of the table was computed.
    ///
    /// # Errors
    ///
    /// Same as [`distance`][Lcss::distance].
    #[instrument(skip(a, b), fields(len_a = a.len(), len_b = b.len()))]
    pub fn distance_traced(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<(Comparison, LcssTrace), LcssError> {
        self.check_shape(a, b)?;
        if let Bound::Finite(v) = bound
            && v.is_nan()
        {
            return Err(LcssError::InvalidBound);
        }

        let len_a = a.len();
        let threshold = match bound {
            Bound::Unbounded => None,
            Bound::Finite(v) => Some(match_threshold(v, len_a)),
        };

        let mut trace = LcssTrace::default();
        let Some(length) = self.longest_match(a.as_slice(), b.as_slice(), threshold, &mut trace)
        else {
            return Ok((Comparison::Abandoned, trace));
        };

        let dist = 1.0 - length as f64 / len_a as f64;
        // Floating-point rounding in the threshold can let an exact tie through.
        if !bound.admits(dist) {
            debug!(dist, bound = bound.value(), "completed distance does not beat bound");
            return Ok((Comparison::Abandoned, trace));
        }
        Ok((Comparison::Distance(Distance::new(dist)), trace))
    }

    /// Length of the longest tolerance-matching common subsequence of `a` and `b`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LcssError::EmptyWindow`] | Some row of `a` has no column of `b` within the window |
    pub fn match_length(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
    ) -> Result<usize, LcssError> {
        self.check_shape(a, b)?;
        let mut trace = LcssTrace::default();
        // No threshold: rows are never capped, so the table always completes.
        let length = self.longest_match(a.as_slice(), b.as_slice(), None, &mut trace);
        debug_assert!(length.is_some(), "unbounded LCSS table was abandoned");
        Ok(length.unwrap_or_default())
    }

    fn check_shape(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> Result<(), LcssError> {
        if a.is_empty() || b.is_empty() {
            return Err(LcssError::EmptySeries);
        }
        if let Some(row) = self.window.first_empty_row(a.len(), b.len()) {
            return Err(LcssError::EmptyWindow {
                row,
                len_a: a.len(),
                len_b: b.len(),
                radius: self.window.radius(a.len()),
            });
        }
        Ok(())
    }

    /// Fill the LCSS table row by row, keeping only the previous row.
    ///
    /// Row buffers hold `band_width + 1` slots. Slot 0 stands for the column
    /// left of the row's band and stays zero; column `j` of a row starting at
    /// `start` lives in slot `j - start + 1`. Cells outside a row's band read
    /// as zero, as in a zero-initialised full table, so stale slots past the
    /// current row's width are never read.
    ///
    /// With a `threshold`, returns `None` as soon as a row shows that the last
    /// row cannot reach it. Every row adds at most one to the running
    /// maximum, so row `i` must reach `threshold - (len_a - 1 - i)`. Without a
    /// threshold no row is ever capped and the result is always `Some`.
    fn longest_match(
        &self,
        a: &[f64],
        b: &[f64],
        threshold: Option<i64>,
        trace: &mut LcssTrace,
    ) -> Option<usize> {
        let n = a.len();
        let m = b.len();

        let bw = self.window.band_width(n, m);
        trace.band_width = bw;
        let mut prev = vec![0usize; bw + 1];
        let mut curr = vec![0usize; bw + 1];
        let mut prev_band = 0..0;

        for i in 0..n {
            trace.rows_visited += 1;

            let remaining = i64::try_from(n - 1 - i).unwrap_or(i64::MAX);
            let required = threshold.map(|t| t.saturating_sub(remaining));
            let mut reached = false;

            let band = self.window.column_range(i, n, m);
            let prev_cell = |j: usize| {
                if prev_band.contains(&j) {
                    prev[j - prev_band.start + 1]
                } else {
                    0
                }
            };

            for j in band.clone() {
                trace.cells_visited += 1;
                let local = j - band.start + 1;
                let cell = if (a[i] - b[j]).abs() <= self.tolerance {
                    trace.matches += 1;
                    j.checked_sub(1).map_or(0, prev_cell) + 1
                } else {
                    prev_cell(j).max(curr[local - 1])
                };
                curr[local] = cell;

                if !reached && required.is_some_and(|r| i64::try_from(cell).unwrap_or(i64::MAX) >= r)
                {
                    reached = true;
                }
            }

            if let Some(required) = required
                && !reached
            {
                debug!(row = i, required, "row capped below threshold, abandoning");
                return None;
            }

            prev_band = band;
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last row.
        Some(prev[1..=prev_band.len()].iter().copied().max().unwrap_or(0))
    }
}

/// Smallest match length whose distance could beat `bound` for a first
/// series of `len_a` values: `floor((1 - bound) * len_a) + 1`.
fn match_threshold(bound: f64, len_a: usize) -> i64 {
    // `as` saturates, so bounds far outside [0, 1] stay representable.
    (((1.0 - bound) * len_a as f64).floor() as i64).saturating_add(1)
}

impl DistanceMeasure for Lcss {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn distance(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        bound: Bound,
    ) -> Result<Comparison, LcssError> {
        Lcss::distance(self, a, b, bound)
    }
}

impl Parameterized for Lcss {
    fn params(&self) -> ParamSet {
        ParamSet::new()
            .with(TOLERANCE_KEY, self.tolerance)
            .with(WINDOW_KEY, self.window.to_raw())
    }

    fn set_params(&mut self, params: &ParamSet) -> Result<(), LcssError> {
        let mut next = *self;
        for (key, value) in params.iter() {
            match key {
                TOLERANCE_KEY => next = next.with_tolerance(value.as_f64())?,
                WINDOW_KEY => {
                    let raw = value.as_i64().ok_or_else(|| LcssError::ParameterType {
                        key: key.to_string(),
                        expected: "an integer",
                    })?;
                    next = next.with_window(WarpingWindow::from_raw(raw));
                }
                other => {
                    return Err(LcssError::UnknownParameter {
                        key: other.to_string(),
                        measure: Self::NAME,
                    });
                }
            }
        }
        debug!(tolerance = next.tolerance, window = next.window.to_raw(), "lcss parameters set");
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;

    fn ts(values: &[f64]) -> TimeSeries {
        TimeSeries::new(values.to_vec()).unwrap()
    }

    fn exact(lcss: &Lcss, a: &TimeSeries, b: &TimeSeries) -> f64 {
        lcss.distance(a.as_view(), b.as_view(), Bound::Unbounded)
            .unwrap()
            .distance()
            .expect("unbounded comparison always completes")
            .value()
    }

    fn unconstrained() -> Lcss {
        Lcss::new().with_window(WarpingWindow::Unconstrained)
    }

    #[test]
    fn defaults() {
        let lcss = Lcss::new();
        assert_eq!(lcss.tolerance(), 0.01);
        assert_eq!(lcss.window(), WarpingWindow::Radius(0));
    }

    #[test]
    fn reversed_ramp_matches_only_the_midpoint() {
        let a = ts(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = ts(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        let lcss = unconstrained();
        assert_eq!(lcss.match_length(a.as_view(), b.as_view()).unwrap(), 1);
        assert!((exact(&lcss, &a, &b) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn constant_series_match_on_the_diagonal() {
        let a = ts(&[1.0, 1.0, 1.0]);
        let lcss = Lcss::new();
        assert_eq!(lcss.match_length(a.as_view(), a.as_view()).unwrap(), 3);
        assert_eq!(exact(&lcss, &a, &a), 0.0);
    }

    #[test]
    fn tolerance_widens_matches() {
        let a = ts(&[0.0, 1.0, 2.0]);
        let b = ts(&[0.05, 1.05, 2.05]);
        assert_eq!(exact(&Lcss::new(), &a, &b), 1.0);
        let loose = Lcss::new().with_tolerance(0.1).unwrap();
        assert_eq!(exact(&loose, &a, &b), 0.0);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let a = ts(&[0.0]);
        let b = ts(&[0.5]);
        let lcss = Lcss::new().with_tolerance(0.5).unwrap();
        assert_eq!(exact(&lcss, &a, &b), 0.0);
    }

    #[test]
    fn window_limits_shifted_matches() {
        // b is a shifted by two positions
        let a = ts(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = ts(&[9.0, 9.0, 1.0, 2.0, 3.0, 4.0]);
        let tight = Lcss::new().with_window(WarpingWindow::Radius(1));
        let wide = Lcss::new().with_window(WarpingWindow::Radius(2));
        assert_eq!(tight.match_length(a.as_view(), b.as_view()).unwrap(), 0);
        assert_eq!(wide.match_length(a.as_view(), b.as_view()).unwrap(), 4);
    }

    #[test]
    fn normalised_by_first_length() {
        let short = ts(&[1.0, 2.0]);
        let long = ts(&[1.0, 7.0, 2.0, 7.0]);
        let lcss = unconstrained();
        // both values of `short` are found in `long`
        assert_eq!(exact(&lcss, &short, &long), 0.0);
        // only half of `long` is found in `short`
        assert_eq!(exact(&lcss, &long, &short), 0.5);
    }

    #[test]
    fn rejects_negative_tolerance() {
        assert_eq!(
            Lcss::new().with_tolerance(-0.1),
            Err(LcssError::InvalidTolerance { value: -0.1 })
        );
        assert!(Lcss::new().with_tolerance(f64::NAN).is_err());
        assert!(Lcss::new().with_tolerance(0.0).is_ok());
    }

    #[test]
    fn rejects_window_with_uncovered_rows() {
        let a = ts(&[1.0, 2.0, 3.0, 4.0]);
        let b = ts(&[1.0, 2.0]);
        let lcss = Lcss::new().with_window(WarpingWindow::Radius(1));
        let err = lcss.distance(a.as_view(), b.as_view(), Bound::Unbounded).unwrap_err();
        assert_eq!(
            err,
            LcssError::EmptyWindow { row: 3, len_a: 4, len_b: 2, radius: 1 }
        );
    }

    #[test]
    fn rejects_nan_bound() {
        let a = ts(&[1.0]);
        let result = Lcss::new().distance(a.as_view(), a.as_view(), Bound::Finite(f64::NAN));
        assert_eq!(result, Err(LcssError::InvalidBound));
    }

    #[test]
    fn threshold_rounding() {
        assert_eq!(match_threshold(0.5, 4), 3);
        assert_eq!(match_threshold(0.25, 10), 8);
        assert_eq!(match_threshold(1.0, 10), 1);
        // a bound above one can be beaten by zero matches
        assert!(match_threshold(1.5, 10) <= 0);
        // a non-positive bound asks for more matches than exist
        assert_eq!(match_threshold(0.0, 10), 11);
        assert_eq!(match_threshold(f64::NEG_INFINITY, 10), i64::MAX);
    }

    #[test]
    fn unreachable_threshold_abandons_after_first_row() {
        let a = ts(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let lcss = Lcss::new().with_window(WarpingWindow::Radius(1));
        // bound 0 -> threshold 6 > len_a: even a perfect match fails
        let (cmp, trace) = lcss
            .distance_traced(a.as_view(), a.as_view(), Bound::Finite(0.0))
            .unwrap();
        assert_eq!(cmp, Comparison::Abandoned);
        assert_eq!(trace.rows_visited, 1);
        // row 0 with radius 1 covers columns 0 and 1
        assert_eq!(trace.cells_visited, 2);
        assert_eq!(trace.band_width, 3);
    }

    #[test]
    fn unbounded_visits_every_windowed_cell() {
        let a = ts(&[0.0, 1.0, 0.0, 1.0]);
        let b = ts(&[5.0, 5.0, 5.0, 5.0]);
        let lcss = Lcss::new().with_window(WarpingWindow::Radius(1));
        let (cmp, trace) = lcss
            .distance_traced(a.as_view(), b.as_view(), Bound::Unbounded)
            .unwrap();
        assert_eq!(cmp.value(), 1.0);
        assert_eq!(trace.rows_visited, 4);
        // widths 2 + 3 + 3 + 2
        assert_eq!(trace.cells_visited, 10);
        assert_eq!(trace.matches, 0);
    }

    #[test]
    fn narrow_window_buffers_follow_the_band() {
        let n = 50_000;
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let a = ts(&values);
        let lcss = Lcss::new();
        let (cmp, trace) = lcss
            .distance_traced(a.as_view(), a.as_view(), Bound::Unbounded)
            .unwrap();
        assert_eq!(cmp.value(), 0.0);
        assert_eq!(trace.band_width, 1);
        assert_eq!(trace.rows_visited, n);
        assert_eq!(trace.cells_visited, n);

        let wide = Lcss::new().with_window(WarpingWindow::Radius(3));
        let (_, trace) = wide
            .distance_traced(a.as_view(), a.as_view(), Bound::Unbounded)
            .unwrap();
        assert_eq!(trace.band_width, 7);
    }

    #[test]
    fn band_offsets_track_shifted_rows() {
        // rows near the end of a shorter `b` have clipped bands
        let a = ts(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = ts(&[2.0, 3.0, 4.0, 5.0]);
        let lcss = Lcss::new().with_window(WarpingWindow::Radius(2));
        assert_eq!(lcss.match_length(a.as_view(), b.as_view()).unwrap(), 4);
        assert_eq!(lcss.match_length(b.as_view(), a.as_view()).unwrap(), 4);
    }

    #[test]
    fn match_length_without_matches_is_zero() {
        let a = ts(&[1.0, 2.0, 3.0]);
        let b = ts(&[7.0, 8.0, 9.0]);
        let lcss = unconstrained();
        assert_eq!(lcss.match_length(a.as_view(), b.as_view()).unwrap(), 0);
        assert_eq!(exact(&lcss, &a, &b), 1.0);
    }

    #[test]
    fn bound_just_above_exact_keeps_result() {
        let a = ts(&[1.0, 2.0, 3.0, 4.0]);
        let b = ts(&[1.0, 2.0, 9.0, 9.0]);
        let lcss = unconstrained();
        let d = exact(&lcss, &a, &b);
        assert_eq!(d, 0.5);

        let above = lcss.distance(a.as_view(), b.as_view(), Bound::Finite(0.51)).unwrap();
        assert_eq!(above.value(), 0.5);

        let equal = lcss.distance(a.as_view(), b.as_view(), Bound::Finite(0.5)).unwrap();
        assert!(equal.is_abandoned());

        let below = lcss.distance(a.as_view(), b.as_view(), Bound::Finite(0.49)).unwrap();
        assert!(below.is_abandoned());
    }

    #[test]
    fn late_matches_are_not_abandoned_early() {
        // the first rows have no match at all, but the tail matches fully
        let a = ts(&[9.0, 9.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = ts(&[0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let lcss = Lcss::new();
        assert_eq!(exact(&lcss, &a, &b), 0.25);
        let bounded = lcss.distance(a.as_view(), b.as_view(), Bound::Finite(0.3)).unwrap();
        assert!((bounded.value() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn params_round_trip() {
        let lcss = Lcss::new()
            .with_tolerance(0.2)
            .unwrap()
            .with_window(WarpingWindow::Unconstrained);
        let params = lcss.params();
        assert_eq!(params.get(TOLERANCE_KEY).map(|v| v.as_f64()), Some(0.2));
        assert_eq!(params.get(WINDOW_KEY).and_then(|v| v.as_i64()), Some(-1));

        let mut other = Lcss::new();
        other.set_params(&params).unwrap();
        assert_eq!(other, lcss);
    }

    #[test]
    fn set_params_is_atomic() {
        let mut lcss = Lcss::new();
        let bad = ParamSet::new().with(WINDOW_KEY, 4_i64).with(TOLERANCE_KEY, -1.0);
        assert!(matches!(
            lcss.set_params(&bad),
            Err(LcssError::InvalidTolerance { .. })
        ));
        assert_eq!(lcss, Lcss::new());
    }

    #[test]
    fn set_params_rejects_unknown_and_mistyped() {
        let mut lcss = Lcss::new();
        let unknown = ParamSet::new().with("w", 3_i64);
        assert!(matches!(
            lcss.set_params(&unknown),
            Err(LcssError::UnknownParameter { measure: "lcss", .. })
        ));
        let mistyped = ParamSet::new().with(WINDOW_KEY, 2.5);
        assert!(matches!(
            lcss.set_params(&mistyped),
            Err(LcssError::ParameterType { .. })
        ));
    }

    #[test]
    fn integer_tolerance_is_accepted() {
        let mut lcss = Lcss::new();
        lcss.set_params(&ParamSet::new().with(TOLERANCE_KEY, 1_i64)).unwrap();
        assert_eq!(lcss.tolerance(), 1.0);
    }
}
