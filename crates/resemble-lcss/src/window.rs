//! Warping window: how far a matched index in one series may drift from the other.

use std::ops::Range;

/// Maximum index offset between matched positions of the two series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarpingWindow {
    /// No explicit limit. Resolved per comparison to a radius of `len_a + 1`.
    Unconstrained,

    /// Position `i` of the first series may only match positions `j` of the
    /// second with `|i - j| <= radius`.
    Radius(usize),
}

impl Default for WarpingWindow {
    /// Radius zero: positions only match their counterpart at the same index.
    fn default() -> Self {
        Self::Radius(0)
    }
}

impl WarpingWindow {
    /// Interpret a signed window width. Negative values mean unconstrained.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        match usize::try_from(raw) {
            Ok(radius) => Self::Radius(radius),
            Err(_) => Self::Unconstrained,
        }
    }

    /// Signed representation, `-1` for [`WarpingWindow::Unconstrained`].
    #[must_use]
    pub fn to_raw(self) -> i64 {
        match self {
            Self::Unconstrained => -1,
            Self::Radius(r) => i64::try_from(r).unwrap_or(i64::MAX),
        }
    }

    /// Effective radius when the first series has `len_a` values.
    #[must_use]
    pub fn radius(self, len_a: usize) -> usize {
        match self {
            Self::Unconstrained => len_a.saturating_add(1),
            Self::Radius(r) => r,
        }
    }

    /// Columns of the second series visited for `row` of the first.
    ///
    /// The band `[row - r, row + r]` is clipped to `[0, len_b)`. The result is
    /// empty when the band lies entirely past the end of the second series.
    #[must_use]
    pub fn column_range(self, row: usize, len_a: usize, len_b: usize) -> Range<usize> {
        let r = self.radius(len_a);
        let start = row.saturating_sub(r);
        let end = row.saturating_add(r).saturating_add(1).min(len_b);
        start..end.max(start)
    }

    /// Widest column range of any row: `min(2r + 1, len_b)`.
    #[must_use]
    pub fn band_width(self, len_a: usize, len_b: usize) -> usize {
        self.radius(len_a)
            .saturating_mul(2)
            .saturating_add(1)
            .min(len_b)
    }

    /// First row of the first series with no column in range, if any.
    ///
    /// Rows only lose candidates at the far end, so if row `len_a - 1` still
    /// has a column, every row does.
    #[must_use]
    pub fn first_empty_row(self, len_a: usize, len_b: usize) -> Option<usize> {
        let first = len_b.saturating_add(self.radius(len_a));
        (first < len_a).then_some(first)
    }
}
