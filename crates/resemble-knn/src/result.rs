//! Result types for nearest-neighbor search.

use resemble_lcss::Distance;

/// A reference series and its distance from the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the series in the reference slice.
    pub index: usize,
    /// Distance from the query to this series.
    pub distance: Distance,
}

/// How many comparisons a search ran and how many were cut short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Comparisons started.
    pub evaluated: usize,
    /// Comparisons that ended in [`Comparison::Abandoned`](resemble_lcss::Comparison::Abandoned).
    pub abandoned: usize,
}

impl SearchStats {
    /// Fraction of comparisons that were abandoned, zero when none ran.
    #[must_use]
    pub fn abandon_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.abandoned as f64 / self.evaluated as f64
        }
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            evaluated: self.evaluated + other.evaluated,
            abandoned: self.abandoned + other.abandoned,
        }
    }
}

/// The k nearest reference series for one query, closest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbors {
    pub(crate) neighbors: Vec<Neighbor>,
    /// Comparison counters for this query.
    pub stats: SearchStats,
}

impl Neighbors {
    /// Neighbors ordered by ascending distance. Ties keep reference order.
    #[must_use]
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    /// The closest reference series.
    #[must_use]
    pub fn nearest(&self) -> Option<Neighbor> {
        self.neighbors.first().copied()
    }

    /// Number of neighbors found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Return true if no neighbors were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

/// Sum the counters of several searches.
#[must_use]
pub fn total_stats(results: &[Neighbors]) -> SearchStats {
    results
        .iter()
        .fold(SearchStats::default(), |acc, r| acc.merge(r.stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abandon_rate() {
        let stats = SearchStats { evaluated: 8, abandoned: 2 };
        assert_eq!(stats.abandon_rate(), 0.25);
        assert_eq!(SearchStats::default().abandon_rate(), 0.0);
    }

    #[test]
    fn totals_add_up() {
        let a = Neighbors {
            neighbors: vec![],
            stats: SearchStats { evaluated: 3, abandoned: 1 },
        };
        let b = Neighbors {
            neighbors: vec![],
            stats: SearchStats { evaluated: 5, abandoned: 4 },
        };
        assert_eq!(
            total_stats(&[a, b]),
            SearchStats { evaluated: 8, abandoned: 5 }
        );
    }
}
