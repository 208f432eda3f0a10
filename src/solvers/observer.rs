//! Search Observer

use crate::combinations::Combination;

/// Observer trait for watching a backtracking search as it runs.
///
/// Every callback has an empty default, so observers only implement what they record.
/// When no observer is needed the solver uses [`NoopObserver`] and the calls are optimized
/// away via monomorphization.
pub trait SearchObserver {
    /// Called when the search enters a node at pool position `position` with running `sum`.
    fn on_visit(&mut self, _position: usize, _sum: i128) {}

    /// Called when a branch is cut because `remaining` is unreachable from `position`.
    fn on_prune(&mut self, _position: usize, _remaining: i128) {}

    /// Called when a combination hits the target and meets every requirement.
    fn on_match(&mut self, _combination: &Combination) {}

    /// Called when a selection hits the target but misses a required value.
    fn on_rejected(&mut self, _indices: &[usize]) {}
}

/// Observer that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Node counters for one search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered
    pub visited: u64,

    /// Branches cut by the reachability index
    pub pruned: u64,

    /// Combinations recorded
    pub matched: u64,

    /// Exact sums discarded for missing required values
    pub rejected: u64,
}

impl SearchObserver for SearchStats {
    fn on_visit(&mut self, _position: usize, _sum: i128) {
        self.visited += 1;
    }

    fn on_prune(&mut self, _position: usize, _remaining: i128) {
        self.pruned += 1;
    }

    fn on_match(&mut self, _combination: &Combination) {
        self.matched += 1;
    }

    fn on_rejected(&mut self, _indices: &[usize]) {
        self.rejected += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::combinations::IndexList;

    use super::*;

    #[test]
    fn stats_count_every_callback() {
        let mut stats = SearchStats::default();
        let combination = Combination::new(IndexList::new(), 0);

        stats.on_visit(0, 0);
        stats.on_visit(1, 5);
        stats.on_prune(1, 5);
        stats.on_match(&combination);
        stats.on_rejected(&[0]);

        assert_eq!(
            stats,
            SearchStats {
                visited: 2,
                pruned: 1,
                matched: 1,
                rejected: 1,
            }
        );
    }
}
