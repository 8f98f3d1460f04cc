//! Search statistics
//!
//! Every [`Tree`](crate::Tree) records what its latest search did. The player
//! folds the records of its worker trees into one per turn.

use std::time::Duration;

/// What a search did, for one tree or summed over several
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    /// Completed iterations
    pub iterations: usize,

    /// Wall-clock time of the search
    pub total_time: Duration,

    /// Nodes added by expansion
    pub nodes_created: usize,

    /// Deepest path walked by selection
    pub max_depth: usize,

    /// Number of trees these statistics were gathered from
    pub trees: usize,
}

impl SearchStatistics {
    /// Statistics of a single tree that has not searched yet
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            total_time: Duration::ZERO,
            nodes_created: 0,
            max_depth: 0,
            trees: 1,
        }
    }

    /// Folds the statistics of another tree into these ones
    ///
    /// Iterations and node counts add up, depth and time take the maximum
    /// since parallel trees run side by side.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.iterations += other.iterations;
        self.nodes_created += other.nodes_created;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.total_time = self.total_time.max(other.total_time);
        self.trees += other.trees;
    }

    /// Iterations per second of wall-clock time, all trees together
    pub fn iterations_per_second(&self) -> f64 {
        let seconds = self.total_time.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / seconds
    }

    /// One-line report, suitable for logs
    pub fn summary(&self) -> String {
        format!(
            "{} iterations on {} tree(s) in {:.3}s ({:.0}/s), {} nodes created, depth {}",
            self.iterations,
            self.trees,
            self.total_time.as_secs_f64(),
            self.iterations_per_second(),
            self.nodes_created,
            self.max_depth,
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}
