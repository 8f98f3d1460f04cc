//! Utility functions for the MCTS algorithm
//!
//! Formulas shared by the selection policy and the reporting code, plus the
//! wall-clock timer that bounds a search.

use std::time::{Duration, Instant};

/// Calculates the exploitation term for UCB
///
/// This is simply the win rate of a node.
pub fn exploitation_term(score: u64, visits: u64) -> f64 {
    win_rate(score, visits)
}

/// Calculates the exploration term for UCB
///
/// This is the term that encourages exploration of less-visited nodes.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCB value of a child node
///
/// `score / visits + C * sqrt(ln(parent_visits) / visits)`, infinite for a
/// child that was never visited.
pub fn ucb1_value(score: u64, visits: u64, parent_visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    exploitation_term(score, visits) + exploration_term(parent_visits, visits, exploration_constant)
}

/// Safely calculates the win rate from wins and visits
///
/// Returns 0.0 if no visits have occurred.
pub fn win_rate(wins: u64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    wins as f64 / visits as f64
}

/// Wall-clock timer measuring a search against its budget
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Starts a new timer
    pub fn start() -> Self {
        Timer {
            start: Instant::now(),
        }
    }

    /// Restarts the timer from now
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// Time elapsed since the timer was started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Milliseconds elapsed since the timer was started
    pub fn millis_elapsed(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// Returns true once `budget` has been used up
    pub fn is_expired(&self, budget: Duration) -> bool {
        self.elapsed() >= budget
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}
