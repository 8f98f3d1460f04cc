//! Configuration options for the MCTS player
//!
//! This module defines the configuration parameters that control the
//! behavior of a search: how long each turn may think, how many independent
//! trees are grown in parallel, and how exploratory selection is.

use std::time::Duration;

use crate::{MCTSError, Result};

/// Time budget bounding how long a tree keeps iterating
///
/// This is an immutable value handed to every [`Tree`](crate::Tree) at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MCTSConstraints {
    /// Wall-clock time a single search may run for
    pub time: Duration,
}

impl MCTSConstraints {
    /// Creates constraints with a budget in milliseconds
    pub fn from_millis(millis: u64) -> Self {
        MCTSConstraints {
            time: Duration::from_millis(millis),
        }
    }
}

/// Configuration for the MCTS player
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use mcts_player::MCTSConfig;
/// use std::time::Duration;
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_time_budget(Duration::from_millis(250))
///     .with_workers(4)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.constraints().time, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// Exploration constant `C` of the UCB formula
    ///
    /// Higher values favor exploration of less-visited nodes.
    /// The standard value is sqrt(2) ≈ 1.414.
    pub exploration_constant: f64,

    /// How long each tree searches per turn
    pub time_budget: Duration,

    /// Number of independent trees grown in parallel
    ///
    /// With a single worker the search runs on the caller's thread.
    pub workers: usize,

    /// Seed for the worker random number generators
    ///
    /// Worker `i` is seeded with `seed + i`. When unset every worker draws
    /// its seed from the operating system.
    pub seed: Option<u64>,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: std::f64::consts::SQRT_2,
            time_budget: Duration::from_millis(1000),
            workers: 1,
            seed: None,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the time budget of a search
    pub fn with_time_budget(mut self, duration: Duration) -> Self {
        self.time_budget = duration;
        self
    }

    /// Sets the number of parallel workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the base seed of the worker random number generators
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the time constraints derived from this configuration
    pub fn constraints(&self) -> MCTSConstraints {
        MCTSConstraints {
            time: self.time_budget,
        }
    }

    /// Checks that the configuration can drive a search
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "at least one worker is required".to_string(),
            ));
        }
        if !(self.exploration_constant >= 0.0) {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
