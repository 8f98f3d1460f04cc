//! Policies for different phases of the MCTS algorithm
//!
//! - Selection policies: How to choose which child to descend into
//! - Simulation policies: How to play out games from a position

pub mod selection;
pub mod simulation;

pub use selection::{SelectionPolicy, UCB1Policy};
pub use simulation::{RandomPolicy, SimulationPolicy};
