//! # mcts-player
//!
//! A game-agnostic Monte Carlo Tree Search (MCTS) player for turn-based,
//! perfect-information board games.
//!
//! The engine only talks to a game through the [`Game`] trait: list the legal
//! moves, play a move, revert the last move, ask whose turn it is and whether
//! somebody won. Any game implementing it can be searched, from a 3x3 grid to
//! games where pawns travel across the board.
//!
//! ## Features
//!
//! - One mutable game per tree, walked with play/revert instead of cloning
//!   a state per node
//! - UCB1 selection with random tie-breaking among unvisited children
//! - Time-bounded search with robust-child (most visited) move choice
//! - Parallel search over independent trees merged after each turn
//! - Tree reuse across turns by re-rooting on the moves actually played
//!
//! ## Basic Usage
//!
//! ```
//! use mcts_player::{Game, GameStatus, MCTSConfig, Move, Tree};
//!
//! // A single empty cell: whoever fills it wins
//! #[derive(Clone)]
//! struct LastCell {
//!     filled_by: Option<u8>,
//! }
//!
//! impl Game for LastCell {
//!     type Pawn = u8;
//!     type Cell = usize;
//!     type Player = u8;
//!
//!     fn is_finished(&self) -> bool {
//!         self.filled_by.is_some()
//!     }
//!
//!     fn play(&mut self, pawn: &u8, _cell: &usize) -> bool {
//!         if self.filled_by.is_some() {
//!             return false;
//!         }
//!         self.filled_by = Some(*pawn);
//!         true
//!     }
//!
//!     fn revert_play(&mut self) {
//!         self.filled_by = None;
//!     }
//!
//!     fn player_to_play(&self) -> u8 {
//!         1
//!     }
//!
//!     fn check_status(&self) -> GameStatus<u8> {
//!         match self.filled_by {
//!             Some(player) => GameStatus::Won(player),
//!             None => GameStatus::InProgress,
//!         }
//!     }
//!
//!     fn available_moves(&self, player: &u8) -> Vec<Move<u8, usize, u8>> {
//!         if self.filled_by.is_some() {
//!             return vec![];
//!         }
//!         vec![Move::new(*player, 0, *player)]
//!     }
//! }
//!
//! fn main() -> Result<(), mcts_player::MCTSError> {
//!     let config = MCTSConfig::default().with_time_budget(std::time::Duration::from_millis(5));
//!     let mut tree = Tree::from_config(LastCell { filled_by: None }, &config);
//!
//!     tree.begin()?;
//!
//!     let best = tree.best_move()?;
//!     assert_eq!(best.cell, 0);
//!     assert!(tree.root().children[0].visits() >= 1);
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each iteration of a tree runs four phases against the tree's own game:
//!
//! 1. **Selection**: Starting from the root, descend into the child with the
//!    highest UCB value, playing each move on the game, until a leaf or a
//!    finished position is reached.
//!
//! 2. **Expansion**: A leaf in an unfinished position gets one child per legal
//!    move; one of them is picked at random and played.
//!
//! 3. **Simulation**: Random moves are played until the game ends; the
//!    outcome is read and those moves are reverted.
//!
//! 4. **Backpropagation**: Every node on the path gets a visit, and a win if
//!    its mover won. The path's moves are reverted, leaving the game at the
//!    root again.
//!
//! [`MCTSPlayer`] runs several such trees in parallel, merges them, and keeps
//! them in step with the real game between turns.

pub mod config;
pub mod game_state;
pub mod mcts;
pub mod node;
pub mod player;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use config::{MCTSConfig, MCTSConstraints};
pub use game_state::{Game, GameMove, GameStatus, Move, Player};
pub use mcts::MCTS;
pub use node::{MCTSNode, NodePath};
pub use player::{MCTSPlayer, Observer, SearchResult};
pub use policy::{SelectionPolicy, SimulationPolicy};
pub use stats::SearchStatistics;
pub use tree::Tree;

/// Error types for the MCTS algorithm
///
/// Apart from [`NoLegalActions`](MCTSError::NoLegalActions) and
/// [`InvalidConfiguration`](MCTSError::InvalidConfiguration), every variant
/// means a game broke its contract or the trees lost track of the real game.
/// They are not meant to be retried.
#[derive(thiserror::Error, Debug)]
pub enum MCTSError {
    /// No legal actions are available from the current state
    #[error("No legal actions available from current state")]
    NoLegalActions,

    /// A move taken from the legal moves could not be played
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// The searched move does not exist in the live game
    #[error("Move translation failed: {0}")]
    MoveTranslation(String),

    /// The game reported no legal move in an unfinished position
    #[error("Game contract violated: {0}")]
    ContractViolation(String),

    /// Two trees searching different positions cannot be merged
    #[error("Incompatible trees: {0}")]
    IncompatibleTrees(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The worker thread pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;
