//! The MCTS player
//!
//! [`MCTSPlayer`] owns one search tree per worker. Each turn it lets every
//! tree search its own clone of the game for the configured time budget,
//! merges them into one tree, reads the most visited move and translates it
//! back into a move of the live game. Between turns the trees follow the
//! moves actually played so their statistics carry over.

use std::fmt;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    config::MCTSConfig,
    game_state::{Game, GameMove},
    mcts::MCTS,
    policy::{SelectionPolicy, SimulationPolicy},
    stats::SearchStatistics,
    tree::Tree,
    MCTSError, Result,
};

/// Outcome of one search as reported to the caller
pub struct SearchResult<G: Game> {
    /// The chosen move, as produced by the live game
    pub mv: GameMove<G>,

    /// Simulations won by the searching player, over all workers
    ///
    /// Read from the merged root's children, which are all moves of the
    /// player to play. The root itself is credited to whoever moved into it,
    /// which changes once trees are reused across turns.
    pub score: u64,

    /// Simulations run below the merged root
    pub visits: u64,
}

impl<G: Game> Clone for SearchResult<G> {
    fn clone(&self) -> Self {
        SearchResult {
            mv: self.mv.clone(),
            score: self.score,
            visits: self.visits,
        }
    }
}

impl<G: Game> PartialEq for SearchResult<G> {
    fn eq(&self, other: &Self) -> bool {
        self.mv == other.mv && self.score == other.score && self.visits == other.visits
    }
}

impl<G: Game> fmt::Debug for SearchResult<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("mv", &self.mv)
            .field("score", &self.score)
            .field("visits", &self.visits)
            .finish()
    }
}

/// Callback notified whenever a new best move is ready
pub type Observer<G> = Box<dyn Fn(&SearchResult<G>) + Send + Sync>;

/// A computer player backed by one or more MCTS trees
///
/// # Example
///
/// ```
/// use mcts_player::{Game, GameStatus, MCTSConfig, MCTSPlayer, Move};
/// use std::time::Duration;
///
/// // Players take one or two sticks; whoever takes the last stick wins
/// #[derive(Clone)]
/// struct Nim {
///     sticks: u8,
///     history: Vec<u8>,
///     turn: u8,
/// }
///
/// impl Game for Nim {
///     type Pawn = ();
///     type Cell = u8;
///     type Player = u8;
///
///     fn is_finished(&self) -> bool {
///         self.sticks == 0
///     }
///
///     fn play(&mut self, _: &(), take: &u8) -> bool {
///         if *take == 0 || *take > 2 || *take > self.sticks {
///             return false;
///         }
///         self.sticks -= take;
///         self.history.push(*take);
///         self.turn ^= 1;
///         true
///     }
///
///     fn revert_play(&mut self) {
///         if let Some(take) = self.history.pop() {
///             self.sticks += take;
///             self.turn ^= 1;
///         }
///     }
///
///     fn player_to_play(&self) -> u8 {
///         self.turn
///     }
///
///     fn check_status(&self) -> GameStatus<u8> {
///         if self.sticks == 0 {
///             GameStatus::Won(self.turn ^ 1)
///         } else {
///             GameStatus::InProgress
///         }
///     }
///
///     fn available_moves(&self, player: &u8) -> Vec<Move<(), u8, u8>> {
///         (1..=self.sticks.min(2)).map(|take| Move::new((), take, *player)).collect()
///     }
/// }
///
/// fn main() -> Result<(), mcts_player::MCTSError> {
///     let mut game = Nim { sticks: 4, history: Vec::new(), turn: 0 };
///     let config = MCTSConfig::default().with_time_budget(Duration::from_millis(20));
///     let mut player = MCTSPlayer::new(config)?;
///
///     let mv = player.best_move(&game)?;
///     assert!(game.play(&mv.pawn, &mv.cell));
///     player.update_tree(&mv)?;
///
///     let result = player.result().expect("a search has completed");
///     assert!(result.visits >= 1);
///     Ok(())
/// }
/// ```
pub struct MCTSPlayer<G: Game> {
    /// Configuration shared by every worker
    config: MCTSConfig,

    /// Engine template cloned into every new tree
    engine: MCTS<G>,

    /// One tree per worker, created on the first search
    trees: Vec<Tree<G>>,

    /// Worker threads, created on the first parallel search
    pool: Option<ThreadPool>,

    /// Result of the latest search
    latest_result: Option<SearchResult<G>>,

    /// Statistics of the latest search, summed over workers
    statistics: SearchStatistics,

    /// Notified after each search
    observer: Option<Observer<G>>,
}

impl<G: Game + 'static> MCTSPlayer<G> {
    /// Creates a player from a configuration
    pub fn new(config: MCTSConfig) -> Result<Self> {
        config.validate()?;
        let engine = MCTS::new(config.exploration_constant);
        Ok(MCTSPlayer {
            config,
            engine,
            trees: Vec::new(),
            pool: None,
            latest_result: None,
            statistics: SearchStatistics::new(),
            observer: None,
        })
    }

    /// Sets the selection policy used by trees created from now on
    pub fn with_selection_policy<P: SelectionPolicy<G> + 'static>(mut self, policy: P) -> Self {
        self.engine = self.engine.with_selection_policy(policy);
        self
    }

    /// Sets the simulation policy used by trees created from now on
    pub fn with_simulation_policy<P: SimulationPolicy<G> + 'static>(mut self, policy: P) -> Self {
        self.engine = self.engine.with_simulation_policy(policy);
        self
    }

    /// Registers a callback fired each time a new best move is ready
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&SearchResult<G>) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Searches `game` and returns the best move for the player to play
    ///
    /// The returned move is one of `game`'s own available moves. Worker trees
    /// are cloned from `game` on the first call and reused afterwards, so
    /// every move played since must have been passed to
    /// [`update_tree`](MCTSPlayer::update_tree).
    pub fn best_move(&mut self, game: &G) -> Result<GameMove<G>> {
        if game.is_finished() {
            return Err(MCTSError::NoLegalActions);
        }

        if self.trees.is_empty() {
            self.spawn_trees(game);
        }

        // Trees that failed or drifted from the live game are not reused
        let result = match self.unleash().and_then(|()| self.search_result(game)) {
            Ok(result) => result,
            Err(e) => {
                self.trees.clear();
                return Err(e);
            }
        };
        let mv = result.mv.clone();
        info!(
            "best move {:?} (won {}/{} over {} trees)",
            result.mv, result.score, result.visits, self.statistics.trees
        );

        if let Some(observer) = &self.observer {
            observer(&result);
        }
        self.latest_result = Some(result);

        Ok(mv)
    }

    /// Advances every tree past a move played in the live game
    ///
    /// Must be called for every move, the opponent's included.
    pub fn update_tree(&mut self, last_move_played: &GameMove<G>) -> Result<()> {
        for tree in &mut self.trees {
            if let Err(e) = tree.move_root_to_move(last_move_played) {
                self.trees.clear();
                return Err(e);
            }
        }
        Ok(())
    }

    fn spawn_trees(&mut self, game: &G) {
        debug!("creating {} search trees", self.config.workers);
        self.trees = (0..self.config.workers)
            .map(|worker| {
                let tree = Tree::new(game.clone(), self.config.constraints())
                    .with_engine(self.engine.clone());
                match self.config.seed {
                    Some(seed) => tree.with_seed(seed.wrapping_add(worker as u64)),
                    None => tree,
                }
            })
            .collect();
    }

    /// Runs every tree for its time budget
    ///
    /// A single tree runs on the calling thread; several trees run on the
    /// worker pool, one job each, and this call blocks until all are done.
    fn unleash(&mut self) -> Result<()> {
        if self.trees.len() == 1 {
            self.trees[0].begin()?;
        } else {
            if self.pool.is_none() {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(self.trees.len())
                    .thread_name(|i| format!("mcts-worker-{}", i))
                    .build()?;
                self.pool = Some(pool);
            }

            let trees = &mut self.trees;
            if let Some(pool) = &self.pool {
                pool.install(|| {
                    trees
                        .par_iter_mut()
                        .with_max_len(1)
                        .map(Tree::begin)
                        .collect::<Result<()>>()
                })?;
            }
        }

        let mut statistics = self.trees[0].statistics().clone();
        for tree in &self.trees[1..] {
            statistics.merge(tree.statistics());
        }
        debug!("{}", statistics.summary());
        self.statistics = statistics;

        Ok(())
    }

    /// Merges the workers and reads the best move for the live game
    fn search_result(&self, game: &G) -> Result<SearchResult<G>> {
        let combined = self.join_trees(game)?;
        let best = combined.best_move()?;
        let mv = self.corresponding_move(game, &best)?;
        let (score, visits) = combined.root().children_totals();

        Ok(SearchResult { mv, score, visits })
    }

    /// Merges every worker tree into a fresh tree over `game`
    fn join_trees(&self, game: &G) -> Result<Tree<G>> {
        let mut combined = Tree::new(game.clone(), self.config.constraints());
        for tree in &self.trees {
            combined.merge(tree)?;
        }
        Ok(combined)
    }

    /// Finds the live game's move putting the same pawn on the same cell
    fn corresponding_move(&self, game: &G, mv: &GameMove<G>) -> Result<GameMove<G>> {
        let to_play = game.player_to_play();
        if to_play != mv.player {
            return Err(MCTSError::MoveTranslation(format!(
                "searched move {:?} belongs to {:?} but {:?} is to play",
                mv, mv.player, to_play
            )));
        }

        game.available_moves(&mv.player)
            .into_iter()
            .find(|candidate| candidate.same_action(mv))
            .ok_or_else(|| {
                MCTSError::MoveTranslation(format!(
                    "searched move {:?} is not available in the live game",
                    mv
                ))
            })
    }
}

impl<G: Game> MCTSPlayer<G> {
    /// Returns the result of the latest search
    pub fn result(&self) -> Option<&SearchResult<G>> {
        self.latest_result.as_ref()
    }

    /// Returns the statistics of the latest search, summed over workers
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the worker trees
    pub fn trees(&self) -> &[Tree<G>] {
        &self.trees
    }

    /// Returns the configuration
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Drops every worker tree; the next search starts from scratch
    pub fn reset(&mut self) {
        self.trees.clear();
        self.latest_result = None;
    }
}

impl<G: Game> fmt::Debug for MCTSPlayer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MCTSPlayer")
            .field("config", &self.config)
            .field("trees", &self.trees.len())
            .field("latest_result", &self.latest_result)
            .finish()
    }
}
