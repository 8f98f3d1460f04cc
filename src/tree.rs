//! A search tree bound to its own copy of the game
//!
//! A [`Tree`] owns the root node and a private game clone kept at the root's
//! position between iterations. It runs the engine for a time budget,
//! answers the best move found so far, merges with trees grown elsewhere and
//! follows the real game by re-rooting on the moves actually played.

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{MCTSConfig, MCTSConstraints},
    game_state::{Game, GameMove},
    mcts::MCTS,
    node::MCTSNode,
    stats::SearchStatistics,
    utils::Timer,
    MCTSError, Result,
};

/// A search tree with its own game clone
pub struct Tree<G: Game> {
    /// Root node of the search tree
    root: MCTSNode<G>,

    /// Game positioned at the root between iterations
    game: G,

    /// Time budget of [`begin`](Tree::begin)
    constraints: MCTSConstraints,

    /// The search algorithm
    engine: MCTS<G>,

    /// Random source for selection ties, expansion and rollouts
    rng: StdRng,

    /// Statistics of the latest search
    statistics: SearchStatistics,
}

impl<G: Game + 'static> Tree<G> {
    /// Creates a tree searching `game` under the given constraints
    ///
    /// The root is credited to the player to play, the one searching.
    pub fn new(game: G, constraints: MCTSConstraints) -> Self {
        let root = MCTSNode::root(game.player_to_play());
        Tree {
            root,
            game,
            constraints,
            engine: MCTS::new(std::f64::consts::SQRT_2),
            rng: StdRng::from_entropy(),
            statistics: SearchStatistics::new(),
        }
    }

    /// Creates a tree from a player configuration
    pub fn from_config(game: G, config: &MCTSConfig) -> Self {
        let tree = Tree::new(game, config.constraints())
            .with_engine(MCTS::new(config.exploration_constant));
        match config.seed {
            Some(seed) => tree.with_seed(seed),
            None => tree,
        }
    }
}

impl<G: Game> Tree<G> {
    /// Sets the search algorithm to use
    pub fn with_engine(mut self, engine: MCTS<G>) -> Self {
        self.engine = engine;
        self
    }

    /// Makes the tree's random choices reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Returns the root node
    pub fn root(&self) -> &MCTSNode<G> {
        &self.root
    }

    /// Returns the game clone, positioned at the root
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Returns the time budget of this tree
    pub fn constraints(&self) -> MCTSConstraints {
        self.constraints
    }

    /// Returns the statistics of the latest search
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Runs the search until the time budget is used up
    ///
    /// The budget is checked after each completed iteration, so at least one
    /// iteration always runs and an iteration in flight always finishes.
    pub fn begin(&mut self) -> Result<()> {
        let budget = self.constraints.time;
        self.run(|_, timer| !timer.is_expired(budget))
    }

    /// Runs exactly `iterations` iterations, ignoring the time budget
    pub fn iterate(&mut self, iterations: usize) -> Result<()> {
        if iterations == 0 {
            return Ok(());
        }
        self.run(|done, _| done < iterations)
    }

    fn run<F>(&mut self, mut keep_going: F) -> Result<()>
    where
        F: FnMut(usize, &Timer) -> bool,
    {
        if self.game.is_finished() {
            return Err(MCTSError::NoLegalActions);
        }

        let timer = Timer::start();
        let mut statistics = SearchStatistics::new();

        loop {
            self.engine.execute_iteration(
                &mut self.root,
                &mut self.game,
                &mut self.rng,
                &mut statistics,
            )?;
            statistics.iterations += 1;

            if !keep_going(statistics.iterations, &timer) {
                break;
            }
        }

        statistics.total_time = timer.elapsed();
        debug!(
            "search finished: {} iterations in {} ms, {} new nodes, depth {}, root visits {}",
            statistics.iterations,
            timer.millis_elapsed(),
            statistics.nodes_created,
            statistics.max_depth,
            self.root.visits()
        );
        self.statistics = statistics;

        Ok(())
    }

    /// Returns the move of the most visited root child
    ///
    /// Ties are broken by the higher score, then by the earlier child.
    pub fn best_move(&self) -> Result<GameMove<G>> {
        self.root
            .most_visited_child()
            .and_then(|index| self.root.children[index].mv.clone())
            .ok_or(MCTSError::NoLegalActions)
    }

    /// Adds the statistics of `other` into this tree
    ///
    /// Both trees must search a position with the same player to play.
    /// Children are matched by move: matched subtrees are summed
    /// recursively, unmatched ones are copied in whole.
    pub fn merge(&mut self, other: &Tree<G>) -> Result<()> {
        let mine = self.game.player_to_play();
        let theirs = other.game.player_to_play();
        if mine != theirs {
            return Err(MCTSError::IncompatibleTrees(format!(
                "cannot merge a tree where {:?} is to play into one where {:?} is to play",
                theirs, mine
            )));
        }

        self.root.merge(&other.root);
        Ok(())
    }

    /// Advances the root to the position after `mv`
    ///
    /// If the root has a child for `mv` it becomes the new root with all of
    /// its statistics; its siblings are dropped. Otherwise the search starts
    /// over from a fresh root. The move is also played on the tree's game.
    pub fn move_root_to_move(&mut self, mv: &GameMove<G>) -> Result<()> {
        if !self.game.play(&mv.pawn, &mv.cell) {
            return Err(MCTSError::IllegalMove(format!(
                "move {:?} cannot be played on the tree's game",
                mv
            )));
        }

        match self.root.find_child(mv) {
            Some(index) => {
                let child = self.root.children.swap_remove(index);
                trace!(
                    "root advanced to {:?} keeping {} visits over {} nodes",
                    mv,
                    child.visits(),
                    child.subtree_size()
                );
                self.root = child;
            }
            None => {
                debug!("move {:?} was never explored, starting from a fresh root", mv);
                self.root = MCTSNode::root(mv.player.clone());
            }
        }

        Ok(())
    }

    /// Returns a visualization of the search tree
    pub fn visualize(&self) -> String {
        let mut result = String::new();
        Self::visualize_node(&self.root, 0, &mut result);
        result
    }

    /// Helper method to visualize a node and its children
    fn visualize_node(node: &MCTSNode<G>, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);
        let move_str = match &node.mv {
            Some(mv) => format!("{:?} -> {:?} by {:?}", mv.pawn, mv.cell, mv.player),
            None => "Root".to_string(),
        };

        output.push_str(&format!(
            "{}{} (visits: {}, score: {}, value: {:.3})\n",
            indent,
            move_str,
            node.visits(),
            node.score(),
            node.value()
        ));

        for child in &node.children {
            Self::visualize_node(child, depth + 1, output);
        }
    }
}
