//! The Monte Carlo Tree Search engine
//!
//! This module contains the algorithm object that runs one iteration of the
//! four phases (selection, expansion, simulation, backpropagation) against a
//! root node and the game instance positioned at that root.

use rand::prelude::IteratorRandom;
use rand::RngCore;

use crate::{
    game_state::Game,
    node::{MCTSNode, NodePath},
    policy::{
        selection::{SelectionPolicy, UCB1Policy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    stats::SearchStatistics,
    MCTSError, Result,
};

/// The search algorithm
///
/// The engine holds no tree and no game: it only knows how to grow the tree
/// it is handed by one iteration. The game must be at the root's position on
/// entry and is back at that position when an iteration returns `Ok`.
pub struct MCTS<G: Game> {
    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy<G>>,

    /// Policy for simulating games during the simulation phase
    simulation_policy: Box<dyn SimulationPolicy<G>>,
}

impl<G: Game + 'static> MCTS<G> {
    /// Creates an engine using UCB1 selection and random rollouts
    pub fn new(exploration_constant: f64) -> Self {
        MCTS {
            selection_policy: Box::new(UCB1Policy::new(exploration_constant)),
            simulation_policy: Box::new(RandomPolicy::new()),
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<G> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy<G> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }
}

impl<G: Game> Clone for MCTS<G> {
    fn clone(&self) -> Self {
        MCTS {
            selection_policy: self.selection_policy.clone_box(),
            simulation_policy: self.simulation_policy.clone_box(),
        }
    }
}

impl<G: Game> MCTS<G> {
    /// Executes a single iteration of the MCTS algorithm
    ///
    /// On error the moves played so far are reverted, but the tree should be
    /// treated as unusable: errors mean the game broke its contract.
    pub fn execute_iteration(
        &self,
        root: &mut MCTSNode<G>,
        game: &mut G,
        rng: &mut dyn RngCore,
        statistics: &mut SearchStatistics,
    ) -> Result<()> {
        // 1. Selection phase
        let mut path = self.selection(root, game, rng)?;
        statistics.max_depth = statistics.max_depth.max(path.len());

        // 2. Expansion phase
        if let Err(e) = self.expansion(root, &mut path, game, rng, statistics) {
            root.revert_path(path.as_slice(), game);
            return Err(e);
        }

        // 3. Simulation phase
        let status = match self.simulation_policy.simulate(game, rng) {
            Ok(status) => status,
            Err(e) => {
                root.revert_path(path.as_slice(), game);
                return Err(e);
            }
        };

        // 4. Backpropagation phase
        root.back_propagate_and_revert_action(path.as_slice(), status.winner(), game);

        Ok(())
    }

    /// Selection phase: descend from the root to a leaf or a finished position
    ///
    /// Every move on the way is applied to `game`.
    fn selection(
        &self,
        root: &MCTSNode<G>,
        game: &mut G,
        rng: &mut dyn RngCore,
    ) -> Result<NodePath> {
        let mut path = NodePath::new();
        let mut current = root;

        while !current.is_leaf() && !game.is_finished() {
            match current.select_best_child_and_do_action(self.selection_policy.as_ref(), game, rng)
            {
                Some(index) => {
                    path.push(index);
                    current = &current.children[index];
                }
                None => {
                    root.revert_path(path.as_slice(), game);
                    return Err(MCTSError::IllegalMove(format!(
                        "selected move at {} could not be replayed",
                        path
                    )));
                }
            }
        }

        Ok(path)
    }

    /// Expansion phase: expand the selected leaf and step into a random child
    ///
    /// A finished position is left as it is and simulated in place.
    fn expansion(
        &self,
        root: &mut MCTSNode<G>,
        path: &mut NodePath,
        game: &mut G,
        rng: &mut dyn RngCore,
        statistics: &mut SearchStatistics,
    ) -> Result<()> {
        if game.is_finished() {
            return Ok(());
        }

        let node = root.descendant_mut(path.as_slice());

        let mut created = 0;
        if node.is_leaf() {
            let next_player = game.player_to_play();
            let possible_moves = game.available_moves(&next_player);
            if possible_moves.is_empty() {
                return Err(MCTSError::ContractViolation(format!(
                    "no legal move for {:?} in an unfinished position at {}",
                    next_player, path
                )));
            }
            created = possible_moves.len();
            node.expand_node(possible_moves, &next_player);
        }

        let Some(index) = (0..node.children.len()).choose(rng) else {
            return Ok(());
        };
        if !node.children[index].do_action(game) {
            return Err(MCTSError::IllegalMove(format!(
                "expanded move {:?} could not be played",
                node.children[index].mv
            )));
        }
        path.push(index);
        statistics.nodes_created += created;

        Ok(())
    }
}
