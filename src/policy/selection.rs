//! Selection policies for the MCTS algorithm
//!
//! Selection policies determine which child to descend into during the
//! selection phase of MCTS, balancing exploration and exploitation.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::{game_state::Game, node::MCTSNode, utils};

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy<G: Game>: Send + Sync {
    /// Selects a child index of `node`, which must have children
    fn select_child(&self, node: &MCTSNode<G>, rng: &mut dyn RngCore) -> usize;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy<G>>;
}

/// Upper Confidence Bound 1 (UCB1) selection policy
///
/// This is the classic selection policy for MCTS:
///
/// ```text
/// UCB1 = score / visits + exploration_constant * sqrt(ln(parent_visits) / visits)
/// ```
///
/// A child that was never visited has infinite priority, so every expanded
/// child is simulated once before the formula compares any of them. Among
/// several unvisited children one is drawn uniformly at random; among equal
/// finite values the first child wins.
#[derive(Debug, Clone)]
pub struct UCB1Policy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    /// Higher values favor exploration of less-visited nodes.
    pub exploration_constant: f64,
}

impl UCB1Policy {
    /// Creates a new UCB1 policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCB1Policy {
            exploration_constant,
        }
    }

    /// Calculates the UCB1 value for a child node
    pub fn ucb1_value(&self, child_score: u64, child_visits: u64, parent_visits: u64) -> f64 {
        utils::ucb1_value(
            child_score,
            child_visits,
            parent_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCB1Policy {
    fn default() -> Self {
        Self::new(std::f64::consts::SQRT_2)
    }
}

impl<G: Game> SelectionPolicy<G> for UCB1Policy {
    fn select_child(&self, node: &MCTSNode<G>, rng: &mut dyn RngCore) -> usize {
        let unvisited: Vec<usize> = node
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.visits() == 0)
            .map(|(i, _)| i)
            .collect();
        if let Some(&index) = unvisited.choose(rng) {
            return index;
        }

        let parent_visits = node.visits();
        let mut best_value = f64::NEG_INFINITY;
        let mut best_index = 0;

        for (i, child) in node.children.iter().enumerate() {
            let ucb_value = self.ucb1_value(child.score(), child.visits(), parent_visits);

            if ucb_value > best_value {
                best_value = ucb_value;
                best_index = i;
            }
        }

        best_index
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<G>> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl<G: Game> SelectionPolicy<G> for Box<dyn SelectionPolicy<G>> {
    fn select_child(&self, node: &MCTSNode<G>, rng: &mut dyn RngCore) -> usize {
        (**self).select_child(node, rng)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<G>> {
        (**self).clone_box()
    }
}
