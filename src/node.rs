//! Node data structures for Monte Carlo Tree Search
//!
//! A node stands for the position reached when its acting player makes its
//! move from the parent position. Nodes own their children; there are no
//! parent links. Paths from the root are recorded as child indices in a
//! [`NodePath`], and backpropagation walks that path back up.

use std::fmt;

use rand::RngCore;

use crate::game_state::{Game, GameMove};
use crate::policy::SelectionPolicy;

/// Represents a node in the MCTS tree
///
/// Each node stores the move that led to it, the player who made that move,
/// and win/visit statistics. The game state itself is not stored: the owning
/// tree keeps one game instance positioned at whichever node is being
/// visited.
pub struct MCTSNode<G: Game> {
    /// The move that led to this node (None for a fresh root)
    pub mv: Option<GameMove<G>>,

    /// Player who made the move leading to this node
    pub player: G::Player,

    /// Number of simulations won by `player` through this node
    pub score: u64,

    /// Number of simulations that passed through this node
    pub visits: u64,

    /// Children nodes, one per legal move once expanded
    pub children: Vec<MCTSNode<G>>,
}

impl<G: Game> Clone for MCTSNode<G> {
    fn clone(&self) -> Self {
        MCTSNode {
            mv: self.mv.clone(),
            player: self.player.clone(),
            score: self.score,
            visits: self.visits,
            children: self.children.clone(),
        }
    }
}

impl<G: Game> fmt::Debug for MCTSNode<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MCTSNode")
            .field("mv", &self.mv)
            .field("player", &self.player)
            .field("score", &self.score)
            .field("visits", &self.visits)
            .field("children", &self.children.len())
            .finish()
    }
}

impl<G: Game> MCTSNode<G> {
    /// Creates a root node credited to `player`
    pub fn root(player: G::Player) -> Self {
        MCTSNode {
            mv: None,
            player,
            score: 0,
            visits: 0,
            children: Vec::new(),
        }
    }

    /// Creates a node reached by `mv`, made by `player`
    pub fn new(mv: GameMove<G>, player: G::Player) -> Self {
        MCTSNode {
            mv: Some(mv),
            player,
            score: 0,
            visits: 0,
            children: Vec::new(),
        }
    }

    /// Returns the number of visits to this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Returns the accumulated score of this node
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Returns the win rate of this node
    pub fn value(&self) -> f64 {
        crate::utils::win_rate(self.score, self.visits)
    }

    /// Returns true if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Summed `(score, visits)` of the children
    ///
    /// Every child is a move of the same player, so this is how often that
    /// player won out of the simulations run below this node.
    pub fn children_totals(&self) -> (u64, u64) {
        self.children
            .iter()
            .fold((0, 0), |(score, visits), child| {
                (score + child.score, visits + child.visits)
            })
    }

    /// Number of nodes in the subtree rooted here, this node included
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(MCTSNode::subtree_size).sum::<usize>()
    }

    /// Applies this node's move to `game`
    ///
    /// Returns false, leaving `game` untouched, if the move is not legal in
    /// the current position. A root without a move has nothing to apply.
    pub fn do_action(&self, game: &mut G) -> bool {
        match &self.mv {
            Some(mv) => game.play(&mv.pawn, &mv.cell),
            None => true,
        }
    }

    /// Undoes the effect of [`do_action`](MCTSNode::do_action)
    pub fn revert_action(&self, game: &mut G) {
        if self.mv.is_some() {
            game.revert_play();
        }
    }

    /// Creates one child per move, each credited to `next_player`
    ///
    /// Existing children are kept; expansion is only meant for leaves.
    pub fn expand_node(&mut self, possible_moves: Vec<GameMove<G>>, next_player: &G::Player) {
        self.children.reserve(possible_moves.len());
        for mv in possible_moves {
            self.children.push(MCTSNode::new(mv, next_player.clone()));
        }
    }

    /// Selects a child with `policy` and applies its move to `game`
    ///
    /// Returns the index of the selected child, or None when this node has no
    /// children or the selected move could not be played.
    pub fn select_best_child_and_do_action(
        &self,
        policy: &dyn SelectionPolicy<G>,
        game: &mut G,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        if self.children.is_empty() {
            return None;
        }
        let index = policy.select_child(self, rng);
        if self.children[index].do_action(game) {
            Some(index)
        } else {
            None
        }
    }

    /// Records the outcome of one simulation
    ///
    /// The visit always counts; the score grows only when the winner is the
    /// player who made the move leading here. A draw is `None`.
    pub fn record(&mut self, winner: Option<&G::Player>) {
        self.visits += 1;
        if winner == Some(&self.player) {
            self.score += 1;
        }
    }

    /// Backpropagates a result along `path` and reverts its moves
    ///
    /// Every node on the path, this one included, records the result. Moves
    /// are reverted deepest first, so `game` ends up back at this node's
    /// position.
    pub fn back_propagate_and_revert_action(
        &mut self,
        path: &[usize],
        winner: Option<&G::Player>,
        game: &mut G,
    ) {
        if let Some((&index, rest)) = path.split_first() {
            let child = &mut self.children[index];
            child.back_propagate_and_revert_action(rest, winner, game);
            child.revert_action(game);
        }
        self.record(winner);
    }

    /// Reverts the moves along `path` without touching any statistics
    ///
    /// Used to restore `game` when an iteration is abandoned halfway.
    pub fn revert_path(&self, path: &[usize], game: &mut G) {
        if let Some((&index, rest)) = path.split_first() {
            let child = &self.children[index];
            child.revert_path(rest, game);
            child.revert_action(game);
        }
    }

    /// Follows `path` down from this node
    ///
    /// # Panics
    ///
    /// Panics if the path does not exist in this subtree.
    pub fn descendant_mut(&mut self, path: &[usize]) -> &mut MCTSNode<G> {
        let mut node = self;
        for &index in path {
            node = &mut node.children[index];
        }
        node
    }

    /// Returns the index of the child whose move equals `mv`
    pub fn find_child(&self, mv: &GameMove<G>) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.mv.as_ref() == Some(mv))
    }

    /// Returns the index of the most visited child
    ///
    /// Ties are broken by the higher score, then by the earlier child.
    pub fn most_visited_child(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, child) in self.children.iter().enumerate() {
            let better = match best {
                None => true,
                Some(b) => {
                    let current = &self.children[b];
                    (child.visits, child.score) > (current.visits, current.score)
                }
            };
            if better {
                best = Some(i);
            }
        }
        best
    }

    /// Adds the statistics of `other` into this node
    ///
    /// Children are matched by move. Matched children are merged
    /// recursively; unmatched ones are copied over with their subtree.
    pub fn merge(&mut self, other: &MCTSNode<G>) {
        self.visits += other.visits;
        self.score += other.score;

        for other_child in &other.children {
            let matched = other_child
                .mv
                .as_ref()
                .and_then(|mv| self.find_child(mv));
            match matched {
                Some(index) => self.children[index].merge(other_child),
                None => self.children.push(other_child.clone()),
            }
        }
    }
}

/// Represents a path through the MCTS tree
///
/// A path is a sequence of indices that can be used to navigate from
/// the root node to a specific node in the tree.
#[derive(Debug, Clone, Default)]
pub struct NodePath {
    /// Indices of children to follow from the root
    pub indices: Vec<usize>,
}

impl NodePath {
    /// Creates a new empty path (pointing to the root)
    pub fn new() -> Self {
        NodePath {
            indices: Vec::new(),
        }
    }

    /// Extends the path with a new index
    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    /// Returns the length of the path
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the path is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the indices as a slice
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path[")?;
        for (i, idx) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", idx)?;
        }
        write!(f, "]")
    }
}
