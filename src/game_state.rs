//! Traits defining the game contract consumed by the search.
//!
//! The [`Game`] trait is the only interface a game has to implement to be
//! searched. Unlike a functional state interface, the contract is mutable: the
//! search applies moves with [`Game::play`] and undoes them with
//! [`Game::revert_play`] in strict LIFO order, so a single game instance is
//! walked up and down the tree instead of being copied at every node.

use std::fmt::Debug;

/// Trait for players in a game
///
/// Players identify who made a move and who won a finished game.
pub trait Player: Clone + Debug + PartialEq + Send + Sync {}

/// Simplified implementation of Player trait for common id types
impl Player for usize {}
impl Player for u8 {}
impl Player for u32 {}
impl Player for i32 {}
impl Player for char {}
impl Player for String {}

/// A move: `player` moves `pawn` into `cell`.
///
/// Two moves are equal iff pawn, cell and player all match. The same type is
/// used as the edge label inside the search tree and as the value handed back
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move<Pawn, Cell, P> {
    /// The piece being moved
    pub pawn: Pawn,
    /// The destination cell
    pub cell: Cell,
    /// The player making the move
    pub player: P,
}

impl<Pawn: PartialEq, Cell: PartialEq, P> Move<Pawn, Cell, P> {
    /// Creates a new move
    pub fn new(pawn: Pawn, cell: Cell, player: P) -> Self {
        Move { pawn, cell, player }
    }

    /// Returns true if both moves put the same pawn on the same cell,
    /// regardless of the acting player.
    pub fn same_action(&self, other: &Self) -> bool {
        self.pawn == other.pawn && self.cell == other.cell
    }
}

/// Outcome reported by [`Game::check_status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus<P> {
    /// The game has not ended yet
    InProgress,
    /// The game ended without a winner
    Draw,
    /// The game was won by the given player
    Won(P),
}

impl<P> GameStatus<P> {
    /// Returns the winner, if any
    pub fn winner(&self) -> Option<&P> {
        match self {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Move type produced by a [`Game`]
pub type GameMove<G> = Move<<G as Game>::Pawn, <G as Game>::Cell, <G as Game>::Player>;

/// Trait defining the game interface required by the search
///
/// `Clone` must produce an independent deep copy: every worker searches its
/// own clone, and no mutable state may be shared with the original.
pub trait Game: Clone + Send {
    /// The pieces that can be moved
    type Pawn: Clone + Debug + PartialEq + Send + Sync;

    /// The board locations pieces move into
    type Cell: Clone + Debug + PartialEq + Send + Sync;

    /// The type of players in this game
    type Player: Player;

    /// Returns true once the game is over
    ///
    /// A position that is not finished must offer at least one move to the
    /// player to play.
    fn is_finished(&self) -> bool;

    /// Applies a move, returning false (and leaving the state untouched) if
    /// the move is illegal in the current position.
    fn play(&mut self, pawn: &Self::Pawn, cell: &Self::Cell) -> bool;

    /// Undoes exactly the most recent successful [`play`](Game::play)
    fn revert_play(&mut self);

    /// Returns the player whose turn it is
    fn player_to_play(&self) -> Self::Player;

    /// Returns the winner, a draw, or that the game is still in progress
    fn check_status(&self) -> GameStatus<Self::Player>;

    /// Returns every legal move of `player` in the current (mutated) position
    ///
    /// # Example
    ///
    /// ```
    /// # use mcts_player::{Game, GameStatus, Move};
    /// # #[derive(Clone)]
    /// # struct Nim { sticks: u8, history: Vec<u8>, turn: u8 }
    /// # impl Game for Nim {
    /// # type Pawn = ();
    /// # type Cell = u8;
    /// # type Player = u8;
    /// # fn is_finished(&self) -> bool { self.sticks == 0 }
    /// # fn play(&mut self, _: &(), take: &u8) -> bool {
    /// #     if *take == 0 || *take > self.sticks { return false; }
    /// #     self.sticks -= take; self.history.push(*take); self.turn ^= 1; true
    /// # }
    /// # fn revert_play(&mut self) {
    /// #     if let Some(take) = self.history.pop() { self.sticks += take; self.turn ^= 1; }
    /// # }
    /// # fn player_to_play(&self) -> u8 { self.turn }
    /// # fn check_status(&self) -> GameStatus<u8> {
    /// #     if self.sticks == 0 { GameStatus::Won(self.turn ^ 1) } else { GameStatus::InProgress }
    /// # }
    /// fn available_moves(&self, player: &u8) -> Vec<Move<(), u8, u8>> {
    ///     // Take one, two or three sticks from the heap
    ///     (1..=self.sticks.min(3))
    ///         .map(|take| Move::new((), take, *player))
    ///         .collect()
    /// }
    /// # }
    /// ```
    fn available_moves(
        &self,
        player: &Self::Player,
    ) -> Vec<Move<Self::Pawn, Self::Cell, Self::Player>>;
}
