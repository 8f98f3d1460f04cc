//! Simulation policies for the MCTS algorithm
//!
//! Simulation policies play a game out from the current position to estimate
//! its value. They work on the tree's own game instance and must hand it back
//! in the position they received it in.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::{
    game_state::{Game, GameMove, GameStatus},
    MCTSError, Result,
};

/// Trait for policies that simulate games
pub trait SimulationPolicy<G: Game>: Send + Sync {
    /// Plays `game` out to the end and returns the final status
    ///
    /// Every move played is reverted before returning.
    fn simulate(&self, game: &mut G, rng: &mut dyn RngCore) -> Result<GameStatus<G::Player>>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy<G>>;
}

/// Random simulation policy
///
/// This policy plays uniformly random legal moves until the game ends.
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }

    /// Picks a uniformly random move for the player to play
    ///
    /// Returns None when that player has no legal move.
    pub fn random_available_move<G: Game>(
        game: &G,
        rng: &mut dyn RngCore,
    ) -> Option<GameMove<G>> {
        let player = game.player_to_play();
        game.available_moves(&player).choose(rng).cloned()
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> SimulationPolicy<G> for RandomPolicy {
    fn simulate(&self, game: &mut G, rng: &mut dyn RngCore) -> Result<GameStatus<G::Player>> {
        let mut played = 0usize;

        let outcome = loop {
            if game.is_finished() {
                break Ok(game.check_status());
            }

            let Some(mv) = Self::random_available_move(game, rng) else {
                break Err(MCTSError::ContractViolation(format!(
                    "no legal move for {:?} in an unfinished position during rollout",
                    game.player_to_play()
                )));
            };

            if !game.play(&mv.pawn, &mv.cell) {
                break Err(MCTSError::IllegalMove(format!(
                    "rollout move {:?} was rejected",
                    mv
                )));
            }
            played += 1;
        };

        for _ in 0..played {
            game.revert_play();
        }

        outcome
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<G>> {
        Box::new(self.clone())
    }
}

// Implement SimulationPolicy for Box<dyn SimulationPolicy>
impl<G: Game> SimulationPolicy<G> for Box<dyn SimulationPolicy<G>> {
    fn simulate(&self, game: &mut G, rng: &mut dyn RngCore) -> Result<GameStatus<G::Player>> {
        (**self).simulate(game, rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<G>> {
        (**self).clone_box()
    }
}
