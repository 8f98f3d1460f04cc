//! Tic-Tac-Toe example for the MCTS player
//!
//! A human plays X against an [`MCTSPlayer`] searching with two workers.
//! Run with `RUST_LOG=debug` to see the search statistics of every turn.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use mcts_player::{Game, GameStatus, MCTSConfig, MCTSPlayer, Move};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    println!("MCTS Tic-Tac-Toe Example");
    println!("========================");
    println!();

    // Set up a new game
    let mut game = TicTacToe::new();

    // Create the computer player
    let config = MCTSConfig::default()
        .with_exploration_constant(1.414)
        .with_time_budget(Duration::from_millis(500))
        .with_workers(2);
    let mut ai: MCTSPlayer<TicTacToe> = MCTSPlayer::new(config)?.with_observer(|result| {
        println!(
            "AI explored {} playouts, root score {}",
            result.visits, result.score
        )
    });

    // Main game loop
    while !game.is_finished() {
        // Display the board
        println!("{}", game);

        let mv = if game.current_player == Mark::X {
            // Human player (X)
            print!("Your move (enter row column, e.g. '1 2'): ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            let coords: Vec<usize> = input
                .split_whitespace()
                .filter_map(|s| s.parse::<usize>().ok())
                .collect();

            if coords.len() != 2 || coords[0] > 2 || coords[1] > 2 {
                println!("Invalid move! Enter row and column (0-2).");
                continue;
            }

            let cell = coords[0] * 3 + coords[1];
            match game
                .available_moves(&Mark::X)
                .into_iter()
                .find(|mv| mv.cell == cell)
            {
                Some(mv) => mv,
                None => {
                    println!("Illegal move! Try again.");
                    continue;
                }
            }
        } else {
            // AI player (O)
            println!("AI is thinking...");
            let mv = ai.best_move(&game)?;
            println!(
                "AI chooses: {} (row {}, col {})",
                mv.cell,
                mv.cell / 3,
                mv.cell % 3
            );
            mv
        };

        game.play(&mv.pawn, &mv.cell);
        // The AI follows the human's moves too, keeping its trees in sync
        ai.update_tree(&mv)?;
    }

    // Display final state
    println!("{}", game);

    // Report the result
    match game.check_status() {
        GameStatus::Won(winner) => println!("Player {:?} wins!", winner),
        _ => println!("The game is a draw!"),
    }

    Ok(())
}

/// Players in Tic-Tac-Toe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    X,
    O,
}

impl mcts_player::Player for Mark {}

/// Tic-Tac-Toe game state
#[derive(Clone)]
struct TicTacToe {
    /// Board representation (None = empty, Some(Mark) = occupied)
    board: [Option<Mark>; 9],

    /// Current player's turn
    current_player: Mark,

    /// Cells filled so far, most recent last
    history: Vec<usize>,
}

impl TicTacToe {
    /// Creates a new empty Tic-Tac-Toe board
    fn new() -> Self {
        TicTacToe {
            board: [None; 9],
            current_player: Mark::X,
            history: Vec::with_capacity(9),
        }
    }

    /// Returns the winner of the game, if any
    fn get_winner(&self) -> Option<Mark> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ];
        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.board[a]?;
            (self.board[b] == Some(mark) && self.board[c] == Some(mark)).then_some(mark)
        })
    }

    fn other(mark: Mark) -> Mark {
        match mark {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl Game for TicTacToe {
    type Pawn = Mark;
    type Cell = usize;
    type Player = Mark;

    fn is_finished(&self) -> bool {
        self.get_winner().is_some() || self.history.len() == 9
    }

    fn play(&mut self, pawn: &Mark, cell: &usize) -> bool {
        if *pawn != self.current_player || *cell >= 9 || self.board[*cell].is_some() {
            return false;
        }
        if self.is_finished() {
            return false;
        }

        self.board[*cell] = Some(*pawn);
        self.history.push(*cell);
        self.current_player = Self::other(*pawn);
        true
    }

    fn revert_play(&mut self) {
        if let Some(cell) = self.history.pop() {
            if let Some(mark) = self.board[cell].take() {
                self.current_player = mark;
            }
        }
    }

    fn player_to_play(&self) -> Mark {
        self.current_player
    }

    fn check_status(&self) -> GameStatus<Mark> {
        match self.get_winner() {
            Some(mark) => GameStatus::Won(mark),
            None if self.history.len() == 9 => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    fn available_moves(&self, player: &Mark) -> Vec<Move<Mark, usize, Mark>> {
        if self.is_finished() {
            return Vec::new();
        }
        (0..9)
            .filter(|&cell| self.board[cell].is_none())
            .map(|cell| Move::new(*player, cell, *player))
            .collect()
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2")?;
        for row in 0..3 {
            write!(f, "{} ", row)?;
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.board[index] {
                    Some(Mark::X) => "X",
                    Some(Mark::O) => "O",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nPlayer {:?}'s turn", self.current_player)?;
        Ok(())
    }
}
