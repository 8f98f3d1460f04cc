//! Penguin self-play example for the MCTS player
//!
//! Two computer players, each owning two penguins, race for fish on a board
//! of ice floes. A penguin slides in a straight line over floes that are still
//! afloat and free; the floe it leaves sinks and its fish are scored. A player
//! with no penguin able to move passes, and the game ends when nobody can move.
//!
//! Both players keep their trees in sync with every move, so each search
//! starts from the statistics gathered on earlier turns.

use std::fmt;
use std::time::Duration;

use mcts_player::{Game, GameStatus, MCTSConfig, MCTSPlayer, Move};

const WIDTH: usize = 6;
const HEIGHT: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    println!("MCTS Penguin Self-Play Example");
    println!("==============================");
    println!();

    let mut game = Penguins::new();

    let config = |seed| {
        MCTSConfig::default()
            .with_time_budget(Duration::from_millis(300))
            .with_workers(4)
            .with_seed(seed)
    };
    let mut players: [MCTSPlayer<Penguins>; 2] =
        [MCTSPlayer::new(config(1))?, MCTSPlayer::new(config(1000))?];

    while !game.is_finished() {
        println!("{}", game);

        let to_play = game.player_to_play();
        let mv = players[to_play].best_move(&game)?;
        println!(
            "Player {} slides penguin {} to {:?} (search: {})",
            to_play,
            mv.pawn,
            game.coordinates(mv.cell),
            players[to_play].statistics().summary()
        );

        game.play(&mv.pawn, &mv.cell);
        for player in &mut players {
            player.update_tree(&mv)?;
        }
    }

    println!("{}", game);
    match game.check_status() {
        GameStatus::Won(winner) => println!("Player {} wins!", winner),
        _ => println!("The game is a draw!"),
    }

    Ok(())
}

/// A penguin: its owner and the floe it stands on
#[derive(Clone, Copy, Debug)]
struct Penguin {
    owner: usize,
    at: usize,
}

#[derive(Clone, Debug)]
struct Slide {
    penguin: usize,
    from: usize,
    fish: u8,
    to_play: usize,
}

#[derive(Clone)]
struct Penguins {
    /// Fish on each floe; 0 means the floe has sunk
    fish: Vec<u8>,
    penguins: Vec<Penguin>,
    scores: [u32; 2],
    to_play: usize,
    history: Vec<Slide>,
}

impl Penguins {
    fn new() -> Self {
        let cells = WIDTH * HEIGHT;
        let fish = (0..cells).map(|i| 1 + ((i * 5 + i / WIDTH) % 3) as u8).collect();
        let penguins = vec![
            Penguin { owner: 0, at: 0 },
            Penguin { owner: 1, at: WIDTH - 1 },
            Penguin { owner: 0, at: cells - 1 },
            Penguin { owner: 1, at: cells - WIDTH },
        ];
        Penguins {
            fish,
            penguins,
            scores: [0, 0],
            to_play: 0,
            history: Vec::new(),
        }
    }

    fn coordinates(&self, cell: usize) -> (usize, usize) {
        (cell / WIDTH, cell % WIDTH)
    }

    fn occupied(&self, cell: usize) -> bool {
        self.penguins.iter().any(|penguin| penguin.at == cell)
    }

    /// Floes a penguin on `from` can slide to
    fn reachable(&self, from: usize) -> Vec<usize> {
        let mut cells = Vec::new();
        for (dr, dc) in [(0isize, 1isize), (0, -1), (1, 0), (-1, 0), (1, 1), (-1, -1)] {
            let (mut row, mut col) = ((from / WIDTH) as isize, (from % WIDTH) as isize);
            loop {
                row += dr;
                col += dc;
                if row < 0 || col < 0 || row >= HEIGHT as isize || col >= WIDTH as isize {
                    break;
                }
                let cell = row as usize * WIDTH + col as usize;
                if self.fish[cell] == 0 || self.occupied(cell) {
                    break;
                }
                cells.push(cell);
            }
        }
        cells
    }

    fn can_move(&self, player: usize) -> bool {
        self.penguins
            .iter()
            .any(|penguin| penguin.owner == player && !self.reachable(penguin.at).is_empty())
    }
}

impl Game for Penguins {
    type Pawn = usize;
    type Cell = usize;
    type Player = usize;

    fn is_finished(&self) -> bool {
        !self.can_move(0) && !self.can_move(1)
    }

    fn play(&mut self, pawn: &usize, cell: &usize) -> bool {
        let Some(&penguin) = self.penguins.get(*pawn) else {
            return false;
        };
        if penguin.owner != self.to_play || !self.reachable(penguin.at).contains(cell) {
            return false;
        }

        let fish = self.fish[penguin.at];
        self.history.push(Slide {
            penguin: *pawn,
            from: penguin.at,
            fish,
            to_play: self.to_play,
        });
        self.fish[penguin.at] = 0;
        self.scores[penguin.owner] += u32::from(fish);
        self.penguins[*pawn].at = *cell;

        // A player who cannot move passes
        let next = 1 - penguin.owner;
        if self.can_move(next) {
            self.to_play = next;
        }
        true
    }

    fn revert_play(&mut self) {
        if let Some(slide) = self.history.pop() {
            let owner = self.penguins[slide.penguin].owner;
            self.penguins[slide.penguin].at = slide.from;
            self.fish[slide.from] = slide.fish;
            self.scores[owner] -= u32::from(slide.fish);
            self.to_play = slide.to_play;
        }
    }

    fn player_to_play(&self) -> usize {
        self.to_play
    }

    fn check_status(&self) -> GameStatus<usize> {
        if !self.is_finished() {
            return GameStatus::InProgress;
        }
        match self.scores[0].cmp(&self.scores[1]) {
            std::cmp::Ordering::Greater => GameStatus::Won(0),
            std::cmp::Ordering::Less => GameStatus::Won(1),
            std::cmp::Ordering::Equal => GameStatus::Draw,
        }
    }

    fn available_moves(&self, player: &usize) -> Vec<Move<usize, usize, usize>> {
        self.penguins
            .iter()
            .enumerate()
            .filter(|(_, penguin)| penguin.owner == *player)
            .flat_map(|(index, penguin)| {
                self.reachable(penguin.at)
                    .into_iter()
                    .map(move |cell| Move::new(index, cell, *player))
            })
            .collect()
    }
}

impl fmt::Display for Penguins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let cell = row * WIDTH + col;
                let symbol = match self.penguins.iter().find(|p| p.at == cell) {
                    Some(penguin) => if penguin.owner == 0 { 'A' } else { 'B' },
                    None if self.fish[cell] == 0 => ' ',
                    None => char::from(b'0' + self.fish[cell]),
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "Scores: A {} - B {}   Player {} to play",
            self.scores[0], self.scores[1], self.to_play
        )
    }
}
