//! Games shared by the integration tests
#![allow(dead_code)]

use mcts_player::{Game, GameStatus, MCTSNode, Move};

pub const X: u8 = 1;
pub const O: u8 = 2;

/// Tic-tac-toe with an undo stack
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicTacToe {
    pub board: [Option<u8>; 9],
    pub current_player: u8,
    pub history: Vec<usize>,
}

impl TicTacToe {
    pub fn new() -> Self {
        TicTacToe {
            board: [None; 9],
            current_player: X,
            history: Vec::new(),
        }
    }

    /// Builds a position from the cells each side holds
    pub fn from_cells(xs: &[usize], os: &[usize]) -> Self {
        let mut game = TicTacToe::new();
        for &cell in xs {
            game.board[cell] = Some(X);
        }
        for &cell in os {
            game.board[cell] = Some(O);
        }
        game.current_player = if xs.len() > os.len() { O } else { X };
        game
    }

    pub fn get_winner(&self) -> Option<u8> {
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
        LINES.iter().find_map(|line| {
            let first = self.board[line[0]]?;
            if self.board[line[1]] == Some(first) && self.board[line[2]] == Some(first) {
                Some(first)
            } else {
                None
            }
        })
    }

    fn is_full(&self) -> bool {
        self.board.iter().all(Option::is_some)
    }
}

impl Game for TicTacToe {
    type Pawn = u8;
    type Cell = usize;
    type Player = u8;

    fn is_finished(&self) -> bool {
        self.get_winner().is_some() || self.is_full()
    }

    fn play(&mut self, pawn: &u8, cell: &usize) -> bool {
        if *pawn != self.current_player
            || *cell >= 9
            || self.board[*cell].is_some()
            || self.is_finished()
        {
            return false;
        }
        self.board[*cell] = Some(*pawn);
        self.history.push(*cell);
        self.current_player = if *pawn == X { O } else { X };
        true
    }

    fn revert_play(&mut self) {
        if let Some(cell) = self.history.pop() {
            self.current_player = self.board[cell].take().unwrap_or(X);
        }
    }

    fn player_to_play(&self) -> u8 {
        self.current_player
    }

    fn check_status(&self) -> GameStatus<u8> {
        match self.get_winner() {
            Some(player) => GameStatus::Won(player),
            None if self.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    fn available_moves(&self, player: &u8) -> Vec<Move<u8, usize, u8>> {
        if self.is_finished() {
            return vec![];
        }
        (0..9)
            .filter(|&cell| self.board[cell].is_none())
            .map(|cell| Move::new(*player, cell, *player))
            .collect()
    }
}

/// One empty cell; whoever fills it wins
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastCell {
    pub cell: usize,
    pub filled_by: Option<u8>,
}

impl LastCell {
    pub fn new(cell: usize) -> Self {
        LastCell {
            cell,
            filled_by: None,
        }
    }
}

impl Game for LastCell {
    type Pawn = u8;
    type Cell = usize;
    type Player = u8;

    fn is_finished(&self) -> bool {
        self.filled_by.is_some()
    }

    fn play(&mut self, pawn: &u8, cell: &usize) -> bool {
        if self.filled_by.is_some() || *cell != self.cell || *pawn != X {
            return false;
        }
        self.filled_by = Some(*pawn);
        true
    }

    fn revert_play(&mut self) {
        self.filled_by = None;
    }

    fn player_to_play(&self) -> u8 {
        X
    }

    fn check_status(&self) -> GameStatus<u8> {
        match self.filled_by {
            Some(player) => GameStatus::Won(player),
            None => GameStatus::InProgress,
        }
    }

    fn available_moves(&self, player: &u8) -> Vec<Move<u8, usize, u8>> {
        if self.filled_by.is_some() {
            return vec![];
        }
        vec![Move::new(*player, self.cell, *player)]
    }
}

/// Players alternate stepping along a corridor; reaching the end is a draw
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCorridor {
    pub length: usize,
    pub width: usize,
    pub steps: Vec<usize>,
}

impl DrawCorridor {
    pub fn new(length: usize, width: usize) -> Self {
        DrawCorridor {
            length,
            width,
            steps: Vec::new(),
        }
    }
}

impl Game for DrawCorridor {
    type Pawn = u8;
    type Cell = usize;
    type Player = u8;

    fn is_finished(&self) -> bool {
        self.steps.len() >= self.length
    }

    fn play(&mut self, _pawn: &u8, lane: &usize) -> bool {
        if self.is_finished() || *lane >= self.width {
            return false;
        }
        self.steps.push(*lane);
        true
    }

    fn revert_play(&mut self) {
        self.steps.pop();
    }

    fn player_to_play(&self) -> u8 {
        if self.steps.len() % 2 == 0 {
            X
        } else {
            O
        }
    }

    fn check_status(&self) -> GameStatus<u8> {
        if self.is_finished() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    fn available_moves(&self, player: &u8) -> Vec<Move<u8, usize, u8>> {
        if self.is_finished() {
            return vec![];
        }
        (0..self.width)
            .map(|lane| Move::new(*player, lane, *player))
            .collect()
    }
}

/// Claims to be unfinished but offers no move after `depth` plays
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StuckGame {
    pub depth: usize,
    pub played: usize,
}

impl Game for StuckGame {
    type Pawn = u8;
    type Cell = usize;
    type Player = u8;

    fn is_finished(&self) -> bool {
        false
    }

    fn play(&mut self, _pawn: &u8, _cell: &usize) -> bool {
        self.played += 1;
        true
    }

    fn revert_play(&mut self) {
        self.played -= 1;
    }

    fn player_to_play(&self) -> u8 {
        X
    }

    fn check_status(&self) -> GameStatus<u8> {
        GameStatus::InProgress
    }

    fn available_moves(&self, player: &u8) -> Vec<Move<u8, usize, u8>> {
        if self.played >= self.depth {
            return vec![];
        }
        vec![Move::new(*player, 0, *player), Move::new(*player, 1, *player)]
    }
}

/// Offers moves it then refuses to play
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefusingGame {
    pub offered: usize,
}

impl Game for RefusingGame {
    type Pawn = u8;
    type Cell = usize;
    type Player = u8;

    fn is_finished(&self) -> bool {
        false
    }

    fn play(&mut self, _pawn: &u8, _cell: &usize) -> bool {
        false
    }

    fn revert_play(&mut self) {}

    fn player_to_play(&self) -> u8 {
        X
    }

    fn check_status(&self) -> GameStatus<u8> {
        GameStatus::InProgress
    }

    fn available_moves(&self, player: &u8) -> Vec<Move<u8, usize, u8>> {
        (0..self.offered)
            .map(|cell| Move::new(*player, cell, *player))
            .collect()
    }
}

/// Penguins on a grid of ice floes
///
/// A penguin slides any distance in a straight line over floes that are still
/// there and not occupied. The floe it leaves sinks and its fish go to the
/// penguin's owner. The game ends when no penguin can move; most fish wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Penguins {
    pub width: usize,
    pub height: usize,
    pub fish: Vec<u8>,
    pub penguins: Vec<(u8, usize)>,
    pub scores: [u32; 2],
    pub to_play: u8,
    history: Vec<PenguinStep>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PenguinStep {
    penguin: usize,
    from: usize,
    fish: u8,
    to_play: u8,
}

impl Penguins {
    /// A board with one penguin per player in opposite corners
    pub fn new(width: usize, height: usize) -> Self {
        let cells = width * height;
        let fish = (0..cells).map(|i| 1 + (i * 7 % 3) as u8).collect();
        Penguins {
            width,
            height,
            fish,
            penguins: vec![(X, 0), (O, cells - 1)],
            scores: [0, 0],
            to_play: X,
            history: Vec::new(),
        }
    }

    fn occupied(&self, cell: usize) -> bool {
        self.penguins.iter().any(|&(_, at)| at == cell)
    }

    fn reachable(&self, from: usize) -> Vec<usize> {
        let (w, h) = (self.width as isize, self.height as isize);
        let mut cells = Vec::new();
        for (dx, dy) in [(1isize, 0isize), (-1, 0), (0, 1), (0, -1)] {
            let (mut x, mut y) = ((from % self.width) as isize, (from / self.width) as isize);
            loop {
                x += dx;
                y += dy;
                if x < 0 || y < 0 || x >= w || y >= h {
                    break;
                }
                let cell = (y * w + x) as usize;
                if self.fish[cell] == 0 || self.occupied(cell) {
                    break;
                }
                cells.push(cell);
            }
        }
        cells
    }

    fn can_move(&self, player: u8) -> bool {
        self.penguins
            .iter()
            .any(|&(owner, at)| owner == player && !self.reachable(at).is_empty())
    }

    fn other(player: u8) -> u8 {
        if player == X {
            O
        } else {
            X
        }
    }
}

impl Game for Penguins {
    type Pawn = usize;
    type Cell = usize;
    type Player = u8;

    fn is_finished(&self) -> bool {
        !self.can_move(X) && !self.can_move(O)
    }

    fn play(&mut self, penguin: &usize, cell: &usize) -> bool {
        let Some(&(owner, from)) = self.penguins.get(*penguin) else {
            return false;
        };
        if owner != self.to_play || !self.reachable(from).contains(cell) {
            return false;
        }

        let fish = self.fish[from];
        self.history.push(PenguinStep {
            penguin: *penguin,
            from,
            fish,
            to_play: self.to_play,
        });
        self.fish[from] = 0;
        self.scores[(owner - 1) as usize] += fish as u32;
        self.penguins[*penguin].1 = *cell;

        let next = Self::other(owner);
        if self.can_move(next) {
            self.to_play = next;
        }
        true
    }

    fn revert_play(&mut self) {
        if let Some(step) = self.history.pop() {
            let owner = self.penguins[step.penguin].0;
            self.penguins[step.penguin].1 = step.from;
            self.fish[step.from] = step.fish;
            self.scores[(owner - 1) as usize] -= step.fish as u32;
            self.to_play = step.to_play;
        }
    }

    fn player_to_play(&self) -> u8 {
        self.to_play
    }

    fn check_status(&self) -> GameStatus<u8> {
        if !self.is_finished() {
            return GameStatus::InProgress;
        }
        match self.scores[0].cmp(&self.scores[1]) {
            std::cmp::Ordering::Greater => GameStatus::Won(X),
            std::cmp::Ordering::Less => GameStatus::Won(O),
            std::cmp::Ordering::Equal => GameStatus::Draw,
        }
    }

    fn available_moves(&self, player: &u8) -> Vec<Move<usize, usize, u8>> {
        self.penguins
            .iter()
            .enumerate()
            .filter(|&(_, &(owner, _))| owner == *player)
            .flat_map(|(index, &(_, at))| {
                self.reachable(at)
                    .into_iter()
                    .map(move |cell| Move::new(index, cell, *player))
            })
            .collect()
    }
}

/// Checks that no node has more visits in its children than it has itself
pub fn assert_visits_consistent<G: Game>(node: &MCTSNode<G>) {
    let children_visits: u64 = node.children.iter().map(|child| child.visits()).sum();
    assert!(
        children_visits <= node.visits(),
        "children visits {} exceed parent visits {}",
        children_visits,
        node.visits()
    );
    assert!(node.score() <= node.visits());
    for child in &node.children {
        assert_visits_consistent(child);
    }
}

/// Checks that two subtrees carry the same totals, matching children by move
pub fn assert_same_totals<G: Game>(a: &MCTSNode<G>, b: &MCTSNode<G>) {
    assert_eq!(a.visits(), b.visits(), "visits differ at {:?}", a.mv);
    assert_eq!(a.score(), b.score(), "score differs at {:?}", a.mv);
    assert_eq!(a.children.len(), b.children.len());
    for child in &a.children {
        let other = child
            .mv
            .as_ref()
            .and_then(|mv| b.find_child(mv))
            .map(|index| &b.children[index])
            .expect("matching child");
        assert_same_totals(child, other);
    }
}
