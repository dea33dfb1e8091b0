/// Win and draw detection
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::board::{Board, Cell, Player};

/// Which of the eight lines was completed; drives the sweep animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Row(usize),
    Col(usize),
    /// 0 runs top-left to bottom-right, 1 runs top-right to bottom-left
    Diag(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine {
    pub kind: LineKind,
    pub cells: [(usize, usize); 3],
}

impl WinningLine {
    pub const fn new(kind: LineKind) -> Self {
        let cells = match kind {
            LineKind::Row(r) => [(r, 0), (r, 1), (r, 2)],
            LineKind::Col(c) => [(0, c), (1, c), (2, c)],
            LineKind::Diag(0) => [(0, 0), (1, 1), (2, 2)],
            LineKind::Diag(_) => [(0, 2), (1, 1), (2, 0)],
        };
        Self { kind, cells }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Win(Player, WinningLine),
    Draw,
}

impl GameOutcome {
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// Rows top to bottom, then columns left to right, then both diagonals
pub const LINES: [WinningLine; 8] = [
    WinningLine::new(LineKind::Row(0)),
    WinningLine::new(LineKind::Row(1)),
    WinningLine::new(LineKind::Row(2)),
    WinningLine::new(LineKind::Col(0)),
    WinningLine::new(LineKind::Col(1)),
    WinningLine::new(LineKind::Col(2)),
    WinningLine::new(LineKind::Diag(0)),
    WinningLine::new(LineKind::Diag(1)),
];

/// First completed line in `LINES` order wins; a full board without one is a draw.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> GameOutcome {
    for line in LINES {
        let [a, b, c] = line.cells;
        if let Cell::Mark(player) = board.at(a.0, a.1) {
            if board.at(b.0, b.1) == Cell::Mark(player) && board.at(c.0, c.1) == Cell::Mark(player) {
                return GameOutcome::Win(player, line);
            }
        }
    }

    if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
