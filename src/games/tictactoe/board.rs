use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Mark(Player),
}

/// Returned when a mark targets a cell that already holds one
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({row}, {col}) is already occupied")]
pub struct CellOccupied {
    pub row: usize,
    pub col: usize,
}

/// 3x3 grid indexed by (row, col). Indices outside 0..3 are a caller bug and panic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, row: usize, col: usize) -> Cell {
        assert!(row < GRID_SIZE && col < GRID_SIZE, "cell ({row}, {col}) is off the board");
        self.cells[row][col]
    }

    /// Mark an empty cell. An occupied cell is left untouched.
    pub fn place(&mut self, row: usize, col: usize, player: Player) -> Result<(), CellOccupied> {
        assert!(row < GRID_SIZE && col < GRID_SIZE, "cell ({row}, {col}) is off the board");
        match self.cells[row][col] {
            Cell::Empty => {
                self.cells[row][col] = Cell::Mark(player);
                Ok(())
            }
            Cell::Mark(_) => Err(CellOccupied { row, col }),
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|c| *c != Cell::Empty)
    }

    pub fn reset(&mut self) {
        self.cells = Default::default();
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == Cell::Mark(player))
            .count()
    }

    pub fn marked(&self) -> usize {
        self.count(Player::X) + self.count(Player::O)
    }

    /// Every cell with its coordinates, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, *cell)))
    }

    /// Build a board from three rows of `X`, `O` and `.`; handy for fixtures
    pub fn from_rows(rows: [&str; GRID_SIZE]) -> Self {
        let mut board = Self::new();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().take(GRID_SIZE).enumerate() {
                board.cells[r][c] = match ch {
                    'X' | 'x' => Cell::Mark(Player::X),
                    'O' | 'o' => Cell::Mark(Player::O),
                    _ => Cell::Empty,
                };
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        assert!(board.cells().all(|(_, _, c)| c == Cell::Empty));
        assert!(!board.is_full());
        assert_eq!(board.marked(), 0);
    }

    #[test]
    fn place_marks_empty_cell() {
        let mut board = Board::new();
        assert!(board.place(1, 2, Player::O).is_ok());
        assert_eq!(board.at(1, 2), Cell::Mark(Player::O));
        assert_eq!(board.marked(), 1);
    }

    #[test]
    fn place_on_occupied_cell_fails_without_mutation() {
        let mut board = Board::new();
        board.place(0, 0, Player::X).unwrap();
        let before = board.clone();

        let err = board.place(0, 0, Player::O).unwrap_err();
        assert_eq!(err, CellOccupied { row: 0, col: 0 });
        assert_eq!(err.to_string(), "cell (0, 0) is already occupied");
        assert_eq!(board, before);

        // same player is rejected too
        assert!(board.place(0, 0, Player::X).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn full_board_and_reset() {
        let mut board = Board::from_rows(["XOX", "OXO", "OXO"]);
        assert!(board.is_full());
        assert_eq!(board.count(Player::X), 4);
        assert_eq!(board.count(Player::O), 5);

        board.reset();
        assert!(board.cells().all(|(_, _, c)| c == Cell::Empty));
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        Board::new().at(3, 0);
    }

    #[test]
    #[should_panic]
    fn out_of_range_place_panics() {
        let _ = Board::new().place(0, 3, Player::X);
    }
}
