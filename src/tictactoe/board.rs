//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// The centre cell
pub const CENTER: usize = 4;

/// Corner cells, in ascending order
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Edge cells, in ascending order
pub const EDGES: [usize; 4] = [1, 3, 5, 7];

/// Visitation order used by search and tie-breaking: centre, corners, edges.
pub const SEARCH_ORDER: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A mark one side places on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the other side's mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// The 3x3 grid.
///
/// `Board` is `Copy` (9 bytes), so "apply" operations return a new board and
/// leave the receiver untouched. Speculative evaluation that wants to avoid
/// copies goes through [`Board::probe`], which reverts the cell before
/// returning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Board { cells }
    }

    /// Parse a board from 9 cell characters (`X`, `O`, `.`); whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 characters remain or any character is invalid.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() < 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Ok(Board { cells })
    }

    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// True if `pos` is on the board and empty
    pub fn is_empty_at(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// True if `pos` holds `mark`
    pub fn is_marked(&self, pos: usize, mark: Mark) -> bool {
        self.get(pos) == Some(mark.to_cell())
    }

    /// Empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.cells[i].is_empty()).collect()
    }

    /// Empty positions in search order (centre, corners, edges)
    pub fn ordered_empty_positions(&self) -> Vec<usize> {
        SEARCH_ORDER
            .iter()
            .copied()
            .filter(|&i| self.cells[i].is_empty())
            .collect()
    }

    fn check_playable(&self, index: usize) -> Result<(), crate::Error> {
        match self.get(index) {
            None => Err(crate::Error::InvalidPosition { position: index }),
            Some(Cell::Empty) => Ok(()),
            Some(_) => Err(crate::Error::InvalidMove { position: index }),
        }
    }

    /// Return the board with `mark` placed at `index`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidPosition`] if `index >= 9`,
    /// [`crate::Error::InvalidMove`] if the cell is occupied.
    pub fn apply_move(&self, index: usize, mark: Mark) -> Result<Board, crate::Error> {
        let mut next = *self;
        next.place(index, mark)?;
        Ok(next)
    }

    /// Place `mark` at `index` in place.
    ///
    /// # Errors
    ///
    /// Same as [`Board::apply_move`]; the board is unchanged on error.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), crate::Error> {
        self.check_playable(index)?;
        self.cells[index] = mark.to_cell();
        Ok(())
    }

    /// Temporarily place `mark` at `index`, evaluate `f`, then revert.
    ///
    /// Returns `None` without calling `f` if the cell is not playable.
    pub fn probe<R>(&mut self, index: usize, mark: Mark, f: impl FnOnce(&Board) -> R) -> Option<R> {
        if !self.is_empty_at(index) {
            return None;
        }
        self.cells[index] = mark.to_cell();
        let result = f(self);
        self.cells[index] = Cell::Empty;
        Some(result)
    }

    /// Unchecked set used by the search, which only visits empty cells.
    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// True iff some winning line is entirely `mark`
    pub fn check_win(&self, mark: Mark) -> bool {
        LineAnalyzer::has_won(&self.cells, mark)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// True iff the board is full and nobody has won
    pub fn is_draw(&self) -> bool {
        self.is_full() && self.winner().is_none()
    }

    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    pub fn winner(&self) -> Option<Mark> {
        if self.check_win(Mark::X) {
            Some(Mark::X)
        } else if self.check_win(Mark::O) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Number of lines with two `mark` cells and one empty cell
    pub fn count_immediate_threats(&self, mark: Mark) -> usize {
        LineAnalyzer::count_threats(&self.cells, mark)
    }

    /// Number of cells holding `mark`
    pub fn count(&self, mark: Mark) -> usize {
        let target = mark.to_cell();
        self.cells.iter().filter(|&&c| c == target).count()
    }

    pub fn occupied_count(&self) -> usize {
        9 - self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Check the turn-parity invariant for a game that `first` opened.
    pub fn parity_holds(&self, first: Mark) -> bool {
        let lead = self.count(first) as isize - self.count(first.opponent()) as isize;
        lead == 0 || lead == 1
    }

    /// Whose turn it is in a game that `first` opened
    pub fn to_move(&self, first: Mark) -> Mark {
        if self.count(first) > self.count(first.opponent()) {
            first.opponent()
        } else {
            first
        }
    }

    /// Compact 9-character encoding, e.g. `XO..X....`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|c| c.to_char()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let line: String = (0..3)
                .map(|col| {
                    let idx = row * 3 + col;
                    match self.cells[idx] {
                        Cell::Empty => char::from_digit(idx as u32, 10).unwrap_or('.'),
                        other => other.to_char(),
                    }
                })
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, " {line}")?;
            if row < 2 {
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.empty_positions().len(), 9);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_apply_move_leaves_original_untouched() {
        let board = Board::new();
        let next = board.apply_move(4, Mark::X).unwrap();
        assert_eq!(next.get(4), Some(Cell::X));
        assert_eq!(board.get(4), Some(Cell::Empty));
    }

    #[test]
    fn test_apply_move_rejects_occupied_and_out_of_range() {
        let board = Board::new().apply_move(0, Mark::X).unwrap();
        assert!(matches!(
            board.apply_move(0, Mark::O),
            Err(crate::Error::InvalidMove { position: 0 })
        ));
        assert!(matches!(
            board.apply_move(9, Mark::O),
            Err(crate::Error::InvalidPosition { position: 9 })
        ));
    }

    #[test]
    fn test_probe_reverts_every_cell() {
        let boards = [
            Board::new(),
            Board::from_string("XO.X.O...").unwrap(),
            Board::from_string("XOXOX.O..").unwrap(),
        ];
        for original in boards {
            for index in 0..10 {
                for mark in [Mark::X, Mark::O] {
                    let mut board = original;
                    board.probe(index, mark, |b| b.check_win(mark));
                    assert_eq!(board, original, "probe at {index} changed the board");
                }
            }
        }
    }

    #[test]
    fn test_probe_skips_occupied_cell() {
        let mut board = Board::from_string("X........").unwrap();
        assert!(board.probe(0, Mark::O, |_| ()).is_none());
        assert!(board.probe(1, Mark::O, |_| ()).is_some());
    }

    #[test]
    fn test_draw_detection() {
        let board = Board::from_string("XOXXOOOXX").unwrap();
        assert!(board.is_full());
        assert!(board.is_draw());
        assert_eq!(board.winner(), None);

        let won = Board::from_string("XXXOO.O..").unwrap();
        assert!(!won.is_draw());
    }

    #[test]
    fn test_count_immediate_threats() {
        // X X .
        // X . .
        // . . .
        let board = Board::from_string("XX.X.....").unwrap();
        assert_eq!(board.count_immediate_threats(Mark::X), 2);
        assert_eq!(board.count_immediate_threats(Mark::O), 0);

        // 0 and 4 share the main diagonal: one threat
        let board = Board::from_string("X...X....").unwrap();
        assert_eq!(board.count_immediate_threats(Mark::X), 1);
    }

    #[test]
    fn test_parity_and_turn() {
        let board = Board::from_string("X...O...X").unwrap();
        assert!(board.parity_holds(Mark::X));
        assert!(!board.parity_holds(Mark::O));
        assert_eq!(board.to_move(Mark::X), Mark::O);
    }

    #[test]
    fn test_ordered_empty_positions() {
        let board = Board::from_string("X...O....").unwrap();
        assert_eq!(board.ordered_empty_positions(), vec![2, 6, 8, 1, 3, 5, 7]);
    }

    #[test]
    fn test_from_string_errors() {
        assert!(matches!(
            Board::from_string("XO"),
            Err(crate::Error::InvalidBoardLength { got: 2, .. })
        ));
        assert!(matches!(
            Board::from_string("XO?......"),
            Err(crate::Error::InvalidCellCharacter { position: 2, .. })
        ));
    }

    #[test]
    fn test_encode() {
        let board = Board::from_string("X . O\n. X .\n. . O").unwrap();
        assert_eq!(board.encode(), "X.O.X...O");
    }
}
