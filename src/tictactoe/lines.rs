//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Mark};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a mark has three in a row
    pub fn has_won(cells: &[Cell; 9], mark: Mark) -> bool {
        let target = mark.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// Count lines holding exactly two `mark` cells and one empty cell
    pub fn count_threats(cells: &[Cell; 9], mark: Mark) -> usize {
        WINNING_LINES
            .iter()
            .filter(|line| Self::open_cell_in_line(cells, mark, line).is_some())
            .count()
    }

    /// All empty cells that would complete a line for `mark`, ascending, deduplicated
    pub fn winning_cells(cells: &[Cell; 9], mark: Mark) -> Vec<usize> {
        let mut found: Vec<usize> = WINNING_LINES
            .iter()
            .filter_map(|line| Self::open_cell_in_line(cells, mark, line))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// The empty cell of a line that has two `mark` cells and one empty cell
    fn open_cell_in_line(cells: &[Cell; 9], mark: Mark, line: &[usize; 3]) -> Option<usize> {
        let target = mark.to_cell();
        let mut count = 0;
        let mut empty_pos = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                c if c == target => count += 1,
                _ => return None,
            }
        }

        if count == 2 { empty_pos } else { None }
    }
}
