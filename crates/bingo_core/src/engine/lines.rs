//! Bingo line detection and derived progress statistics.
//!
//! # Invariants
//! - A line is complete iff all five cells are achieved and have text.
//! - The bingo count is always within `0..=12`.
//! - Nothing computed here is persisted.

use crate::model::board::BOARD_SIZE;
use crate::model::cell::{Cell, GRID_WIDTH};
use serde::Serialize;

/// One of the 12 lines evaluated for bingo completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum Line {
    Row(u8),
    Column(u8),
    /// Top-left to bottom-right: 0, 6, 12, 18, 24.
    Diagonal,
    /// Top-right to bottom-left: 4, 8, 12, 16, 20.
    AntiDiagonal,
}

/// Rows first, then columns, then both diagonals.
pub const ALL_LINES: [Line; 12] = [
    Line::Row(0),
    Line::Row(1),
    Line::Row(2),
    Line::Row(3),
    Line::Row(4),
    Line::Column(0),
    Line::Column(1),
    Line::Column(2),
    Line::Column(3),
    Line::Column(4),
    Line::Diagonal,
    Line::AntiDiagonal,
];

impl Line {
    /// Grid positions covered by this line.
    pub fn positions(self) -> [u8; 5] {
        let mut positions = [0u8; 5];
        for (step, slot) in (0..GRID_WIDTH).zip(positions.iter_mut()) {
            *slot = match self {
                Self::Row(row) => row * GRID_WIDTH + step,
                Self::Column(column) => step * GRID_WIDTH + column,
                Self::Diagonal => step * (GRID_WIDTH + 1),
                Self::AntiDiagonal => (step + 1) * (GRID_WIDTH - 1),
            };
        }
        positions
    }
}

/// Derived numbers shown next to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub achieved: usize,
    pub bingo_count: usize,
    pub progress_percent: u8,
}

impl BoardStats {
    pub fn from_cells(cells: &[Cell]) -> Self {
        Self {
            achieved: achieved_count(cells),
            bingo_count: compute_bingo_count(cells),
            progress_percent: progress_percent(cells),
        }
    }
}

/// Counts completed rows, columns and diagonals.
///
/// Cells may arrive in any order; they are indexed by `position`. A slot with
/// no cell never completes its lines.
pub fn compute_bingo_count(cells: &[Cell]) -> usize {
    let grid = index_by_position(cells);
    ALL_LINES
        .iter()
        .filter(|line| is_line_complete(&grid, **line))
        .count()
}

/// Lists completed lines in [`ALL_LINES`] order.
pub fn completed_lines(cells: &[Cell]) -> Vec<Line> {
    let grid = index_by_position(cells);
    ALL_LINES
        .into_iter()
        .filter(|line| is_line_complete(&grid, *line))
        .collect()
}

/// Number of achieved cells that still have goal text.
pub fn achieved_count(cells: &[Cell]) -> usize {
    cells.iter().filter(|cell| cell.is_stamped()).count()
}

/// Achieved share of the 25 cells as a whole percent.
pub fn progress_percent(cells: &[Cell]) -> u8 {
    let achieved = achieved_count(cells).min(BOARD_SIZE);
    // 25 divides 100, so this is exact.
    (achieved * 100 / BOARD_SIZE) as u8
}

fn index_by_position(cells: &[Cell]) -> [Option<&Cell>; BOARD_SIZE] {
    let mut grid = [None; BOARD_SIZE];
    for cell in cells {
        if let Some(slot) = grid.get_mut(usize::from(cell.position)) {
            *slot = Some(cell);
        }
    }
    grid
}

fn is_line_complete(grid: &[Option<&Cell>; BOARD_SIZE], line: Line) -> bool {
    line.positions().iter().all(|position| {
        grid.get(usize::from(*position))
            .copied()
            .flatten()
            .is_some_and(Cell::is_stamped)
    })
}
