//! Difficulty-driven auto-layout.
//!
//! Easy goals are moved to the center and hard goals to the edges so the
//! likeliest wins sit on the most lines.

use crate::model::board::BOARD_SIZE;
use crate::model::cell::Cell;
use log::warn;

/// Slots filled in order by ascending difficulty: center, inner ring,
/// middle ring, outer edges, corners last.
pub const INSIDE_OUT_POSITIONS: [u8; BOARD_SIZE] = [
    12, 7, 11, 13, 17, 6, 8, 16, 18, 2, 10, 14, 22, 1, 3, 5, 9, 15, 19, 21, 23, 0, 4, 20, 24,
];

/// Reassigns every cell position by ascending difficulty.
///
/// Equal difficulties keep their relative order from `cells` (stable sort).
/// Only `position` changes; the result is returned in position order.
/// Same input always yields the same output, but the result is generally not
/// a fixed point: tied cells re-enter the next run in position order.
pub fn auto_layout(cells: &[Cell]) -> Vec<Cell> {
    if cells.len() != BOARD_SIZE {
        warn!(
            "event=auto_layout module=engine status=malformed cell_count={}",
            cells.len()
        );
    }

    let mut sorted = cells.to_vec();
    sorted.sort_by_key(|cell| cell.difficulty);
    for (cell, position) in sorted.iter_mut().zip(INSIDE_OUT_POSITIONS) {
        cell.position = position;
    }
    sorted.sort_by_key(|cell| cell.position);
    sorted
}
