//! Board engine: pure transformations over a board's 25 cells.
//!
//! # Responsibility
//! - Derive bingo lines and progress from a cell collection.
//! - Apply user intents (stamp, edit, step toggle) to a copy of the cells.
//! - Rearrange cells by difficulty.
//!
//! # Invariants
//! - Every function takes `&[Cell]` and returns new data; inputs are never mutated.
//! - No I/O and no clock access; callers own timestamps and persistence.
//! - Stale ids from the UI never panic; they leave the cells unchanged.
//! - Malformed collections (wrong count, duplicate positions) are the caller's
//!   responsibility and are not repaired here.

pub mod edit;
pub mod layout;
pub mod lines;

pub use edit::{
    apply_cell_edit, goal_cells, sub_goal_progress, toggle_achievement, toggle_sub_goal,
    CellEdit, SubGoalProgress,
};
pub use layout::{auto_layout, INSIDE_OUT_POSITIONS};
pub use lines::{
    achieved_count, completed_lines, compute_bingo_count, progress_percent, BoardStats, Line,
    ALL_LINES,
};
