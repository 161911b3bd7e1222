//! Core domain logic for Life Bingo.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use engine::{
    apply_cell_edit, auto_layout, compute_bingo_count, toggle_achievement, toggle_sub_goal,
    BoardStats, CellEdit, Line,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{
    Board, BoardId, BoardProfile, BoardValidationError, ThemeId, BOARD_SIZE, DEFAULT_START_YEAR,
};
pub use model::cell::{Cell, CellId, Difficulty, SubGoal, SubGoalId, GRID_WIDTH};
pub use repo::board_repo::{BoardRepository, RepoError, RepoResult, SqliteBoardRepository};
pub use service::board_service::{BoardService, BoardServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
