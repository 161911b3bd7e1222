//! Board use-case service.
//!
//! # Responsibility
//! - Load a board, run one engine operation, stamp `updated_at`, persist.
//! - Own board collection flows: create next period, select, delete.
//! - Import/export the whole collection in its persisted JSON shape.
//!
//! # Invariants
//! - Every mutation goes through `BoardRepository::save_board`.
//! - Stale cell/sub-goal ids are engine no-ops, never service errors.
//! - Goal text never appears in log events.

use crate::engine::{self, BoardStats, CellEdit};
use crate::model::board::{
    Board, BoardId, BoardProfile, BoardValidationError, DEFAULT_START_YEAR,
};
use crate::model::cell::{Cell, CellId, SubGoalId};
use crate::repo::board_repo::{BoardRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Service error for board use-cases.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Target board does not exist.
    BoardNotFound(BoardId),
    /// Profile update rejected before persistence.
    InvalidProfile(BoardValidationError),
    /// Imported board violates board invariants.
    InvalidBoard {
        board_id: BoardId,
        error: BoardValidationError,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Import/export payload could not be (de)serialized.
    Json(serde_json::Error),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::InvalidProfile(err) => write!(f, "invalid board profile: {err}"),
            Self::InvalidBoard { board_id, error } => {
                write!(f, "invalid board {board_id}: {error}")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid board json: {err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProfile(err) => Some(err),
            Self::InvalidBoard { error, .. } => Some(error),
            Self::Repo(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::BoardNotFound(_) => None,
        }
    }
}

impl From<RepoError> for BoardServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::BoardNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<serde_json::Error> for BoardServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

pub type ServiceResult<T> = Result<T, BoardServiceError>;

/// Board service facade over a board store.
pub struct BoardService<R: BoardRepository> {
    repo: R,
}

impl<R: BoardRepository> BoardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an empty board for the year after the latest one and selects it.
    ///
    /// The first board of an empty store is for `DEFAULT_START_YEAR`.
    pub fn create_board(&mut self) -> ServiceResult<Board> {
        let year = self
            .repo
            .list_boards()?
            .iter()
            .map(|board| board.profile.year)
            .max()
            .map_or(DEFAULT_START_YEAR, |latest| latest + 1);

        let board = Board::new(year, now_epoch_ms());
        self.repo.create_board(&board)?;
        self.repo.set_active_board_id(board.id)?;
        info!(
            "event=board_create module=service status=ok board_id={} year={year}",
            board.id
        );
        Ok(board)
    }

    /// Returns the selected board.
    ///
    /// Falls back to the first listed board when nothing valid is selected,
    /// and creates a first board when the store is empty.
    pub fn active_board(&mut self) -> ServiceResult<Board> {
        if let Some(id) = self.repo.active_board_id()? {
            if let Some(board) = self.repo.get_board(id)? {
                return Ok(board);
            }
            warn!("event=active_board module=service status=stale board_id={id}");
        }

        match self.repo.list_boards()?.into_iter().next() {
            Some(board) => {
                self.repo.set_active_board_id(board.id)?;
                Ok(board)
            }
            None => self.create_board(),
        }
    }

    pub fn select_board(&mut self, id: BoardId) -> ServiceResult<Board> {
        let board = self.get_board(id)?;
        self.repo.set_active_board_id(id)?;
        Ok(board)
    }

    /// Lists boards newest period first.
    pub fn list_boards(&self) -> ServiceResult<Vec<Board>> {
        Ok(self.repo.list_boards()?)
    }

    pub fn get_board(&self, id: BoardId) -> ServiceResult<Board> {
        self.repo
            .get_board(id)?
            .ok_or(BoardServiceError::BoardNotFound(id))
    }

    pub fn toggle_achievement(&mut self, board_id: BoardId, cell_id: CellId) -> ServiceResult<Board> {
        self.mutate_cells(board_id, "toggle_achievement", |cells| {
            engine::toggle_achievement(cells, cell_id)
        })
    }

    pub fn edit_cell(
        &mut self,
        board_id: BoardId,
        cell_id: CellId,
        edit: &CellEdit,
    ) -> ServiceResult<Board> {
        self.mutate_cells(board_id, "edit_cell", |cells| {
            engine::apply_cell_edit(cells, cell_id, edit)
        })
    }

    pub fn toggle_sub_goal(
        &mut self,
        board_id: BoardId,
        cell_id: CellId,
        sub_goal_id: SubGoalId,
    ) -> ServiceResult<Board> {
        self.mutate_cells(board_id, "toggle_sub_goal", |cells| {
            engine::toggle_sub_goal(cells, cell_id, sub_goal_id)
        })
    }

    pub fn auto_layout(&mut self, board_id: BoardId) -> ServiceResult<Board> {
        self.mutate_cells(board_id, "auto_layout", engine::auto_layout)
    }

    /// Replaces period and theme of a board.
    pub fn update_profile(
        &mut self,
        board_id: BoardId,
        profile: BoardProfile,
    ) -> ServiceResult<Board> {
        profile
            .validate()
            .map_err(BoardServiceError::InvalidProfile)?;

        let mut board = self.get_board(board_id)?;
        board.profile = profile;
        board.touch(next_timestamp(&board));
        self.repo.save_board(&board)?;
        info!("event=board_profile module=service status=ok board_id={board_id}");
        Ok(board)
    }

    pub fn stats(&self, board_id: BoardId) -> ServiceResult<BoardStats> {
        let board = self.get_board(board_id)?;
        Ok(BoardStats::from_cells(&board.items))
    }

    pub fn delete_board(&mut self, board_id: BoardId) -> ServiceResult<()> {
        self.repo.delete_board(board_id)?;
        info!("event=board_delete module=service status=ok board_id={board_id}");
        Ok(())
    }

    /// Serializes every board as a JSON array in the persisted shape.
    pub fn export_json(&self) -> ServiceResult<String> {
        let boards = self.repo.list_boards()?;
        Ok(serde_json::to_string_pretty(&boards)?)
    }

    /// Inserts boards from a JSON array, skipping ids already in the store.
    ///
    /// Every board is validated before anything is written, and the inserts
    /// share one transaction. Returns the number of inserted boards.
    pub fn import_json(&mut self, payload: &str) -> ServiceResult<usize> {
        let boards: Vec<Board> = serde_json::from_str(payload)?;
        for board in &boards {
            board
                .validate()
                .map_err(|error| BoardServiceError::InvalidBoard {
                    board_id: board.id,
                    error,
                })?;
        }

        let inserted = self.repo.import_boards(&boards)?;
        info!(
            "event=board_import module=service status=ok received={} inserted={inserted}",
            boards.len()
        );
        Ok(inserted)
    }

    fn mutate_cells(
        &mut self,
        board_id: BoardId,
        operation: &'static str,
        apply: impl FnOnce(&[Cell]) -> Vec<Cell>,
    ) -> ServiceResult<Board> {
        let mut board = self.get_board(board_id)?;
        let before = engine::compute_bingo_count(&board.items);

        let items = apply(&board.items);
        let now = next_timestamp(&board);
        board.replace_items(items, now);
        self.repo.save_board(&board)?;

        info!(
            "event=board_mutation module=service op={operation} status=ok board_id={board_id} bingo_before={before} bingo_after={}",
            engine::compute_bingo_count(&board.items)
        );
        Ok(board)
    }
}

fn next_timestamp(board: &Board) -> i64 {
    now_epoch_ms().max(board.updated_at)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
