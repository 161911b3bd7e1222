//! Board domain model.
//!
//! # Responsibility
//! - Define the 25-cell goal grid tied to a period and a theme.
//! - Provide structural validation used by persistence read/write paths.
//!
//! # Invariants
//! - `items` always holds exactly 25 cells.
//! - Cell positions form a permutation of `0..25`.
//! - `updated_at` is refreshed on every mutation.

use crate::model::cell::{Cell, CellId, SubGoalId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a board.
pub type BoardId = Uuid;

/// Number of cells on every board.
pub const BOARD_SIZE: usize = 25;

/// Year used for the very first board of a fresh store.
pub const DEFAULT_START_YEAR: i32 = 2026;

/// Fixed palette a board can be themed with.
///
/// Colors themselves are a presentation concern and live outside core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeId {
    #[default]
    Pink,
    Blue,
    Green,
    Purple,
    Orange,
}

impl ThemeId {
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Pink,
        ThemeId::Blue,
        ThemeId::Green,
        ThemeId::Purple,
        ThemeId::Orange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pink => "pink",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == value.trim().to_ascii_lowercase())
    }
}

/// Period and theme settings of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardProfile {
    pub year: i32,
    /// Optional month in `1..=12`; `None` means the whole year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(default)]
    pub theme: ThemeId,
}

impl BoardProfile {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            month: None,
            theme: ThemeId::default(),
        }
    }

    /// Sort key where newer periods compare greater, e.g. 2026/03 -> 202603.
    pub fn period_key(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month.unwrap_or(0))
    }

    pub fn validate(&self) -> Result<(), BoardValidationError> {
        match self.month {
            Some(month) if !(1..=12).contains(&month) => {
                Err(BoardValidationError::MonthOutOfRange(month))
            }
            _ => Ok(()),
        }
    }
}

/// Structural violations detected by [`Board::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    NilId,
    CellCount(usize),
    PositionOutOfRange(u8),
    DuplicatePosition(u8),
    DuplicateCellId(CellId),
    DuplicateSubGoalId {
        cell_id: CellId,
        sub_goal_id: SubGoalId,
    },
    DifficultyOutOfRange(u8),
    MonthOutOfRange(u8),
    AchievedWithoutText(CellId),
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "board id must not be nil"),
            Self::CellCount(count) => {
                write!(f, "board must have exactly {BOARD_SIZE} cells, got {count}")
            }
            Self::PositionOutOfRange(position) => {
                write!(f, "cell position {position} is outside 0..{BOARD_SIZE}")
            }
            Self::DuplicatePosition(position) => {
                write!(f, "cell position {position} is occupied more than once")
            }
            Self::DuplicateCellId(id) => write!(f, "cell id {id} appears more than once"),
            Self::DuplicateSubGoalId {
                cell_id,
                sub_goal_id,
            } => write!(
                f,
                "sub-goal id {sub_goal_id} appears more than once in cell {cell_id}"
            ),
            Self::DifficultyOutOfRange(value) => {
                write!(f, "difficulty {value} is outside 1..=5")
            }
            Self::MonthOutOfRange(value) => write!(f, "month {value} is outside 1..=12"),
            Self::AchievedWithoutText(id) => {
                write!(f, "cell {id} is achieved but has no goal text")
            }
        }
    }
}

impl Error for BoardValidationError {}

/// One full 25-cell goal grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub profile: BoardProfile,
    /// Cells in canonical position order.
    pub items: Vec<Cell>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Board {
    /// Creates a board of 25 empty cells for `year` with a generated id.
    pub fn new(year: i32, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4(), year, now_ms)
    }

    /// Creates an empty board with a caller-provided id.
    pub fn with_id(id: BoardId, year: i32, now_ms: i64) -> Self {
        let items = (0..BOARD_SIZE as u8).map(Cell::empty).collect();
        Self {
            id,
            profile: BoardProfile::for_year(year),
            items,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.items.iter().find(|cell| cell.id == id)
    }

    /// Returns the cell occupying a grid slot.
    pub fn cell_at(&self, position: u8) -> Option<&Cell> {
        self.items.iter().find(|cell| cell.position == position)
    }

    /// Swaps in a new cell collection and stamps the mutation time.
    pub fn replace_items(&mut self, items: Vec<Cell>, now_ms: i64) {
        self.items = items;
        self.touch(now_ms);
    }

    pub fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms;
    }

    /// Checks board-level invariants.
    ///
    /// # Errors
    /// - Wrong cell count, out-of-range or duplicate positions.
    /// - A cell id repeated within the board, or a sub-goal id repeated
    ///   within its cell.
    /// - Month outside `1..=12`.
    /// - An achieved cell with empty text.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        if self.id.is_nil() {
            return Err(BoardValidationError::NilId);
        }
        self.profile.validate()?;
        if self.items.len() != BOARD_SIZE {
            return Err(BoardValidationError::CellCount(self.items.len()));
        }

        let mut seen = [false; BOARD_SIZE];
        let mut cell_ids = HashSet::with_capacity(BOARD_SIZE);
        for cell in &self.items {
            let slot = seen
                .get_mut(usize::from(cell.position))
                .ok_or(BoardValidationError::PositionOutOfRange(cell.position))?;
            if *slot {
                return Err(BoardValidationError::DuplicatePosition(cell.position));
            }
            *slot = true;

            if !cell_ids.insert(cell.id) {
                return Err(BoardValidationError::DuplicateCellId(cell.id));
            }
            let mut step_ids = HashSet::with_capacity(cell.sub_goals.len());
            if let Some(step) = cell.sub_goals.iter().find(|step| !step_ids.insert(step.id)) {
                return Err(BoardValidationError::DuplicateSubGoalId {
                    cell_id: cell.id,
                    sub_goal_id: step.id,
                });
            }

            if cell.achieved && cell.text.is_empty() {
                return Err(BoardValidationError::AchievedWithoutText(cell.id));
            }
        }

        Ok(())
    }
}
