//! Cell and sub-goal domain model.
//!
//! # Responsibility
//! - Define one goal slot of the 5x5 grid and its optional breakdown steps.
//! - Keep the grid slot self-describing through an explicit `position`.
//!
//! # Invariants
//! - `position` is the grid slot in `0..25`; row = position / 5, column = position % 5.
//! - `achieved == true` implies non-empty `text`.
//! - `difficulty` always holds a value in `1..=5`, even for blank cells.

use crate::model::board::BoardValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a cell for its whole lifetime.
pub type CellId = Uuid;

/// Stable identifier of a sub-goal step.
pub type SubGoalId = Uuid;

/// Number of cells per grid row/column.
pub const GRID_WIDTH: u8 = 5;

/// Goal difficulty in `1..=5`, lower is easier.
///
/// Serialized as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Difficulty assigned to fresh cells.
    pub const EASIEST: Self = Self(Self::MIN);

    /// Builds a difficulty, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, BoardValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BoardValidationError::DifficultyOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASIEST
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = BoardValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

/// One concrete step toward a cell goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGoal {
    pub id: SubGoalId,
    pub text: String,
    #[serde(rename = "isDone")]
    pub done: bool,
}

impl SubGoal {
    /// Creates an unfinished step with a generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            done: false,
        }
    }
}

/// One of the 25 goal slots on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    /// Free-form goal text. Empty means unset.
    pub text: String,
    pub difficulty: Difficulty,
    #[serde(rename = "isAchieved")]
    pub achieved: bool,
    /// Grid slot in `0..25`.
    pub position: u8,
    /// Older payloads may omit this field entirely.
    #[serde(rename = "subGoals", default)]
    pub sub_goals: Vec<SubGoal>,
}

impl Cell {
    /// Creates an unset cell at the given grid slot.
    pub fn empty(position: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: String::new(),
            difficulty: Difficulty::EASIEST,
            achieved: false,
            position,
            sub_goals: Vec::new(),
        }
    }

    pub fn row(&self) -> u8 {
        self.position / GRID_WIDTH
    }

    pub fn column(&self) -> u8 {
        self.position % GRID_WIDTH
    }

    /// Returns whether the goal text is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns whether this cell counts toward a completed line.
    ///
    /// Text presence is checked again so a stray achieved flag on an empty
    /// cell never counts.
    pub fn is_stamped(&self) -> bool {
        self.achieved && !self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Difficulty};

    #[test]
    fn difficulty_rejects_out_of_range_values() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(6).is_err());
        assert_eq!(Difficulty::new(3).unwrap().get(), 3);
    }

    #[test]
    fn row_and_column_follow_position() {
        let cell = Cell::empty(13);
        assert_eq!(cell.row(), 2);
        assert_eq!(cell.column(), 3);
    }

    #[test]
    fn achieved_flag_without_text_is_not_stamped() {
        let mut cell = Cell::empty(0);
        cell.achieved = true;
        assert!(!cell.is_stamped());

        cell.text = "run 5k".to_string();
        assert!(cell.is_stamped());
    }
}
