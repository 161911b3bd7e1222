//! Cell-level mutations driven by user intents.
//!
//! # Invariants
//! - Unknown cell or sub-goal ids are no-ops; the output equals the input.
//! - Blanking a goal always clears its achievement.
//! - Sub-goal completion never touches the parent's `achieved` flag.

use crate::model::cell::{Cell, CellId, Difficulty, SubGoal, SubGoalId};
use log::debug;

/// Partial update produced by the cell editor.
///
/// `None` fields keep the current value. Achievement is deliberately absent:
/// it only changes through [`toggle_achievement`] or blanking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellEdit {
    pub text: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Full replacement of the step list.
    pub sub_goals: Option<Vec<SubGoal>>,
}

impl CellEdit {
    /// Edit that resets a cell to unset state, as the editor's clear button does.
    pub fn clear() -> Self {
        Self {
            text: Some(String::new()),
            difficulty: Some(Difficulty::EASIEST),
            sub_goals: Some(Vec::new()),
        }
    }
}

/// Completed/total steps of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubGoalProgress {
    pub done: usize,
    pub total: usize,
    /// Rounded percent; 0 when the cell has no steps.
    pub percent: u8,
}

/// Flips the achieved stamp of one cell.
///
/// A cell without goal text can be un-stamped but never stamped.
pub fn toggle_achievement(cells: &[Cell], cell_id: CellId) -> Vec<Cell> {
    map_cell(cells, cell_id, |cell| {
        if cell.achieved || !cell.text.is_empty() {
            cell.achieved = !cell.achieved;
        } else {
            debug!("event=toggle_achievement module=engine status=skipped reason=blank_cell");
        }
    })
}

/// Merges an editor update into one cell.
///
/// If the resulting text is empty or whitespace-only the cell is un-achieved;
/// otherwise the prior achieved state is kept as is.
pub fn apply_cell_edit(cells: &[Cell], cell_id: CellId, edit: &CellEdit) -> Vec<Cell> {
    map_cell(cells, cell_id, |cell| {
        if let Some(text) = &edit.text {
            cell.text.clone_from(text);
        }
        if let Some(difficulty) = edit.difficulty {
            cell.difficulty = difficulty;
        }
        if let Some(sub_goals) = &edit.sub_goals {
            cell.sub_goals.clone_from(sub_goals);
        }
        if cell.is_blank() {
            cell.achieved = false;
        }
    })
}

/// Flips `done` on one step of one cell.
pub fn toggle_sub_goal(cells: &[Cell], cell_id: CellId, sub_goal_id: SubGoalId) -> Vec<Cell> {
    map_cell(cells, cell_id, |cell| {
        if let Some(step) = cell.sub_goals.iter_mut().find(|step| step.id == sub_goal_id) {
            step.done = !step.done;
        }
    })
}

pub fn sub_goal_progress(cell: &Cell) -> SubGoalProgress {
    let total = cell.sub_goals.len();
    let done = cell.sub_goals.iter().filter(|step| step.done).count();
    let percent = if total == 0 {
        0
    } else {
        ((done * 200 + total) / (total * 2)) as u8
    };
    SubGoalProgress {
        done,
        total,
        percent,
    }
}

/// Cells that carry a goal, in position order. Feeds the breakdown view.
pub fn goal_cells(cells: &[Cell]) -> Vec<&Cell> {
    let mut goals: Vec<&Cell> = cells.iter().filter(|cell| !cell.is_blank()).collect();
    goals.sort_by_key(|cell| cell.position);
    goals
}

fn map_cell(cells: &[Cell], cell_id: CellId, update: impl FnOnce(&mut Cell)) -> Vec<Cell> {
    let mut updated = cells.to_vec();
    match updated.iter_mut().find(|cell| cell.id == cell_id) {
        Some(cell) => update(cell),
        None => debug!("event=cell_lookup module=engine status=miss"),
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::{sub_goal_progress, CellEdit};
    use crate::model::cell::{Cell, SubGoal};

    #[test]
    fn sub_goal_progress_rounds_half_up() {
        let mut cell = Cell::empty(0);
        cell.sub_goals = vec![SubGoal::new("a"), SubGoal::new("b"), SubGoal::new("c")];
        cell.sub_goals[0].done = true;

        let progress = sub_goal_progress(&cell);
        assert_eq!(progress.done, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent, 33);

        cell.sub_goals[1].done = true;
        assert_eq!(sub_goal_progress(&cell).percent, 67);
    }

    #[test]
    fn sub_goal_progress_is_zero_without_steps() {
        let progress = sub_goal_progress(&Cell::empty(0));
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percent, 0);
    }

    #[test]
    fn clear_edit_resets_every_editable_field() {
        let edit = CellEdit::clear();
        assert_eq!(edit.text.as_deref(), Some(""));
        assert_eq!(edit.difficulty.map(|value| value.get()), Some(1));
        assert_eq!(edit.sub_goals, Some(Vec::new()));
    }
}
