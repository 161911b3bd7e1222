use bingo_core::engine::{completed_lines, goal_cells, progress_percent, INSIDE_OUT_POSITIONS};
use bingo_core::{
    apply_cell_edit, auto_layout, compute_bingo_count, toggle_achievement, toggle_sub_goal, Board,
    BoardStats, Cell, CellEdit, Difficulty, Line, SubGoal,
};
use std::collections::BTreeSet;
use uuid::Uuid;

fn stamp(cells: &mut [Cell], positions: &[u8]) {
    for cell in cells.iter_mut() {
        if positions.contains(&cell.position) {
            cell.text = format!("goal {}", cell.position);
            cell.achieved = true;
        }
    }
}

fn fresh_cells() -> Vec<Cell> {
    Board::new(2026, 0).items
}

#[test]
fn fresh_board_has_no_bingo() {
    let cells = fresh_cells();
    assert_eq!(compute_bingo_count(&cells), 0);
    assert_eq!(BoardStats::from_cells(&cells).progress_percent, 0);
}

#[test]
fn first_row_counts_one_line() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[0, 1, 2, 3, 4]);

    assert_eq!(compute_bingo_count(&cells), 1);
    assert_eq!(completed_lines(&cells), vec![Line::Row(0)]);
}

#[test]
fn first_column_adds_exactly_one_line() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[0, 1, 2, 3, 4]);
    let before = compute_bingo_count(&cells);

    stamp(&mut cells, &[5, 10, 15, 20]);
    assert_eq!(compute_bingo_count(&cells), before + 1);
}

#[test]
fn both_diagonals_count_twice_despite_shared_center() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[0, 6, 12, 18, 24, 4, 8, 16, 20]);

    assert_eq!(compute_bingo_count(&cells), 2);
    assert_eq!(
        completed_lines(&cells),
        vec![Line::Diagonal, Line::AntiDiagonal]
    );
}

#[test]
fn full_board_counts_all_twelve_lines() {
    let mut cells = fresh_cells();
    let all: Vec<u8> = (0..25).collect();
    stamp(&mut cells, &all);

    assert_eq!(compute_bingo_count(&cells), 12);
    assert_eq!(progress_percent(&cells), 100);
}

#[test]
fn achieved_cell_without_text_breaks_the_line() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[0, 1, 2, 3, 4]);
    cells[2].text.clear();

    assert_eq!(compute_bingo_count(&cells), 0);
}

#[test]
fn bingo_count_ignores_collection_order() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[2, 7, 12, 17, 22]);
    cells.reverse();

    assert_eq!(completed_lines(&cells), vec![Line::Column(2)]);
}

#[test]
fn toggle_achievement_flips_only_the_target_cell() {
    let mut cells = fresh_cells();
    cells[7].text = "read 12 books".to_string();
    let target = cells[7].id;

    let toggled = toggle_achievement(&cells, target);
    assert!(toggled[7].achieved);
    assert_eq!(
        toggled.iter().filter(|cell| cell.achieved).count(),
        1,
        "only the target cell may change"
    );

    let back = toggle_achievement(&toggled, target);
    assert_eq!(back, cells);
}

#[test]
fn toggle_achievement_with_unknown_id_is_noop() {
    let cells = fresh_cells();
    assert_eq!(toggle_achievement(&cells, Uuid::new_v4()), cells);
}

#[test]
fn toggle_achievement_never_stamps_blank_cell() {
    let cells = fresh_cells();
    let toggled = toggle_achievement(&cells, cells[0].id);
    assert!(!toggled[0].achieved);
}

#[test]
fn blanking_text_clears_achievement() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[3]);
    let edit = CellEdit {
        text: Some(String::new()),
        ..CellEdit::default()
    };

    let edited = apply_cell_edit(&cells, cells[3].id, &edit);
    assert!(edited[3].text.is_empty());
    assert!(!edited[3].achieved);
}

#[test]
fn whitespace_only_text_clears_achievement() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[3]);
    let edit = CellEdit {
        text: Some("   ".to_string()),
        ..CellEdit::default()
    };

    let edited = apply_cell_edit(&cells, cells[3].id, &edit);
    assert!(!edited[3].achieved);
}

#[test]
fn non_blank_edit_preserves_achievement() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[3]);
    cells[4].text = "learn rust".to_string();

    let edit = CellEdit {
        text: Some("run a marathon".to_string()),
        difficulty: Some(Difficulty::new(5).unwrap()),
        sub_goals: Some(vec![SubGoal::new("buy shoes")]),
    };
    let achieved = apply_cell_edit(&cells, cells[3].id, &edit);
    assert!(achieved[3].achieved);
    assert_eq!(achieved[3].text, "run a marathon");
    assert_eq!(achieved[3].difficulty.get(), 5);
    assert_eq!(achieved[3].sub_goals.len(), 1);

    let unachieved = apply_cell_edit(&cells, cells[4].id, &edit);
    assert!(!unachieved[4].achieved);
}

#[test]
fn edit_without_text_keeps_existing_text_and_stamp() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[9]);
    let edit = CellEdit {
        difficulty: Some(Difficulty::new(2).unwrap()),
        ..CellEdit::default()
    };

    let edited = apply_cell_edit(&cells, cells[9].id, &edit);
    assert_eq!(edited[9].text, "goal 9");
    assert!(edited[9].achieved);
}

#[test]
fn clear_edit_resets_cell() {
    let mut cells = fresh_cells();
    stamp(&mut cells, &[0]);
    cells[0].sub_goals.push(SubGoal::new("step"));

    let cleared = apply_cell_edit(&cells, cells[0].id, &CellEdit::clear());
    assert!(cleared[0].text.is_empty());
    assert!(!cleared[0].achieved);
    assert!(cleared[0].sub_goals.is_empty());
    assert_eq!(cleared[0].id, cells[0].id);
    assert_eq!(cleared[0].position, 0);
}

#[test]
fn toggle_sub_goal_flips_step_without_touching_achievement() {
    let mut cells = fresh_cells();
    cells[5].text = "save money".to_string();
    cells[5].sub_goals = vec![SubGoal::new("open account"), SubGoal::new("automate")];
    let step = cells[5].sub_goals[1].id;

    let toggled = toggle_sub_goal(&cells, cells[5].id, step);
    assert!(toggled[5].sub_goals[1].done);
    assert!(!toggled[5].sub_goals[0].done);
    assert!(!toggled[5].achieved);
}

#[test]
fn toggle_sub_goal_with_unknown_ids_is_noop() {
    let mut cells = fresh_cells();
    cells[5].sub_goals = vec![SubGoal::new("step")];
    let known_step = cells[5].sub_goals[0].id;

    assert_eq!(toggle_sub_goal(&cells, cells[5].id, Uuid::new_v4()), cells);
    assert_eq!(toggle_sub_goal(&cells, Uuid::new_v4(), known_step), cells);
}

fn cells_with_difficulties(pattern: &[u8]) -> Vec<Cell> {
    let mut cells = fresh_cells();
    for (cell, difficulty) in cells.iter_mut().zip(pattern.iter().cycle()) {
        cell.text = format!("goal {}", cell.position);
        cell.difficulty = Difficulty::new(*difficulty).unwrap();
    }
    cells
}

#[test]
fn auto_layout_puts_first_easiest_cell_in_center() {
    let cells = cells_with_difficulties(&[5, 4, 3, 2, 1]);
    let first_easiest = cells[4].id;

    let laid_out = auto_layout(&cells);
    let center = laid_out.iter().find(|cell| cell.position == 12).unwrap();
    assert_eq!(center.id, first_easiest);
}

#[test]
fn auto_layout_follows_inside_out_sequence_by_stable_difficulty_order() {
    let cells = cells_with_difficulties(&[5, 4, 3, 2, 1]);
    let mut expected = cells.clone();
    expected.sort_by_key(|cell| cell.difficulty);

    let laid_out = auto_layout(&cells);
    for (cell, position) in expected.iter().zip(INSIDE_OUT_POSITIONS) {
        let placed = laid_out.iter().find(|other| other.id == cell.id).unwrap();
        assert_eq!(placed.position, position);
    }
}

#[test]
fn auto_layout_preserves_position_permutation_and_content() {
    let mut cells = cells_with_difficulties(&[3, 1, 4, 1, 5, 2]);
    stamp(&mut cells, &[1, 3]);
    cells[10].sub_goals.push(SubGoal::new("step"));

    let laid_out = auto_layout(&cells);
    let positions: BTreeSet<u8> = laid_out.iter().map(|cell| cell.position).collect();
    assert_eq!(positions, (0..25).collect::<BTreeSet<u8>>());
    assert!(laid_out
        .windows(2)
        .all(|pair| pair[0].position < pair[1].position));

    for original in &cells {
        let moved = laid_out.iter().find(|cell| cell.id == original.id).unwrap();
        assert_eq!(moved.text, original.text);
        assert_eq!(moved.difficulty, original.difficulty);
        assert_eq!(moved.achieved, original.achieved);
        assert_eq!(moved.sub_goals, original.sub_goals);
    }
}

#[test]
fn auto_layout_places_hardest_goals_in_corners() {
    let mut pattern = vec![1u8; 21];
    pattern.extend([5, 5, 5, 5]);
    let cells = cells_with_difficulties(&pattern);

    let laid_out = auto_layout(&cells);
    for corner in [0u8, 4, 20, 24] {
        let cell = laid_out.iter().find(|cell| cell.position == corner).unwrap();
        assert_eq!(cell.difficulty.get(), 5);
    }
}

#[test]
fn auto_layout_is_deterministic_for_equal_input() {
    let cells = cells_with_difficulties(&[2, 2, 1, 3]);
    assert_eq!(auto_layout(&cells), auto_layout(&cells));
}

#[test]
fn goal_cells_skips_blank_cells_and_orders_by_position() {
    let mut cells = fresh_cells();
    cells[20].text = "late".to_string();
    cells[1].text = "early".to_string();
    cells[2].text = "  ".to_string();
    cells.reverse();

    let goals: Vec<u8> = goal_cells(&cells).iter().map(|cell| cell.position).collect();
    assert_eq!(goals, vec![1, 20]);
}
