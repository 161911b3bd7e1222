use bingo_core::db::open_db_in_memory;
use bingo_core::{
    auto_layout, Board, BoardRepository, BoardValidationError, Difficulty, RepoError,
    SqliteBoardRepository, SubGoal, ThemeId,
};
use rusqlite::Connection;
use uuid::Uuid;

fn board_with_goals(year: i32) -> Board {
    let mut board = Board::new(year, 1_000);
    board.items[0].text = "run 5k".to_string();
    board.items[0].achieved = true;
    board.items[0].difficulty = Difficulty::new(2).unwrap();
    board.items[0].sub_goals = vec![SubGoal::new("first"), SubGoal::new("second")];
    board.items[0].sub_goals[1].done = true;
    board.items[12].text = "read 20 books".to_string();
    board.items[12].difficulty = Difficulty::new(4).unwrap();
    board
}

#[test]
fn create_and_get_roundtrip_keeps_cells_and_steps() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let board = board_with_goals(2026);
    let id = repo.create_board(&board).unwrap();

    let loaded = repo.get_board(id).unwrap().unwrap();
    assert_eq!(loaded, board);
    assert_eq!(loaded.items[0].sub_goals[0].text, "first");
    assert!(loaded.items[0].sub_goals[1].done);
}

#[test]
fn get_missing_board_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    assert!(repo.get_board(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn create_rejects_invalid_board_before_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let mut board = Board::new(2026, 0);
    board.items.truncate(20);
    let err = repo.create_board(&board).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BoardValidationError::CellCount(20))
    ));
    assert!(repo.list_boards().unwrap().is_empty());
}

#[test]
fn create_same_board_twice_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let board = Board::new(2026, 0);
    repo.create_board(&board).unwrap();
    let err = repo.create_board(&board).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists(id) if id == board.id));
}

#[test]
fn save_replaces_layout_profile_and_steps() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let mut board = board_with_goals(2026);
    repo.create_board(&board).unwrap();

    board.items = auto_layout(&board.items);
    board.items[3].sub_goals.clear();
    board.profile.month = Some(6);
    board.profile.theme = ThemeId::Orange;
    board.updated_at = 2_000;
    repo.save_board(&board).unwrap();

    let loaded = repo.get_board(board.id).unwrap().unwrap();
    assert_eq!(loaded, board);
}

#[test]
fn save_missing_board_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let board = Board::new(2026, 0);
    let err = repo.save_board(&board).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == board.id));
}

#[test]
fn list_orders_by_period_desc_then_creation() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let older_year = Board::new(2026, 1);
    let mut march = Board::new(2027, 2);
    march.profile.month = Some(3);
    let whole_year_first = Board::new(2027, 3);
    let whole_year_second = Board::new(2027, 4);
    for board in [&whole_year_second, &older_year, &march, &whole_year_first] {
        repo.create_board(board).unwrap();
    }

    let ids: Vec<Uuid> = repo
        .list_boards()
        .unwrap()
        .into_iter()
        .map(|board| board.id)
        .collect();
    assert_eq!(
        ids,
        vec![
            march.id,
            whole_year_first.id,
            whole_year_second.id,
            older_year.id
        ]
    );
}

#[test]
fn active_board_selector_roundtrips_and_clears_on_delete() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    assert_eq!(repo.active_board_id().unwrap(), None);

    let board = Board::new(2026, 0);
    repo.create_board(&board).unwrap();
    repo.set_active_board_id(board.id).unwrap();
    assert_eq!(repo.active_board_id().unwrap(), Some(board.id));

    repo.delete_board(board.id).unwrap();
    assert_eq!(repo.active_board_id().unwrap(), None);
    assert!(repo.get_board(board.id).unwrap().is_none());
}

#[test]
fn selecting_missing_board_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.set_active_board_id(missing),
        Err(RepoError::NotFound(id)) if id == missing
    ));
    assert!(matches!(
        repo.delete_board(missing),
        Err(RepoError::NotFound(id)) if id == missing
    ));
}

#[test]
fn delete_removes_cell_and_step_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let board = board_with_goals(2026);
    {
        let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();
        repo.create_board(&board).unwrap();
        repo.delete_board(board.id).unwrap();
    }

    assert_eq!(count_rows(&conn, "board_cells"), 0);
    assert_eq!(count_rows(&conn, "sub_goals"), 0);
}

#[test]
fn read_rejects_corrupted_position_permutation() {
    let mut conn = open_db_in_memory().unwrap();
    let board = Board::new(2026, 0);
    {
        let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();
        repo.create_board(&board).unwrap();
    }
    conn.execute(
        "DELETE FROM board_cells WHERE board_uuid = ?1 AND position = 24;",
        [board.id.to_string()],
    )
    .unwrap();

    let repo = SqliteBoardRepository::try_new(&mut conn).unwrap();
    let err = repo.get_board(board.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("24")));
}

#[test]
fn cell_ids_are_scoped_to_their_board() {
    let mut conn = open_db_in_memory().unwrap();
    let first = board_with_goals(2026);
    let mut second = first.clone();
    second.id = Uuid::new_v4();
    second.profile.year = 2027;
    second.items[0].sub_goals[0].done = true;
    {
        let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();
        repo.create_board(&first).unwrap();
        repo.create_board(&second).unwrap();

        repo.delete_board(first.id).unwrap();
        assert_eq!(repo.get_board(second.id).unwrap(), Some(second));
    }

    assert_eq!(count_rows(&conn, "board_cells"), 25);
    assert_eq!(count_rows(&conn, "sub_goals"), 2);
}

#[test]
fn import_boards_skips_known_ids_and_repeats_within_payload() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let stored = Board::new(2026, 0);
    repo.create_board(&stored).unwrap();
    let fresh = board_with_goals(2027);

    let inserted = repo
        .import_boards(&[stored.clone(), fresh.clone(), fresh.clone()])
        .unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(repo.get_board(fresh.id).unwrap(), Some(fresh));
    assert_eq!(repo.list_boards().unwrap().len(), 2);
}

#[test]
fn import_boards_rejects_invalid_board_before_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBoardRepository::try_new(&mut conn).unwrap();

    let good = Board::new(2026, 0);
    let mut bad = Board::new(2027, 0);
    bad.items[3].id = bad.items[2].id;

    let err = repo.import_boards(&[good, bad]).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BoardValidationError::DuplicateCellId(_))
    ));
    assert!(repo.list_boards().unwrap().is_empty());
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteBoardRepository::try_new(&mut conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
