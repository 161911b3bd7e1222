//! Board repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist boards with their cells, sub-goals and the active-board selector.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Board::validate()` before any SQL mutation.
//! - A board and all of its cells are written in one transaction.
//! - Cell ids are unique per board, not per store; sub-goal ids per cell.
//! - Read paths reject invalid persisted state instead of repairing it.
//! - Derived values (bingo count, progress) are never stored.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::board::{Board, BoardId, BoardProfile, BoardValidationError, ThemeId};
use crate::model::cell::{Cell, Difficulty, SubGoal};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ACTIVE_BOARD_KEY: &str = "active_board_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for board persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(BoardValidationError),
    Db(DbError),
    NotFound(BoardId),
    AlreadyExists(BoardId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "board not found: {id}"),
            Self::AlreadyExists(id) => write!(f, "board already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema v{actual_version} does not match expected v{expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardValidationError> for RepoError {
    fn from(value: BoardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Board store consumed by the use-case service.
pub trait BoardRepository {
    /// Inserts a new board with all of its cells.
    fn create_board(&mut self, board: &Board) -> RepoResult<BoardId>;
    /// Replaces profile, timestamps, cells and sub-goals of an existing board.
    fn save_board(&mut self, board: &Board) -> RepoResult<()>;
    /// Inserts every board whose id is not stored yet, all or nothing.
    ///
    /// Returns the number of inserted boards.
    fn import_boards(&mut self, boards: &[Board]) -> RepoResult<usize>;
    fn get_board(&self, id: BoardId) -> RepoResult<Option<Board>>;
    /// Lists all boards, newest period first, then oldest creation first.
    fn list_boards(&self) -> RepoResult<Vec<Board>>;
    fn delete_board(&mut self, id: BoardId) -> RepoResult<()>;
    fn active_board_id(&self) -> RepoResult<Option<BoardId>>;
    /// Selects an existing board as active.
    fn set_active_board_id(&mut self, id: BoardId) -> RepoResult<()>;
}

/// SQLite-backed board store.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the schema is incomplete.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_board_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn create_board(&mut self, board: &Board) -> RepoResult<BoardId> {
        board.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if board_exists(&tx, board.id)? {
            return Err(RepoError::AlreadyExists(board.id));
        }
        insert_board(&tx, board)?;

        tx.commit()?;
        Ok(board.id)
    }

    fn import_boards(&mut self, boards: &[Board]) -> RepoResult<usize> {
        for board in boards {
            board.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut inserted = 0;
        for board in boards {
            if board_exists(&tx, board.id)? {
                continue;
            }
            insert_board(&tx, board)?;
            inserted += 1;
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn save_board(&mut self, board: &Board) -> RepoResult<()> {
        board.validate()?;

        let board_uuid = board.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE boards
             SET
                year = ?2,
                month = ?3,
                theme = ?4,
                created_at = ?5,
                updated_at = ?6
             WHERE uuid = ?1;",
            params![
                board_uuid.as_str(),
                board.profile.year,
                board.profile.month,
                board.profile.theme.as_str(),
                board.created_at,
                board.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(board.id));
        }

        tx.execute(
            "DELETE FROM sub_goals WHERE board_uuid = ?1;",
            [board_uuid.as_str()],
        )?;
        tx.execute(
            "DELETE FROM board_cells WHERE board_uuid = ?1;",
            [board_uuid.as_str()],
        )?;
        insert_cells(&tx, board)?;

        tx.commit()?;
        Ok(())
    }

    fn get_board(&self, id: BoardId) -> RepoResult<Option<Board>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, year, month, theme, created_at, updated_at
                 FROM boards
                 WHERE uuid = ?1;",
                [id.to_string()],
                read_board_row,
            )
            .optional()?;

        row.map(|row| load_board(self.conn, row)).transpose()
    }

    fn list_boards(&self) -> RepoResult<Vec<Board>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, year, month, theme, created_at, updated_at
             FROM boards
             ORDER BY (year * 100 + COALESCE(month, 0)) DESC, created_at ASC, uuid ASC;",
        )?;
        let rows = stmt
            .query_map([], read_board_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| load_board(self.conn, row))
            .collect()
    }

    fn delete_board(&mut self, id: BoardId) -> RepoResult<()> {
        let board_uuid = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM boards WHERE uuid = ?1;", [board_uuid.as_str()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.execute(
            "DELETE FROM app_state WHERE key = ?1 AND value = ?2;",
            params![ACTIVE_BOARD_KEY, board_uuid.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn active_board_id(&self) -> RepoResult<Option<BoardId>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1;",
                [ACTIVE_BOARD_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|text| parse_uuid(&text, "app_state.value"))
            .transpose()
    }

    fn set_active_board_id(&mut self, id: BoardId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !board_exists(&tx, id)? {
            return Err(RepoError::NotFound(id));
        }
        tx.execute(
            "INSERT INTO app_state (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value;",
            params![ACTIVE_BOARD_KEY, id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Raw `boards` row before cells are attached.
struct BoardRow {
    uuid: String,
    year: i32,
    month: Option<i64>,
    theme: String,
    created_at: i64,
    updated_at: i64,
}

fn read_board_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoardRow> {
    Ok(BoardRow {
        uuid: row.get("uuid")?,
        year: row.get("year")?,
        month: row.get("month")?,
        theme: row.get("theme")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_board(conn: &Connection, row: BoardRow) -> RepoResult<Board> {
    let id = parse_uuid(&row.uuid, "boards.uuid")?;
    let month = row
        .month
        .map(|value| {
            u8::try_from(value).map_err(|_| {
                RepoError::InvalidData(format!("invalid month `{value}` in boards.month"))
            })
        })
        .transpose()?;
    let theme = ThemeId::parse(&row.theme).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid theme `{}` in boards.theme", row.theme))
    })?;

    let board = Board {
        id,
        profile: BoardProfile {
            year: row.year,
            month,
            theme,
        },
        items: load_cells(conn, &row.uuid)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    board
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("board {id}: {err}")))?;
    Ok(board)
}

fn load_cells(conn: &Connection, board_uuid: &str) -> RepoResult<Vec<Cell>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, position, text, difficulty, is_achieved
         FROM board_cells
         WHERE board_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([board_uuid])?;
    let mut cells = Vec::new();

    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        let position: i64 = row.get("position")?;
        let difficulty: i64 = row.get("difficulty")?;

        cells.push(Cell {
            id: parse_uuid(&uuid_text, "board_cells.uuid")?,
            text: row.get("text")?,
            difficulty: u8::try_from(difficulty)
                .ok()
                .and_then(|value| Difficulty::new(value).ok())
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid difficulty `{difficulty}` in board_cells.difficulty"
                    ))
                })?,
            achieved: int_to_bool(row.get("is_achieved")?, "board_cells.is_achieved")?,
            position: u8::try_from(position).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid position `{position}` in board_cells.position"
                ))
            })?,
            sub_goals: load_sub_goals(conn, board_uuid, &uuid_text)?,
        });
    }

    Ok(cells)
}

fn load_sub_goals(
    conn: &Connection,
    board_uuid: &str,
    cell_uuid: &str,
) -> RepoResult<Vec<SubGoal>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, text, is_done
         FROM sub_goals
         WHERE board_uuid = ?1 AND cell_uuid = ?2
         ORDER BY sort_order ASC;",
    )?;
    let mut rows = stmt.query([board_uuid, cell_uuid])?;
    let mut steps = Vec::new();

    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        steps.push(SubGoal {
            id: parse_uuid(&uuid_text, "sub_goals.uuid")?,
            text: row.get("text")?,
            done: int_to_bool(row.get("is_done")?, "sub_goals.is_done")?,
        });
    }

    Ok(steps)
}

fn insert_board(tx: &Transaction<'_>, board: &Board) -> RepoResult<()> {
    tx.execute(
        "INSERT INTO boards (uuid, year, month, theme, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            board.id.to_string(),
            board.profile.year,
            board.profile.month,
            board.profile.theme.as_str(),
            board.created_at,
            board.updated_at,
        ],
    )?;
    insert_cells(tx, board)
}

fn insert_cells(tx: &Transaction<'_>, board: &Board) -> RepoResult<()> {
    let board_uuid = board.id.to_string();
    let mut insert_cell = tx.prepare(
        "INSERT INTO board_cells (uuid, board_uuid, position, text, difficulty, is_achieved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    let mut insert_step = tx.prepare(
        "INSERT INTO sub_goals (board_uuid, cell_uuid, uuid, sort_order, text, is_done)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;

    for cell in &board.items {
        let cell_uuid = cell.id.to_string();
        insert_cell.execute(params![
            cell_uuid.as_str(),
            board_uuid.as_str(),
            cell.position,
            cell.text.as_str(),
            cell.difficulty.get(),
            bool_to_int(cell.achieved),
        ])?;

        for (sort_order, step) in cell.sub_goals.iter().enumerate() {
            insert_step.execute(params![
                board_uuid.as_str(),
                cell_uuid.as_str(),
                step.id.to_string(),
                sort_order as i64,
                step.text.as_str(),
                bool_to_int(step.done),
            ])?;
        }
    }

    Ok(())
}

fn board_exists(tx: &Transaction<'_>, id: BoardId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM boards WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_board_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["boards", "board_cells", "sub_goals", "app_state"] {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
