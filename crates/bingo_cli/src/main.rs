//! Command-line surface over the board service.
//!
//! # Responsibility
//! - Drive board use-cases against a local SQLite file for scripted edits
//!   and quick sanity checks.
//! - Keep presentation minimal: a text grid and the derived stats.

use bingo_core::db::open_db;
use bingo_core::engine::{goal_cells, sub_goal_progress};
use bingo_core::{
    default_log_level, init_logging, Board, BoardProfile, BoardService, BoardStats, Cell,
    CellEdit, Difficulty, SqliteBoardRepository, SubGoal, ThemeId, GRID_WIDTH,
};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

const CELL_LABEL_CHARS: usize = 12;

#[derive(Parser, Debug)]
#[command(name = "bingo", version, about = "Yearly goal bingo boards")]
struct Args {
    /// SQLite file holding all boards.
    #[arg(long, env = "LIFEBINGO_DB", default_value = "lifebingo.sqlite3")]
    db: PathBuf,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "LIFEBINGO_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// One of trace|debug|info|warn|error.
    #[arg(long, env = "LIFEBINGO_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the active board and its stats.
    Show,
    /// List every board, newest period first.
    List,
    /// Create a board for the year after the latest one.
    New,
    /// Make a board active.
    Select { board_id: Uuid },
    /// Delete a board.
    Delete { board_id: Uuid },
    /// Set the goal of a cell on the active board.
    Set {
        position: u8,
        text: String,
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
    },
    /// Reset a cell to unset state.
    Clear { position: u8 },
    /// Toggle the achieved stamp of a cell.
    Stamp { position: u8 },
    /// Append a sub-goal step to a cell.
    AddStep { position: u8, text: String },
    /// Toggle a sub-goal step by its 1-based index.
    Step { position: u8, index: usize },
    /// Move easy goals to the center and hard goals to the edges.
    Sort,
    /// Change period or theme of the active board.
    Period {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12, or 0 for the whole year.
        #[arg(long)]
        month: Option<u8>,
        #[arg(long, value_parser = parse_theme)]
        theme: Option<ThemeId>,
    },
    /// Print all boards as JSON.
    Export,
    /// Insert boards from a JSON export, skipping known ids.
    Import { path: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let mut conn = open_db(&args.db)?;
    let repo = SqliteBoardRepository::try_new(&mut conn)?;
    let mut service = BoardService::new(repo);

    match args.command {
        Command::Show => print_board(&service.active_board()?),
        Command::List => {
            let active = service.active_board()?.id;
            for board in service.list_boards()? {
                let stats = BoardStats::from_cells(&board.items);
                let marker = if board.id == active { "*" } else { " " };
                println!(
                    "{marker} {} {} progress={}% bingo={}",
                    board.id,
                    period_label(&board.profile),
                    stats.progress_percent,
                    stats.bingo_count
                );
            }
        }
        Command::New => print_board(&service.create_board()?),
        Command::Select { board_id } => print_board(&service.select_board(board_id)?),
        Command::Delete { board_id } => {
            service.delete_board(board_id)?;
            println!("deleted {board_id}");
        }
        Command::Set {
            position,
            text,
            difficulty,
        } => {
            let board = service.active_board()?;
            let cell_id = cell_id_at(&board, position)?;
            let edit = CellEdit {
                text: Some(text),
                difficulty,
                sub_goals: None,
            };
            print_board(&service.edit_cell(board.id, cell_id, &edit)?);
        }
        Command::Clear { position } => {
            let board = service.active_board()?;
            let cell_id = cell_id_at(&board, position)?;
            print_board(&service.edit_cell(board.id, cell_id, &CellEdit::clear())?);
        }
        Command::Stamp { position } => {
            let board = service.active_board()?;
            let cell_id = cell_id_at(&board, position)?;
            print_board(&service.toggle_achievement(board.id, cell_id)?);
        }
        Command::AddStep { position, text } => {
            let board = service.active_board()?;
            let cell_id = cell_id_at(&board, position)?;
            let mut steps = board
                .cell(cell_id)
                .map(|cell| cell.sub_goals.clone())
                .unwrap_or_default();
            steps.push(SubGoal::new(text));
            let edit = CellEdit {
                sub_goals: Some(steps),
                ..CellEdit::default()
            };
            print_steps(&service.edit_cell(board.id, cell_id, &edit)?);
        }
        Command::Step { position, index } => {
            let board = service.active_board()?;
            let cell_id = cell_id_at(&board, position)?;
            let step_id = board
                .cell(cell_id)
                .and_then(|cell| cell.sub_goals.get(index.checked_sub(1)?))
                .map(|step| step.id)
                .ok_or_else(|| format!("cell {position} has no step #{index}"))?;
            print_steps(&service.toggle_sub_goal(board.id, cell_id, step_id)?);
        }
        Command::Sort => {
            let board = service.active_board()?;
            print_board(&service.auto_layout(board.id)?);
        }
        Command::Period { year, month, theme } => {
            let board = service.active_board()?;
            let current = board.profile;
            let profile = BoardProfile {
                year: year.unwrap_or(current.year),
                month: match month {
                    Some(0) => None,
                    Some(value) => Some(value),
                    None => current.month,
                },
                theme: theme.unwrap_or(current.theme),
            };
            print_board(&service.update_profile(board.id, profile)?);
        }
        Command::Export => println!("{}", service.export_json()?),
        Command::Import { path } => {
            let payload = std::fs::read_to_string(&path)?;
            let inserted = service.import_json(&payload)?;
            println!("imported {inserted} board(s) from {}", path.display());
        }
    }

    Ok(())
}

fn cell_id_at(board: &Board, position: u8) -> Result<Uuid, String> {
    board
        .cell_at(position)
        .map(|cell| cell.id)
        .ok_or_else(|| format!("no cell at position {position}; expected 0-24"))
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    let number: u8 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    Difficulty::new(number).map_err(|err| err.to_string())
}

fn parse_theme(value: &str) -> Result<ThemeId, String> {
    ThemeId::parse(value).ok_or_else(|| {
        let names: Vec<&str> = ThemeId::ALL.iter().map(|theme| theme.as_str()).collect();
        format!("unknown theme `{value}`; expected {}", names.join("|"))
    })
}

fn period_label(profile: &BoardProfile) -> String {
    match profile.month {
        Some(month) => format!("{}-{month:02}", profile.year),
        None => profile.year.to_string(),
    }
}

fn print_board(board: &Board) {
    let stats = BoardStats::from_cells(&board.items);
    println!(
        "{} [{}] {}",
        period_label(&board.profile),
        board.profile.theme.as_str(),
        board.id
    );

    for row in board.items.chunks(usize::from(GRID_WIDTH)) {
        let labels: Vec<String> = row.iter().map(cell_label).collect();
        println!("{}", labels.join(" | "));
    }

    println!(
        "achieved={} bingo={} progress={}%",
        stats.achieved, stats.bingo_count, stats.progress_percent
    );
}

fn cell_label(cell: &Cell) -> String {
    let mark = if cell.achieved { 'x' } else { ' ' };
    let text: String = if cell.is_blank() {
        "+".to_string()
    } else {
        cell.text.chars().take(CELL_LABEL_CHARS).collect()
    };
    format!(
        "{:>2}[{mark}]{text:<width$}",
        cell.position,
        width = CELL_LABEL_CHARS
    )
}

fn print_steps(board: &Board) {
    for cell in goal_cells(&board.items) {
        let progress = sub_goal_progress(cell);
        println!(
            "#{:<2} {} ({}/{})",
            cell.position, cell.text, progress.done, progress.total
        );
        for (index, step) in cell.sub_goals.iter().enumerate() {
            let mark = if step.done { 'x' } else { ' ' };
            println!("    {}. [{mark}] {}", index + 1, step.text);
        }
    }
}
