//! Repository layer for board persistence.
//!
//! # Responsibility
//! - Define the board store contract consumed by the service layer.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Board::validate()` before persistence.
//! - Missing boards surface as `RepoError::NotFound`, not as transport errors.

pub mod board_repo;
