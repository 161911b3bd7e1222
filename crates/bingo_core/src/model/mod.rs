//! Board domain model.
//!
//! # Responsibility
//! - Define the plain values exchanged between engine, store and UI.
//! - Keep the persisted shape free of derived fields.
//!
//! # Invariants
//! - Every board owns exactly 25 cells; cells are never added or removed.
//! - Bingo count and progress are derived, never stored.

pub mod board;
pub mod cell;
