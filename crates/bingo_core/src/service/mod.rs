//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine operations and repository calls into use-case APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod board_service;
