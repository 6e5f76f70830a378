//! Core use-case services.
//!
//! # Responsibility
//! - Own the session task list and its mutations.
//! - Keep presentation layers decoupled from storage details.

pub mod board;
pub mod command;
pub mod task_store;
