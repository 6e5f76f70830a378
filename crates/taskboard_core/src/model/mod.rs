//! Domain model for the task board.
//!
//! # Responsibility
//! - Define the task record shared by the store, the codec and callers.
//! - Define read-only projections (filters, counters) over the task list.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` that is never reused in one list.
//! - Task text is non-empty after trimming whitespace.

pub mod filter;
pub mod identity;
pub mod task;
