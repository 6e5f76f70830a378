//! Persistence boundary for the task list.
//!
//! # Responsibility
//! - Define the key/value persistence contract the store writes through.
//! - Encode/decode the persisted representation of the task list.
//! - Keep SQLite details inside the persistence boundary.
//!
//! # Invariants
//! - Adapters store one opaque string per key and overwrite on save.
//! - Decoding rejects invalid records and duplicate ids instead of masking them.

pub mod codec;
pub mod persistence;
pub mod sqlite_persistence;
