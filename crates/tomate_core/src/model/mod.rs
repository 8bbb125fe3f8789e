//! Domain model for activities and their work intervals.
//!
//! # Responsibility
//! - Define the records the store persists and the list models display.
//! - Keep count bookkeeping (finished vs. interrupted tomatoes) next to the
//!   state transitions that cause it.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - An activity is unfinished exactly when `finish_time` is `None`.

pub mod activity;
pub mod history;
pub mod tomato;
