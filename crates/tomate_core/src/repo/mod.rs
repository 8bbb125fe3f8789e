//! Store contract and persistence implementation.
//!
//! # Responsibility
//! - Define the operations list models need from the tomato store.
//! - Isolate SQLite query details from the list models.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `Closed`) in addition to
//!   DB transport errors.
//! - Every list operation returns rows in a deterministic order.

pub mod tomato_repo;
