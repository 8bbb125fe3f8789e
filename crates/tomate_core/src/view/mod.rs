//! List models bridging the tomato store to list widgets.
//!
//! # Responsibility
//! - Load store records into display-ready row caches.
//! - Push edits made through the activity list back to the store.
//! - Notify subscribers when weekly statistics are refreshed.
//!
//! # Invariants
//! - A row's denormalized fields equal its source record as of the last
//!   load or update; nothing refreshes rows in the background.
//! - Every reload replaces the row cache entirely.
//! - Store errors reach the caller unchanged inside `ListModelError::Repo`.

use crate::model::activity::ActivityId;
use crate::model::tomato::{TomatoId, TomatoTransitionError};
use crate::repo::tomato_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity_list;
pub mod finished_activities;
pub mod finished_tomatoes;
pub mod rows;
pub mod signal;
pub mod weekly_statistics;

pub use rows::{RowKey, RowList};
pub use signal::{Signal, SubscriptionId};

pub type ListModelResult<T> = Result<T, ListModelError>;

/// Error returned by list model operations.
#[derive(Debug)]
pub enum ListModelError {
    /// The store rejected the operation.
    Repo(RepoError),
    /// The row key does not address a row of this model.
    UnknownRow(RowKey),
    /// The row under `key` holds a different activity than the one supplied.
    RowMismatch {
        key: RowKey,
        expected: ActivityId,
        actual: ActivityId,
    },
    /// The tomato does not belong to the activity under `key`.
    TomatoMismatch { key: RowKey, tomato: TomatoId },
    /// The tomato already ended.
    Tomato(TomatoTransitionError),
}

impl Display for ListModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::UnknownRow(key) => write!(f, "unknown list row: {key}"),
            Self::RowMismatch {
                key,
                expected,
                actual,
            } => write!(f, "{key} holds activity {expected}, got {actual}"),
            Self::TomatoMismatch { key, tomato } => {
                write!(f, "tomato {tomato} does not belong to the activity of {key}")
            }
            Self::Tomato(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Tomato(err) => Some(err),
            Self::UnknownRow(_) | Self::RowMismatch { .. } | Self::TomatoMismatch { .. } => None,
        }
    }
}

impl From<TomatoTransitionError> for ListModelError {
    fn from(value: TomatoTransitionError) -> Self {
        Self::Tomato(value)
    }
}

impl From<RepoError> for ListModelError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
