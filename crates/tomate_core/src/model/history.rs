//! Archived activity records.

use crate::model::activity::{ActivityId, Priority};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A finished activity moved out of the live table by archival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityHistory {
    /// Id the activity had while it was live.
    pub id: ActivityId,
    pub name: String,
    pub priority: Priority,
    pub finish_time: NaiveDateTime,
    pub tomatoes: u32,
    pub interrupts: u32,
}
