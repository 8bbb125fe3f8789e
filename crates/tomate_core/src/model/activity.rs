//! Activity domain model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an activity.
pub type ActivityId = Uuid;

/// Priority tier partitioning activities into separate list views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Today's work.
    #[default]
    Todo,
    /// Backlog for later days.
    Planned,
}

impl Priority {
    pub(crate) fn as_db(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Planned => "planned",
        }
    }

    pub(crate) fn from_db(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "planned" => Some(Self::Planned),
            _ => None,
        }
    }
}

/// A trackable task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub priority: Priority,
    /// Completion wall-clock time; `None` while unfinished.
    pub finish_time: Option<NaiveDateTime>,
    /// Number of tomatoes finished for this activity.
    pub tomatoes: u32,
    /// Number of tomatoes interrupted for this activity.
    pub interrupts: u32,
}

impl Activity {
    /// Creates an unfinished `Todo` activity with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates an unfinished `Todo` activity with a caller-provided id.
    pub fn with_id(id: ActivityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            priority: Priority::Todo,
            finish_time: None,
            tomatoes: 0,
            interrupts: 0,
        }
    }

    /// Marks this activity as finished at `at`.
    pub fn finish(&mut self, at: NaiveDateTime) {
        self.finish_time = Some(at);
    }

    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Activity, Priority};

    #[test]
    fn priority_round_trips_through_storage_names() {
        for priority in [Priority::Todo, Priority::Planned] {
            assert_eq!(Priority::from_db(priority.as_db()), Some(priority));
        }
        assert_eq!(Priority::from_db("someday"), None);
    }

    #[test]
    fn serializes_priority_in_snake_case() {
        let mut activity = Activity::new("plan sprint");
        activity.priority = Priority::Planned;
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["priority"], "planned");
        assert_eq!(json["finish_time"], serde_json::Value::Null);
    }
}
