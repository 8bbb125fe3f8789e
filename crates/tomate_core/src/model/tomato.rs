//! Tomato (focused work interval) domain model.
//!
//! # Invariants
//! - A tomato leaves `Running` exactly once, through `finish` or `interrupt`.
//! - Leaving `Running` bumps exactly one counter on the owning activity.

use crate::model::activity::{Activity, ActivityId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a tomato.
pub type TomatoId = Uuid;

/// Lifecycle state of a tomato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TomatoState {
    Running,
    /// Completed normally.
    Finished,
    /// Stopped before the interval elapsed.
    Interrupted,
}

impl TomatoState {
    pub(crate) fn as_db(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Interrupted => "interrupted",
        }
    }

    pub(crate) fn from_db(value: &str) -> Option<Self> {
        match value {
            "running" => Some(Self::Running),
            "finished" => Some(Self::Finished),
            "interrupted" => Some(Self::Interrupted),
            _ => None,
        }
    }
}

/// Rejected attempt to end a tomato that already left `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TomatoTransitionError {
    pub id: TomatoId,
    pub state: TomatoState,
}

impl Display for TomatoTransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tomato {} already ended as {:?}", self.id, self.state)
    }
}

impl Error for TomatoTransitionError {}

/// One focused-work session tied to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tomato {
    pub id: TomatoId,
    /// Owning activity; cleared by the store once that activity is archived.
    pub activity_id: Option<ActivityId>,
    /// Activity name at the time the tomato started.
    pub activity_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub state: TomatoState,
}

impl Tomato {
    /// Starts a running tomato for `activity`.
    pub fn start(activity: &Activity, at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_id: Some(activity.id),
            activity_name: activity.name.clone(),
            start_time: at,
            end_time: None,
            state: TomatoState::Running,
        }
    }

    /// Completes the tomato and credits it to `activity`.
    ///
    /// Leaves both untouched when the tomato is no longer running.
    pub fn finish(
        &mut self,
        activity: &mut Activity,
        at: NaiveDateTime,
    ) -> Result<(), TomatoTransitionError> {
        self.stop(TomatoState::Finished, at)?;
        activity.tomatoes += 1;
        Ok(())
    }

    /// Interrupts the tomato and records the interruption on `activity`.
    pub fn interrupt(
        &mut self,
        activity: &mut Activity,
        at: NaiveDateTime,
    ) -> Result<(), TomatoTransitionError> {
        self.stop(TomatoState::Interrupted, at)?;
        activity.interrupts += 1;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state == TomatoState::Running
    }

    pub fn is_interrupted(&self) -> bool {
        self.state == TomatoState::Interrupted
    }

    fn stop(&mut self, state: TomatoState, at: NaiveDateTime) -> Result<(), TomatoTransitionError> {
        if !self.is_running() {
            return Err(TomatoTransitionError {
                id: self.id,
                state: self.state,
            });
        }
        self.state = state;
        self.end_time = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Tomato, TomatoState, TomatoTransitionError};
    use crate::model::activity::Activity;
    use chrono::NaiveDate;

    #[test]
    fn finish_and_interrupt_update_the_matching_counter() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let mut activity = Activity::new("write report");

        let mut first = Tomato::start(&activity, day.and_hms_opt(9, 0, 0).unwrap());
        first
            .finish(&mut activity, day.and_hms_opt(9, 25, 0).unwrap())
            .unwrap();
        assert_eq!(first.state, TomatoState::Finished);
        assert_eq!(first.end_time, day.and_hms_opt(9, 25, 0));

        let mut second = Tomato::start(&activity, day.and_hms_opt(10, 0, 0).unwrap());
        second
            .interrupt(&mut activity, day.and_hms_opt(10, 7, 0).unwrap())
            .unwrap();
        assert!(second.is_interrupted());

        assert_eq!(activity.tomatoes, 1);
        assert_eq!(activity.interrupts, 1);
        assert_eq!(second.activity_name, "write report");
        assert_eq!(second.activity_id, Some(activity.id));
    }

    #[test]
    fn ended_tomato_cannot_end_again() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let mut activity = Activity::new("review");
        let mut tomato = Tomato::start(&activity, day.and_hms_opt(9, 0, 0).unwrap());
        tomato
            .finish(&mut activity, day.and_hms_opt(9, 25, 0).unwrap())
            .unwrap();

        let err = tomato
            .interrupt(&mut activity, day.and_hms_opt(9, 30, 0).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            TomatoTransitionError {
                id: tomato.id,
                state: TomatoState::Finished,
            }
        );
        assert_eq!(tomato.state, TomatoState::Finished);
        assert_eq!(tomato.end_time, day.and_hms_opt(9, 25, 0));
        assert_eq!((activity.tomatoes, activity.interrupts), (1, 0));
    }
}
