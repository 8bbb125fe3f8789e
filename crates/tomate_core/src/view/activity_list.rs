//! Activity list model for one priority tier.
//!
//! # Responsibility
//! - Mirror the store's activities of one tier into keyed rows.
//! - Apply add/update/delete to the store first, then to the rows.
//! - Record finished or interrupted tomatoes against listed activities.
//!
//! # Invariants
//! - Every row holds an activity whose priority equals the model's tier.
//! - A row only ever holds the activity it was created for; edits are
//!   matched by activity id.
//! - Store mutations happen before row mutations; a failed store call leaves
//!   the rows untouched.
//! - `finish_tomato` only ends running tomatoes of the row's own activity.

use crate::model::activity::{Activity, Priority};
use crate::model::tomato::Tomato;
use crate::repo::tomato_repo::TomatoStore;
use crate::view::rows::{RowKey, RowList};
use crate::view::{ListModelError, ListModelResult};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use std::rc::Rc;

/// Display row for one activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub title: String,
    pub finished: bool,
    pub tomatoes: u32,
    pub interrupts: u32,
    /// Source record, handed back to editors.
    pub activity: Activity,
}

impl From<Activity> for ActivityRow {
    fn from(activity: Activity) -> Self {
        Self {
            title: activity.name.clone(),
            finished: activity.is_finished(),
            tomatoes: activity.tomatoes,
            interrupts: activity.interrupts,
            activity,
        }
    }
}

/// Keyed view of all activities with one priority.
pub struct ActivityListModel<S: TomatoStore> {
    store: Rc<S>,
    priority: Priority,
    rows: RowList<ActivityRow>,
}

impl<S: TomatoStore> ActivityListModel<S> {
    /// Creates an empty model; call [`Self::load`] to populate it.
    pub fn new(store: Rc<S>, priority: Priority) -> Self {
        Self {
            store,
            priority,
            rows: RowList::new(),
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn rows(&self) -> &RowList<ActivityRow> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: RowKey) -> Option<&ActivityRow> {
        self.rows.get(key)
    }

    /// Source activity of a row, for editing and resubmission via `update`.
    pub fn activity(&self, key: RowKey) -> Option<&Activity> {
        self.rows.get(key).map(|row| &row.activity)
    }

    /// Reloads every activity of this tier. Previously issued keys become
    /// invalid.
    pub fn load(&mut self) -> ListModelResult<usize> {
        let activities = self.store.list_activities(self.priority)?;
        self.rows.clear();
        for activity in activities {
            self.rows.append(activity.into());
        }
        debug!(
            "event=activities_load module=view status=ok priority={:?} rows={}",
            self.priority,
            self.rows.len()
        );
        Ok(self.rows.len())
    }

    /// Persists `activity` under this model's tier and appends its row.
    pub fn add(&mut self, mut activity: Activity) -> ListModelResult<RowKey> {
        activity.priority = self.priority;
        self.store.save_activity(&activity)?;
        let key = self.rows.append(activity.into());
        debug!("event=activity_add module=view status=ok row={key}");
        Ok(key)
    }

    /// Persists `activity` and refreshes the row under `key`.
    ///
    /// A row whose activity moved to another tier is removed from this view.
    /// `activity` must be the one already listed under `key`.
    pub fn update(&mut self, key: RowKey, activity: Activity) -> ListModelResult<()> {
        let Some(listed) = self.activity(key) else {
            warn!("event=activity_update module=view status=error row={key} error_code=unknown_row");
            return Err(ListModelError::UnknownRow(key));
        };
        if listed.id != activity.id {
            warn!("event=activity_update module=view status=error row={key} error_code=row_mismatch");
            return Err(ListModelError::RowMismatch {
                key,
                expected: listed.id,
                actual: activity.id,
            });
        }

        self.store.update_activity(&activity)?;
        if activity.priority == self.priority {
            self.rows.update(key, activity.into());
            debug!("event=activity_update module=view status=ok row={key}");
        } else {
            self.rows.remove(key);
            debug!(
                "event=activity_update module=view status=moved row={key} priority={:?}",
                activity.priority
            );
        }
        Ok(())
    }

    /// Deletes the activity under `key` from the store and the rows.
    pub fn delete(&mut self, key: RowKey) -> ListModelResult<Activity> {
        let id = self
            .activity(key)
            .map(|activity| activity.id)
            .ok_or(ListModelError::UnknownRow(key))?;
        self.store.delete_activity(id)?;
        let row = self.rows.remove(key).ok_or(ListModelError::UnknownRow(key))?;
        debug!("event=activity_delete module=view status=ok row={key}");
        Ok(row.activity)
    }

    /// Ends `tomato` for the activity under `key` and persists both.
    ///
    /// The activity's finished or interrupted count changes, so its row is
    /// refreshed through [`Self::update`] before the tomato is saved.
    /// `tomato` is only modified once both writes succeed.
    pub fn finish_tomato(
        &mut self,
        key: RowKey,
        tomato: &mut Tomato,
        interrupted: bool,
        at: NaiveDateTime,
    ) -> ListModelResult<()> {
        let mut activity = self
            .activity(key)
            .cloned()
            .ok_or(ListModelError::UnknownRow(key))?;
        if tomato.activity_id != Some(activity.id) {
            warn!("event=tomato_finish module=view status=error row={key} error_code=tomato_mismatch");
            return Err(ListModelError::TomatoMismatch {
                key,
                tomato: tomato.id,
            });
        }

        let mut ended = tomato.clone();
        if interrupted {
            ended.interrupt(&mut activity, at)?;
        } else {
            ended.finish(&mut activity, at)?;
        }

        self.update(key, activity)?;
        self.store.save_tomato(&ended)?;
        *tomato = ended;
        debug!(
            "event=tomato_finish module=view status=ok row={key} state={:?}",
            tomato.state
        );
        Ok(())
    }

    /// Archives activities finished before today, then closes the store.
    pub fn close(self) -> ListModelResult<usize> {
        self.close_on(Local::now().date_naive())
    }

    /// Same as [`Self::close`] with an explicit current day.
    pub fn close_on(self, today: NaiveDate) -> ListModelResult<usize> {
        let archived = self
            .store
            .archive_activities(today.and_time(NaiveTime::MIN))?;
        self.store.close()?;
        info!("event=activities_close module=view status=ok archived={archived}");
        Ok(archived)
    }
}
