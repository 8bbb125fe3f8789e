//! Read-only list of activities completed on one day.
//!
//! Archived histories come first, followed by live activities finished in
//! the same window.

use crate::calendar::day_range;
use crate::repo::tomato_repo::TomatoStore;
use crate::view::rows::RowList;
use crate::view::ListModelResult;
use chrono::NaiveDate;
use log::debug;
use std::rc::Rc;

/// Display row for one completed activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedActivityRow {
    /// Always `true`; kept for the check-box column.
    pub finished: bool,
    pub name: String,
}

pub struct FinishedActivityModel<S: TomatoStore> {
    store: Rc<S>,
    rows: RowList<FinishedActivityRow>,
}

impl<S: TomatoStore> FinishedActivityModel<S> {
    pub fn new(store: Rc<S>) -> Self {
        Self {
            store,
            rows: RowList::new(),
        }
    }

    pub fn rows(&self) -> &RowList<FinishedActivityRow> {
        &self.rows
    }

    /// Replaces the rows with activities completed on `date` and returns
    /// how many there are.
    pub fn load(&mut self, date: NaiveDate) -> ListModelResult<usize> {
        let (start, end) = day_range(date);
        let histories = self.store.list_activity_histories(start, end)?;
        let activities = self.store.list_finished_activities(start, end)?;

        self.rows.clear();
        let names = histories
            .into_iter()
            .map(|history| history.name)
            .chain(activities.into_iter().map(|activity| activity.name));
        for name in names {
            self.rows.append(FinishedActivityRow {
                finished: true,
                name,
            });
        }

        debug!(
            "event=finished_activities_load module=view status=ok date={date} rows={}",
            self.rows.len()
        );
        Ok(self.rows.len())
    }
}
