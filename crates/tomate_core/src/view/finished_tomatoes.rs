//! Read-only list of one day's tomatoes.

use crate::calendar::{clock_label, day_range};
use crate::model::tomato::Tomato;
use crate::repo::tomato_repo::TomatoStore;
use crate::view::rows::RowList;
use crate::view::ListModelResult;
use chrono::NaiveDate;
use log::debug;
use std::rc::Rc;

const OPEN_END_LABEL: &str = "--:--";

/// Display row for one tomato.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedTomatoRow {
    /// `HH:MM - HH:MM`.
    pub time: String,
    pub activity: String,
    pub interrupted: bool,
}

impl From<&Tomato> for FinishedTomatoRow {
    fn from(tomato: &Tomato) -> Self {
        let end = tomato
            .end_time
            .map(clock_label)
            .unwrap_or_else(|| OPEN_END_LABEL.to_string());
        Self {
            time: format!("{} - {}", clock_label(tomato.start_time), end),
            activity: tomato.activity_name.clone(),
            interrupted: tomato.is_interrupted(),
        }
    }
}

/// Tomato counts of one loaded day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomatoTally {
    pub completed: usize,
    pub interrupted: usize,
}

impl TomatoTally {
    pub fn total(&self) -> usize {
        self.completed + self.interrupted
    }
}

pub struct FinishedTomatoModel<S: TomatoStore> {
    store: Rc<S>,
    rows: RowList<FinishedTomatoRow>,
}

impl<S: TomatoStore> FinishedTomatoModel<S> {
    pub fn new(store: Rc<S>) -> Self {
        Self {
            store,
            rows: RowList::new(),
        }
    }

    pub fn rows(&self) -> &RowList<FinishedTomatoRow> {
        &self.rows
    }

    /// Replaces the rows with every tomato started on `date`.
    ///
    /// Any tomato not marked interrupted counts as completed.
    pub fn load(&mut self, date: NaiveDate) -> ListModelResult<TomatoTally> {
        let (start, end) = day_range(date);
        let tomatoes = self.store.list_tomatoes(start, end)?;

        self.rows.clear();
        let mut tally = TomatoTally::default();
        for tomato in &tomatoes {
            let row = FinishedTomatoRow::from(tomato);
            if row.interrupted {
                tally.interrupted += 1;
            } else {
                tally.completed += 1;
            }
            self.rows.append(row);
        }

        debug!(
            "event=tomatoes_load module=view status=ok date={date} completed={} interrupted={}",
            tally.completed, tally.interrupted
        );
        Ok(tally)
    }
}
