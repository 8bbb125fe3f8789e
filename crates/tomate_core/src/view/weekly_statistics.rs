//! Weekly finished-tomato statistics.
//!
//! # Invariants
//! - The model is cold until the first `reload`; afterwards it remembers
//!   the start day of the last computed week.
//! - The store is queried only when the requested week differs from the
//!   remembered one or when a reload is forced.
//! - Every `reload` emits `data_updated`, recomputed or not.

use crate::calendar::{weekday_index, weekday_label, WeekStart, WeekWindow};
use crate::repo::tomato_repo::TomatoStore;
use crate::view::signal::{Signal, SubscriptionId};
use crate::view::ListModelResult;
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// Finished-tomato count of one day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayCount {
    /// Entry of [`crate::calendar::WEEKDAY_NAMES`].
    pub label: &'static str,
    pub count: u32,
}

pub struct WeeklyStatisticsModel<S: TomatoStore> {
    store: Rc<S>,
    week_start: WeekStart,
    data: Vec<WeekdayCount>,
    cached_week_start: Option<NaiveDate>,
    data_updated: Signal<usize>,
}

impl<S: TomatoStore> WeeklyStatisticsModel<S> {
    pub fn new(store: Rc<S>, week_start: WeekStart) -> Self {
        Self {
            store,
            week_start,
            data: Vec::new(),
            cached_week_start: None,
            data_updated: Signal::new(),
        }
    }

    /// Seven entries in window order once loaded, empty before.
    pub fn data(&self) -> &[WeekdayCount] {
        &self.data
    }

    pub fn cached_week_start(&self) -> Option<NaiveDate> {
        self.cached_week_start
    }

    /// Registers a callback receiving the reloaded date's weekday index
    /// (`0` = Sunday).
    pub fn subscribe(&mut self, callback: impl FnMut(&usize) + 'static) -> SubscriptionId {
        self.data_updated.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.data_updated.unsubscribe(id)
    }

    /// Loads the week containing `date` unless it is already cached.
    pub fn reload(&mut self, date: NaiveDate, force: bool) -> ListModelResult<()> {
        let window = WeekWindow::containing(date, self.week_start);
        if force || self.cached_week_start != Some(window.start_day) {
            let counts = self
                .store
                .statistics_tomato_count(window.start_time(), window.end_time())?;
            let by_day: HashMap<NaiveDate, u32> = counts
                .into_iter()
                .map(|entry| (entry.day, entry.count))
                .collect();

            self.data = window
                .days()
                .map(|day| WeekdayCount {
                    label: weekday_label(day.weekday()),
                    count: by_day.get(&day).copied().unwrap_or(0),
                })
                .collect();
            self.cached_week_start = Some(window.start_day);
            debug!(
                "event=weekly_statistics_load module=view status=ok week_start={} forced={force}",
                window.start_day
            );
        }

        self.data_updated.emit(&weekday_index(date.weekday()));
        Ok(())
    }
}
