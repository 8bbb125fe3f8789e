use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tomate_core::{
    open_store_in_memory, Activity, ActivityHistory, ActivityId, DailyTomatoCount, Priority, RepoResult,
    SqliteTomatoStore, Tomato, TomatoStore, WeekStart, WeeklyStatisticsModel,
};

/// Delegating store that counts statistics queries.
struct CountingStore {
    inner: SqliteTomatoStore,
    statistics_calls: Cell<usize>,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: open_store_in_memory().unwrap(),
            statistics_calls: Cell::new(0),
        }
    }
}

impl TomatoStore for CountingStore {
    fn list_activities(&self, priority: Priority) -> RepoResult<Vec<Activity>> {
        self.inner.list_activities(priority)
    }

    fn save_activity(&self, activity: &Activity) -> RepoResult<()> {
        self.inner.save_activity(activity)
    }

    fn update_activity(&self, activity: &Activity) -> RepoResult<()> {
        self.inner.update_activity(activity)
    }

    fn delete_activity(&self, id: ActivityId) -> RepoResult<()> {
        self.inner.delete_activity(id)
    }

    fn archive_activities(&self, cutoff: NaiveDateTime) -> RepoResult<usize> {
        self.inner.archive_activities(cutoff)
    }

    fn close(&self) -> RepoResult<()> {
        self.inner.close()
    }

    fn list_tomatoes(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Tomato>> {
        self.inner.list_tomatoes(start, end)
    }

    fn save_tomato(&self, tomato: &Tomato) -> RepoResult<()> {
        self.inner.save_tomato(tomato)
    }

    fn list_activity_histories(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<ActivityHistory>> {
        self.inner.list_activity_histories(start, end)
    }

    fn list_finished_activities(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<Activity>> {
        self.inner.list_finished_activities(start, end)
    }

    fn statistics_tomato_count(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<DailyTomatoCount>> {
        self.statistics_calls.set(self.statistics_calls.get() + 1);
        self.inner.statistics_tomato_count(start, end)
    }
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, 0, 0).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

fn seed_finished_tomatoes(store: &CountingStore, starts: &[NaiveDateTime]) {
    let mut activity = Activity::new("focus");
    store.save_activity(&activity).unwrap();
    for start in starts {
        let mut tomato = Tomato::start(&activity, *start);
        tomato.finish(&mut activity, *start).unwrap();
        store.save_tomato(&tomato).unwrap();
    }
}

fn record_notifications(model: &mut WeeklyStatisticsModel<CountingStore>) -> Rc<RefCell<Vec<usize>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    model.subscribe(move |weekday: &usize| sink.borrow_mut().push(*weekday));
    seen
}

#[test]
fn same_week_reload_reuses_cache_but_always_notifies() {
    let store = Rc::new(CountingStore::new());
    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Sunday);
    let seen = record_notifications(&mut model);
    assert_eq!(model.cached_week_start(), None);

    // 2024-05-15 is a Wednesday, 2024-05-17 the Friday of the same week.
    model.reload(date(15), false).unwrap();
    model.reload(date(17), false).unwrap();

    assert_eq!(store.statistics_calls.get(), 1);
    assert_eq!(*seen.borrow(), vec![3, 5]);
    assert_eq!(model.cached_week_start(), Some(date(12)));
}

#[test]
fn force_or_new_week_recomputes() {
    let store = Rc::new(CountingStore::new());
    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Sunday);

    model.reload(date(15), false).unwrap();
    model.reload(date(15), true).unwrap();
    assert_eq!(store.statistics_calls.get(), 2);

    model.reload(date(19), false).unwrap();
    assert_eq!(store.statistics_calls.get(), 3);
    assert_eq!(model.cached_week_start(), Some(date(19)));
}

#[test]
fn wednesday_entry_matches_wednesday_tomatoes() {
    let store = Rc::new(CountingStore::new());
    seed_finished_tomatoes(
        &store,
        &[
            at(11, 23),
            at(12, 9),
            at(15, 9),
            at(15, 10),
            at(15, 11),
            at(18, 22),
            at(19, 1),
        ],
    );

    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Sunday);
    model.reload(date(15), false).unwrap();

    let data: Vec<_> = model
        .data()
        .iter()
        .map(|entry| (entry.label, entry.count))
        .collect();
    assert_eq!(
        data,
        vec![
            ("Sun", 1),
            ("Mon", 0),
            ("Tue", 0),
            ("Wed", 3),
            ("Thu", 0),
            ("Fri", 0),
            ("Sat", 1),
        ]
    );
}

#[test]
fn stale_data_is_kept_until_forced() {
    let store = Rc::new(CountingStore::new());
    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Sunday);
    model.reload(date(15), false).unwrap();
    assert_eq!(model.data()[3].count, 0);

    seed_finished_tomatoes(&store, &[at(15, 9)]);
    model.reload(date(15), false).unwrap();
    assert_eq!(model.data()[3].count, 0);

    model.reload(date(15), true).unwrap();
    assert_eq!(model.data()[3].count, 1);
}

#[test]
fn monday_weeks_label_days_by_their_own_weekday() {
    let store = Rc::new(CountingStore::new());
    seed_finished_tomatoes(&store, &[at(12, 9), at(13, 9)]);

    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Monday);
    let seen = record_notifications(&mut model);
    model.reload(date(12), false).unwrap();

    assert_eq!(model.cached_week_start(), Some(date(6)));
    let labels: Vec<_> = model.data().iter().map(|entry| entry.label).collect();
    assert_eq!(labels, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    assert_eq!(model.data()[6].count, 1);
    assert_eq!(*seen.borrow(), vec![0]);
}

#[test]
fn unsubscribed_callbacks_are_not_called() {
    let store = Rc::new(CountingStore::new());
    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Sunday);
    let calls = Rc::new(Cell::new(0));
    let sink = Rc::clone(&calls);
    let id = model.subscribe(move |_| sink.set(sink.get() + 1));

    model.reload(date(15), false).unwrap();
    assert!(model.unsubscribe(id));
    model.reload(date(15), false).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn tomatoes_before_1970_count_on_their_own_day() {
    let store = Rc::new(CountingStore::new());
    let new_years_eve = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
    seed_finished_tomatoes(&store, &[new_years_eve.and_hms_opt(10, 0, 0).unwrap()]);

    let mut model = WeeklyStatisticsModel::new(Rc::clone(&store), WeekStart::Sunday);
    model.reload(new_years_eve, false).unwrap();

    assert_eq!(
        model.cached_week_start(),
        NaiveDate::from_ymd_opt(1969, 12, 28)
    );
    let data: Vec<_> = model
        .data()
        .iter()
        .map(|entry| (entry.label, entry.count))
        .collect();
    assert_eq!(data[3], ("Wed", 1));
    assert_eq!(data[4], ("Thu", 0));
}
