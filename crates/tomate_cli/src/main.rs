//! CLI smoke entry point.
//!
//! Opens the configured store and prints today's summary through the list
//! models, so core wiring can be checked without a UI.

use chrono::Local;
use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use tomate_core::{
    init_logging_from_config, open_store, ActivityListModel, CoreConfig, FinishedActivityModel,
    FinishedTomatoModel, Priority, WeeklyStatisticsModel, WEEKDAY_NAMES,
};

fn main() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    init_logging_from_config(&config)?;
    log::info!(
        "event=cli_start module=cli status=ok version={}",
        tomate_core::core_version()
    );

    let store = Rc::new(open_store(&config.db_path)?);
    let today = Local::now().date_naive();

    let mut todo = ActivityListModel::new(Rc::clone(&store), Priority::Todo);
    todo.load()?;
    println!("todo activities={}", todo.len());
    for (_, row) in todo.rows().iter() {
        let mark = if row.finished { "x" } else { " " };
        println!(
            "  [{mark}] {} tomatoes={} interrupts={}",
            row.title, row.tomatoes, row.interrupts
        );
    }

    let mut tomatoes = FinishedTomatoModel::new(Rc::clone(&store));
    let tally = tomatoes.load(today)?;
    println!(
        "tomatoes date={today} completed={} interrupted={}",
        tally.completed, tally.interrupted
    );

    let mut finished = FinishedActivityModel::new(Rc::clone(&store));
    println!("finished activities={}", finished.load(today)?);

    let highlighted = Rc::new(Cell::new(None));
    let mut weekly = WeeklyStatisticsModel::new(Rc::clone(&store), config.week_start);
    let sink = Rc::clone(&highlighted);
    weekly.subscribe(move |weekday: &usize| sink.set(Some(*weekday)));
    weekly.reload(today, false)?;
    let today_label = highlighted.get().map_or("?", |index| WEEKDAY_NAMES[index]);
    for entry in weekly.data() {
        let marker = if entry.label == today_label { "*" } else { " " };
        println!("  {marker}{} {}", entry.label, entry.count);
    }

    let archived = todo.close()?;
    println!("archived activities={archived}");
    Ok(())
}
