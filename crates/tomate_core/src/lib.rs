//! List models bridging the tomato store to list widgets.
//!
//! The store (`repo`) owns persistence; the list models (`view`) keep
//! display-ready row caches in sync with it for a single UI thread.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod view;

pub use calendar::{day_range, WeekStart, WeekWindow, WEEKDAY_NAMES};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::activity::{Activity, ActivityId, Priority};
pub use model::history::ActivityHistory;
pub use model::tomato::{Tomato, TomatoId, TomatoState, TomatoTransitionError};
pub use repo::tomato_repo::{
    open_store, open_store_in_memory, DailyTomatoCount, RepoError, RepoResult, SqliteTomatoStore,
    TomatoStore,
};
pub use view::activity_list::{ActivityListModel, ActivityRow};
pub use view::finished_activities::{FinishedActivityModel, FinishedActivityRow};
pub use view::finished_tomatoes::{FinishedTomatoModel, FinishedTomatoRow, TomatoTally};
pub use view::weekly_statistics::{WeekdayCount, WeeklyStatisticsModel};
pub use view::{ListModelError, ListModelResult, RowKey, RowList, Signal, SubscriptionId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
