//! Tomato store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over live activities and tomatoes.
//! - Provide the day/week range queries behind the summary list models.
//! - Move finished activities into history on archival.
//!
//! # Invariants
//! - Range queries over days are half-open `[start, end)`; the weekly
//!   statistics query is closed `[start, end]`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - After `close`, every operation fails with `RepoError::Closed`.

use crate::calendar::{from_epoch_day, from_epoch_ms, to_epoch_ms};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::activity::{Activity, ActivityId, Priority};
use crate::model::history::ActivityHistory;
use crate::model::tomato::{Tomato, TomatoState};
use chrono::{NaiveDate, NaiveDateTime};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use uuid::Uuid;

const ACTIVITY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    priority,
    finish_time,
    tomatoes,
    interrupts
FROM activities";

const HISTORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    priority,
    finish_time,
    tomatoes,
    interrupts
FROM activity_histories";

const TOMATO_SELECT_SQL: &str = "SELECT
    uuid,
    activity_uuid,
    activity_name,
    start_time,
    end_time,
    state
FROM tomatoes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by store operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
    Closed,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Closed => write!(f, "tomato store is closed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Closed => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Finished-tomato count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTomatoCount {
    pub day: NaiveDate,
    pub count: u32,
}

/// Store contract consumed by the list models.
pub trait TomatoStore {
    /// Lists live activities of one tier in insertion order.
    fn list_activities(&self, priority: Priority) -> RepoResult<Vec<Activity>>;
    fn save_activity(&self, activity: &Activity) -> RepoResult<()>;
    fn update_activity(&self, activity: &Activity) -> RepoResult<()>;
    fn delete_activity(&self, id: ActivityId) -> RepoResult<()>;
    /// Moves activities finished before `cutoff` into history.
    ///
    /// Returns the number of archived activities.
    fn archive_activities(&self, cutoff: NaiveDateTime) -> RepoResult<usize>;
    /// Releases the underlying connection.
    fn close(&self) -> RepoResult<()>;
    /// Lists tomatoes started in `[start, end)` ordered by start time.
    fn list_tomatoes(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Tomato>>;
    /// Inserts a tomato, or replaces the stored one with the same id.
    fn save_tomato(&self, tomato: &Tomato) -> RepoResult<()>;
    /// Lists archived activities finished in `[start, end)`.
    fn list_activity_histories(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<ActivityHistory>>;
    /// Lists live activities finished in `[start, end)`.
    fn list_finished_activities(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<Activity>>;
    /// Counts finished tomatoes per day for starts in `[start, end]`.
    ///
    /// Days without finished tomatoes are absent from the result.
    fn statistics_tomato_count(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<DailyTomatoCount>>;
}

/// Opens the tomato store at `path`, migrating it when needed.
pub fn open_store(path: impl AsRef<Path>) -> RepoResult<SqliteTomatoStore> {
    Ok(SqliteTomatoStore::new(open_db(path)?))
}

/// Opens a fresh in-memory tomato store.
pub fn open_store_in_memory() -> RepoResult<SqliteTomatoStore> {
    Ok(SqliteTomatoStore::new(open_db_in_memory()?))
}

/// SQLite-backed tomato store.
pub struct SqliteTomatoStore {
    conn: RefCell<Option<Connection>>,
}

impl SqliteTomatoStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: RefCell::new(Some(conn)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.conn.borrow().is_none()
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let guard = self.conn.borrow();
        let conn = guard.as_ref().ok_or(RepoError::Closed)?;
        op(conn)
    }
}

impl TomatoStore for SqliteTomatoStore {
    fn list_activities(&self, priority: Priority) -> RepoResult<Vec<Activity>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{ACTIVITY_SELECT_SQL} WHERE priority = ?1 ORDER BY rowid ASC;"
            ))?;
            let mut rows = stmt.query([priority.as_db()])?;
            let mut activities = Vec::new();
            while let Some(row) = rows.next()? {
                activities.push(parse_activity_row(row)?);
            }
            Ok(activities)
        })
    }

    fn save_activity(&self, activity: &Activity) -> RepoResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO activities (
                    uuid,
                    name,
                    priority,
                    finish_time,
                    tomatoes,
                    interrupts
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    activity.id.to_string(),
                    activity.name.as_str(),
                    activity.priority.as_db(),
                    activity.finish_time.map(to_epoch_ms),
                    activity.tomatoes,
                    activity.interrupts,
                ],
            )?;
            Ok(())
        })
    }

    fn update_activity(&self, activity: &Activity) -> RepoResult<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE activities
                 SET
                    name = ?1,
                    priority = ?2,
                    finish_time = ?3,
                    tomatoes = ?4,
                    interrupts = ?5
                 WHERE uuid = ?6;",
                params![
                    activity.name.as_str(),
                    activity.priority.as_db(),
                    activity.finish_time.map(to_epoch_ms),
                    activity.tomatoes,
                    activity.interrupts,
                    activity.id.to_string(),
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound(activity.id));
            }
            Ok(())
        })
    }

    fn delete_activity(&self, id: ActivityId) -> RepoResult<()> {
        self.with_conn(|conn| {
            let changed =
                conn.execute("DELETE FROM activities WHERE uuid = ?1;", [id.to_string()])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }

    fn archive_activities(&self, cutoff: NaiveDateTime) -> RepoResult<usize> {
        self.with_conn(|conn| {
            let cutoff_ms = to_epoch_ms(cutoff);
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT OR REPLACE INTO activity_histories (
                    uuid,
                    name,
                    priority,
                    finish_time,
                    tomatoes,
                    interrupts
                )
                SELECT uuid, name, priority, finish_time, tomatoes, interrupts
                FROM activities
                WHERE finish_time IS NOT NULL AND finish_time < ?1;",
                [cutoff_ms],
            )?;
            let archived = tx.execute(
                "DELETE FROM activities WHERE finish_time IS NOT NULL AND finish_time < ?1;",
                [cutoff_ms],
            )?;
            tx.commit()?;

            info!("event=activities_archive module=repo status=ok archived={archived}");
            Ok(archived)
        })
    }

    fn close(&self) -> RepoResult<()> {
        let Some(conn) = self.conn.borrow_mut().take() else {
            return Ok(());
        };
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=repo status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!("event=db_close module=repo status=error error={err}");
                Err(err.into())
            }
        }
    }

    fn list_tomatoes(&self, start: NaiveDateTime, end: NaiveDateTime) -> RepoResult<Vec<Tomato>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{TOMATO_SELECT_SQL}
                 WHERE start_time >= ?1 AND start_time < ?2
                 ORDER BY start_time ASC, uuid ASC;"
            ))?;
            let mut rows = stmt.query([to_epoch_ms(start), to_epoch_ms(end)])?;
            let mut tomatoes = Vec::new();
            while let Some(row) = rows.next()? {
                tomatoes.push(parse_tomato_row(row)?);
            }
            Ok(tomatoes)
        })
    }

    fn save_tomato(&self, tomato: &Tomato) -> RepoResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tomatoes (
                    uuid,
                    activity_uuid,
                    activity_name,
                    start_time,
                    end_time,
                    state
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT (uuid) DO UPDATE SET
                    activity_uuid = excluded.activity_uuid,
                    activity_name = excluded.activity_name,
                    start_time = excluded.start_time,
                    end_time = excluded.end_time,
                    state = excluded.state;",
                params![
                    tomato.id.to_string(),
                    tomato.activity_id.map(|id| id.to_string()),
                    tomato.activity_name.as_str(),
                    to_epoch_ms(tomato.start_time),
                    tomato.end_time.map(to_epoch_ms),
                    tomato.state.as_db(),
                ],
            )?;
            Ok(())
        })
    }

    fn list_activity_histories(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<ActivityHistory>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{HISTORY_SELECT_SQL}
                 WHERE finish_time >= ?1 AND finish_time < ?2
                 ORDER BY finish_time ASC, uuid ASC;"
            ))?;
            let mut rows = stmt.query([to_epoch_ms(start), to_epoch_ms(end)])?;
            let mut histories = Vec::new();
            while let Some(row) = rows.next()? {
                histories.push(parse_history_row(row)?);
            }
            Ok(histories)
        })
    }

    fn list_finished_activities(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<Activity>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{ACTIVITY_SELECT_SQL}
                 WHERE finish_time >= ?1 AND finish_time < ?2
                 ORDER BY finish_time ASC, rowid ASC;"
            ))?;
            let mut rows = stmt.query([to_epoch_ms(start), to_epoch_ms(end)])?;
            let mut activities = Vec::new();
            while let Some(row) = rows.next()? {
                activities.push(parse_activity_row(row)?);
            }
            Ok(activities)
        })
    }

    fn statistics_tomato_count(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<DailyTomatoCount>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT
                    (start_time - (((start_time % 86400000) + 86400000) % 86400000)) / 86400000
                        AS day,
                    COUNT(*) AS count
                 FROM tomatoes
                 WHERE state = ?1 AND start_time >= ?2 AND start_time <= ?3
                 GROUP BY day
                 ORDER BY day ASC;",
            )?;
            let mut rows = stmt.query(params![
                TomatoState::Finished.as_db(),
                to_epoch_ms(start),
                to_epoch_ms(end),
            ])?;
            let mut counts = Vec::new();
            while let Some(row) = rows.next()? {
                let day_number: i64 = row.get("day")?;
                let day = from_epoch_day(day_number).ok_or_else(|| {
                    RepoError::InvalidData(format!("day number `{day_number}` is out of range"))
                })?;
                counts.push(DailyTomatoCount {
                    day: day.date(),
                    count: row.get("count")?,
                });
            }
            Ok(counts)
        })
    }
}

fn parse_uuid(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

fn parse_priority(row: &Row<'_>) -> RepoResult<Priority> {
    let text: String = row.get("priority")?;
    Priority::from_db(&text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid priority `{text}`")))
}

fn parse_timestamp(value: i64, column: &str) -> RepoResult<NaiveDateTime> {
    from_epoch_ms(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` in {column} is out of range"))
    })
}

fn parse_optional_timestamp(row: &Row<'_>, column: &str) -> RepoResult<Option<NaiveDateTime>> {
    match row.get::<_, Option<i64>>(column)? {
        Some(value) => Ok(Some(parse_timestamp(value, column)?)),
        None => Ok(None),
    }
}

fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    Ok(Activity {
        id: parse_uuid(row, "uuid")?,
        name: row.get("name")?,
        priority: parse_priority(row)?,
        finish_time: parse_optional_timestamp(row, "finish_time")?,
        tomatoes: row.get("tomatoes")?,
        interrupts: row.get("interrupts")?,
    })
}

fn parse_history_row(row: &Row<'_>) -> RepoResult<ActivityHistory> {
    Ok(ActivityHistory {
        id: parse_uuid(row, "uuid")?,
        name: row.get("name")?,
        priority: parse_priority(row)?,
        finish_time: parse_timestamp(row.get("finish_time")?, "finish_time")?,
        tomatoes: row.get("tomatoes")?,
        interrupts: row.get("interrupts")?,
    })
}

fn parse_tomato_row(row: &Row<'_>) -> RepoResult<Tomato> {
    let activity_id = match row.get::<_, Option<String>>("activity_uuid")? {
        Some(text) => Some(Uuid::parse_str(&text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{text}` in activity_uuid"))
        })?),
        None => None,
    };

    let state_text: String = row.get("state")?;
    let state = TomatoState::from_db(&state_text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid tomato state `{state_text}`")))?;

    Ok(Tomato {
        id: parse_uuid(row, "uuid")?,
        activity_id,
        activity_name: row.get("activity_name")?,
        start_time: parse_timestamp(row.get("start_time")?, "start_time")?,
        end_time: parse_optional_timestamp(row, "end_time")?,
        state,
    })
}
