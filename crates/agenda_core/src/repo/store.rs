//! Store abstraction and SQLite-backed implementation.
//!
//! # Responsibility
//! - Combine the user/meeting/agenda repositories behind one handle.
//! - Own the transaction boundary used by scheduling services.
//! - Keep instant/uuid column encoding in one place.
//!
//! # Invariants
//! - `atomically` opens `BEGIN IMMEDIATE`: the write lock is held from the
//!   first read of a check-then-write sequence until commit.
//! - Nested `atomically` calls join the outer transaction.
//! - Instants are stored as fixed-width `YYYY-MM-DDTHH:MM:SS.fffffffff`
//!   text, so SQL string comparison equals chronological comparison.
//!   `TimeWindow` keeps every written instant within years `0000..=9999`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::meeting_repo::MeetingRepository;
use crate::repo::user_repo::UserRepository;
use chrono::NaiveDateTime;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

const INSTANT_WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";
const INSTANT_READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const REQUIRED_TABLES: [&str; 4] = ["users", "meetings", "meeting_participants", "agenda_entries"];

/// Full persistence surface required by scheduling services.
pub trait Store: UserRepository + MeetingRepository + AgendaRepository {
    /// Runs `work` as one atomic unit.
    ///
    /// Commits when `work` returns `Ok`; every write made inside is rolled
    /// back when it returns `Err` (or panics).
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed store over one migrated connection.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `InvalidData` when a required table is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

impl Store for SqliteStore<'_> {
    fn atomically<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        if !self.conn.is_autocommit() {
            return work(self);
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = work(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

pub(crate) fn format_instant(value: NaiveDateTime) -> String {
    value.format(INSTANT_WRITE_FORMAT).to_string()
}

pub(crate) fn parse_instant(value: &str, column: &'static str) -> RepoResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, INSTANT_READ_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid instant `{value}` in {column}")))
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn ensure_store_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::InvalidData(format!(
                "scheduling store requires table `{table}`"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{format_instant, parse_instant};
    use chrono::NaiveDate;

    #[test]
    fn instant_encoding_is_fixed_width_and_sortable() {
        let early = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 250)
            .unwrap();

        let early_text = format_instant(early);
        let late_text = format_instant(late);
        assert_eq!(early_text.len(), late_text.len());
        assert!(early_text < late_text);
        assert_eq!(parse_instant(&late_text, "test").unwrap(), late);
    }

    #[test]
    fn parse_instant_rejects_garbage() {
        assert!(parse_instant("yesterday", "meetings.start_at").is_err());
    }
}
