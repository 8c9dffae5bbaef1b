//! Agenda entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-user agenda entries (manual and meeting projections).
//! - Provide user/date/window lookups used by availability checks.
//!
//! # Invariants
//! - Write paths call `AgendaEntry::validate()` before SQL mutations.
//! - Window lookups select entries intersecting `[start, end)` on full
//!   instants, so an entry crossing midnight is found from either date.
//! - Listings are ordered by `start_at ASC, entry_uuid ASC`.

use crate::model::agenda::{AgendaEntry, AgendaEntryId, AgendaStatus};
use crate::model::meeting::MeetingId;
use crate::model::user::UserId;
use crate::model::window::TimeWindow;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::store::{format_instant, parse_instant, parse_uuid, SqliteStore, Store};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    entry_uuid,
    user_uuid,
    meeting_uuid,
    start_at,
    end_at,
    status
FROM agenda_entries";

const ENTRY_ORDER_SQL: &str = "ORDER BY start_at ASC, entry_uuid ASC";

/// Repository interface for agenda entries.
pub trait AgendaRepository {
    fn create_entry(&self, entry: &AgendaEntry) -> RepoResult<AgendaEntryId>;
    fn update_entry(&self, entry: &AgendaEntry) -> RepoResult<()>;
    fn get_entry(&self, id: AgendaEntryId) -> RepoResult<Option<AgendaEntry>>;
    fn entries_by_user(&self, user_id: UserId) -> RepoResult<Vec<AgendaEntry>>;
    /// Entries of `user_id` intersecting `window`.
    fn entries_by_user_between(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> RepoResult<Vec<AgendaEntry>>;
    fn entries_by_meeting(&self, meeting_id: MeetingId) -> RepoResult<Vec<AgendaEntry>>;
    /// Deletes the given entries; returns how many rows were removed.
    fn delete_entries(&self, ids: &[AgendaEntryId]) -> RepoResult<usize>;

    /// Entries of `user_id` intersecting the calendar day `date`.
    fn entries_by_user_and_date(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> RepoResult<Vec<AgendaEntry>> {
        self.entries_by_user_between(user_id, &TimeWindow::for_day(date))
    }
}

impl AgendaRepository for SqliteStore<'_> {
    fn create_entry(&self, entry: &AgendaEntry) -> RepoResult<AgendaEntryId> {
        entry.validate()?;

        self.conn().execute(
            "INSERT INTO agenda_entries (
                entry_uuid,
                user_uuid,
                meeting_uuid,
                start_at,
                end_at,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                entry.id.to_string(),
                entry.user_id.to_string(),
                entry.meeting_id.map(|value| value.to_string()),
                format_instant(entry.start),
                format_instant(entry.end),
                status_to_db(entry.status),
            ],
        )?;

        Ok(entry.id)
    }

    fn update_entry(&self, entry: &AgendaEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn().execute(
            "UPDATE agenda_entries
             SET
                start_at = ?2,
                end_at = ?3,
                status = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE entry_uuid = ?1;",
            params![
                entry.id.to_string(),
                format_instant(entry.start),
                format_instant(entry.end),
                status_to_db(entry.status),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::entry_not_found(entry.id));
        }

        Ok(())
    }

    fn get_entry(&self, id: AgendaEntryId) -> RepoResult<Option<AgendaEntry>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE entry_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn entries_by_user(&self, user_id: UserId) -> RepoResult<Vec<AgendaEntry>> {
        self.query_entries(
            &format!("{ENTRY_SELECT_SQL} WHERE user_uuid = ? {ENTRY_ORDER_SQL};"),
            vec![Value::Text(user_id.to_string())],
        )
    }

    fn entries_by_user_between(
        &self,
        user_id: UserId,
        window: &TimeWindow,
    ) -> RepoResult<Vec<AgendaEntry>> {
        self.query_entries(
            &format!(
                "{ENTRY_SELECT_SQL}
                 WHERE user_uuid = ?
                   AND start_at < ?
                   AND end_at > ?
                 {ENTRY_ORDER_SQL};"
            ),
            vec![
                Value::Text(user_id.to_string()),
                Value::Text(format_instant(window.end())),
                Value::Text(format_instant(window.start())),
            ],
        )
    }

    fn entries_by_meeting(&self, meeting_id: MeetingId) -> RepoResult<Vec<AgendaEntry>> {
        self.query_entries(
            &format!("{ENTRY_SELECT_SQL} WHERE meeting_uuid = ? {ENTRY_ORDER_SQL};"),
            vec![Value::Text(meeting_id.to_string())],
        )
    }

    fn delete_entries(&self, ids: &[AgendaEntryId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        self.atomically(|store| -> RepoResult<usize> {
            let mut stmt = store
                .conn()
                .prepare("DELETE FROM agenda_entries WHERE entry_uuid = ?1;")?;
            let mut removed = 0;
            for id in ids {
                removed += stmt.execute([id.to_string()])?;
            }
            Ok(removed)
        })
    }
}

impl SqliteStore<'_> {
    fn query_entries(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<AgendaEntry>> {
        let mut stmt = self.conn().prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<AgendaEntry> {
    let id_text: String = row.get("entry_uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let meeting_id = row
        .get::<_, Option<String>>("meeting_uuid")?
        .map(|value| parse_uuid(&value, "agenda_entries.meeting_uuid"))
        .transpose()?;
    let start_text: String = row.get("start_at")?;
    let end_text: String = row.get("end_at")?;
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid agenda status `{status_text}` in agenda_entries.status"
        ))
    })?;

    let entry = AgendaEntry {
        id: parse_uuid(&id_text, "agenda_entries.entry_uuid")?,
        user_id: parse_uuid(&user_text, "agenda_entries.user_uuid")?,
        meeting_id,
        start: parse_instant(&start_text, "agenda_entries.start_at")?,
        end: parse_instant(&end_text, "agenda_entries.end_at")?,
        status,
    };
    entry.validate()?;
    Ok(entry)
}

fn status_to_db(status: AgendaStatus) -> &'static str {
    match status {
        AgendaStatus::Free => "free",
        AgendaStatus::Busy => "busy",
    }
}

fn parse_status(value: &str) -> Option<AgendaStatus> {
    match value {
        "free" => Some(AgendaStatus::Free),
        "busy" => Some(AgendaStatus::Busy),
        _ => None,
    }
}
