//! Meeting repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist meetings together with their participant membership rows.
//! - Answer "meetings by organizer" and "meetings by participant" lookups.
//!
//! # Invariants
//! - Write paths call `Meeting::validate()` before SQL mutations.
//! - A meeting row and its participant rows are written atomically.
//! - Listings are ordered by `start_at ASC, meeting_uuid ASC`.

use crate::model::meeting::{Meeting, MeetingId};
use crate::model::user::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::store::{format_instant, parse_instant, parse_uuid, SqliteStore, Store};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;

const MEETING_SELECT_SQL: &str = "SELECT
    m.meeting_uuid AS meeting_uuid,
    m.title AS title,
    m.description AS description,
    m.start_at AS start_at,
    m.end_at AS end_at,
    m.organizer_uuid AS organizer_uuid
FROM meetings m";

const MEETING_ORDER_SQL: &str = "ORDER BY m.start_at ASC, m.meeting_uuid ASC";

/// Repository interface for meetings and participant membership.
pub trait MeetingRepository {
    fn create_meeting(&self, meeting: &Meeting) -> RepoResult<MeetingId>;
    /// Overwrites fields and replaces the full participant set.
    fn update_meeting(&self, meeting: &Meeting) -> RepoResult<()>;
    fn get_meeting(&self, id: MeetingId) -> RepoResult<Option<Meeting>>;
    fn list_meetings(&self) -> RepoResult<Vec<Meeting>>;
    fn meetings_by_organizer(&self, user_id: UserId) -> RepoResult<Vec<Meeting>>;
    fn meetings_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Meeting>>;
    /// Deletes the meeting and its participant rows.
    fn delete_meeting(&self, id: MeetingId) -> RepoResult<()>;
}

impl MeetingRepository for SqliteStore<'_> {
    fn create_meeting(&self, meeting: &Meeting) -> RepoResult<MeetingId> {
        meeting.validate()?;

        self.atomically(|store| -> RepoResult<()> {
            store.conn().execute(
                "INSERT INTO meetings (
                    meeting_uuid,
                    title,
                    description,
                    start_at,
                    end_at,
                    organizer_uuid
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    meeting.id.to_string(),
                    meeting.title.as_str(),
                    meeting.description.as_deref(),
                    format_instant(meeting.start),
                    format_instant(meeting.end),
                    meeting.organizer_id.to_string(),
                ],
            )?;
            replace_participants(store.conn(), meeting)
        })?;

        Ok(meeting.id)
    }

    fn update_meeting(&self, meeting: &Meeting) -> RepoResult<()> {
        meeting.validate()?;

        self.atomically(|store| -> RepoResult<()> {
            let changed = store.conn().execute(
                "UPDATE meetings
                 SET
                    title = ?2,
                    description = ?3,
                    start_at = ?4,
                    end_at = ?5,
                    organizer_uuid = ?6,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE meeting_uuid = ?1;",
                params![
                    meeting.id.to_string(),
                    meeting.title.as_str(),
                    meeting.description.as_deref(),
                    format_instant(meeting.start),
                    format_instant(meeting.end),
                    meeting.organizer_id.to_string(),
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::meeting_not_found(meeting.id));
            }

            replace_participants(store.conn(), meeting)
        })
    }

    fn get_meeting(&self, id: MeetingId) -> RepoResult<Option<Meeting>> {
        let mut meetings = query_meetings(
            self.conn(),
            &format!("{MEETING_SELECT_SQL} WHERE m.meeting_uuid = ?1;"),
            &id.to_string(),
        )?;
        Ok(meetings.pop())
    }

    fn list_meetings(&self) -> RepoResult<Vec<Meeting>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{MEETING_SELECT_SQL} {MEETING_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next()? {
            meetings.push(parse_meeting_row(self.conn(), row)?);
        }
        Ok(meetings)
    }

    fn meetings_by_organizer(&self, user_id: UserId) -> RepoResult<Vec<Meeting>> {
        query_meetings(
            self.conn(),
            &format!("{MEETING_SELECT_SQL} WHERE m.organizer_uuid = ?1 {MEETING_ORDER_SQL};"),
            &user_id.to_string(),
        )
    }

    fn meetings_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Meeting>> {
        query_meetings(
            self.conn(),
            &format!(
                "{MEETING_SELECT_SQL}
                 INNER JOIN meeting_participants p ON p.meeting_uuid = m.meeting_uuid
                 WHERE p.user_uuid = ?1
                 {MEETING_ORDER_SQL};"
            ),
            &user_id.to_string(),
        )
    }

    fn delete_meeting(&self, id: MeetingId) -> RepoResult<()> {
        let changed = self.conn().execute(
            "DELETE FROM meetings WHERE meeting_uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::meeting_not_found(id));
        }

        Ok(())
    }
}

fn query_meetings(conn: &Connection, sql: &str, key: &str) -> RepoResult<Vec<Meeting>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    let mut meetings = Vec::new();
    while let Some(row) = rows.next()? {
        meetings.push(parse_meeting_row(conn, row)?);
    }
    Ok(meetings)
}

fn replace_participants(conn: &Connection, meeting: &Meeting) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM meeting_participants WHERE meeting_uuid = ?1;",
        [meeting.id.to_string()],
    )?;

    let mut insert = conn.prepare(
        "INSERT INTO meeting_participants (meeting_uuid, user_uuid)
         VALUES (?1, ?2);",
    )?;
    for participant in &meeting.participants {
        insert.execute(params![meeting.id.to_string(), participant.to_string()])?;
    }

    Ok(())
}

fn load_participants(conn: &Connection, meeting_id: MeetingId) -> RepoResult<BTreeSet<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT user_uuid
         FROM meeting_participants
         WHERE meeting_uuid = ?1;",
    )?;
    let mut rows = stmt.query([meeting_id.to_string()])?;
    let mut participants = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        participants.insert(parse_uuid(&value, "meeting_participants.user_uuid")?);
    }
    Ok(participants)
}

fn parse_meeting_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Meeting> {
    let id_text: String = row.get("meeting_uuid")?;
    let id = parse_uuid(&id_text, "meetings.meeting_uuid")?;
    let organizer_text: String = row.get("organizer_uuid")?;
    let start_text: String = row.get("start_at")?;
    let end_text: String = row.get("end_at")?;

    let meeting = Meeting {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        start: parse_instant(&start_text, "meetings.start_at")?,
        end: parse_instant(&end_text, "meetings.end_at")?,
        organizer_id: parse_uuid(&organizer_text, "meetings.organizer_uuid")?,
        participants: load_participants(conn, id)?,
    };
    meeting.validate()?;
    Ok(meeting)
}
