//! Agenda entry domain model.
//!
//! # Responsibility
//! - Define per-user calendar records marking a window as free or busy.
//! - Expose the calendar-date / time-of-day projection of an entry.
//!
//! # Invariants
//! - `start < end`.
//! - Entries with `meeting_id = Some(_)` are BUSY projections owned by the
//!   agenda projector; one per (meeting, user).
//! - Entries store full instants, so windows crossing midnight stay exact.

use crate::model::meeting::{Meeting, MeetingId};
use crate::model::user::UserId;
use crate::model::window::{TimeRangeError, TimeWindow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an agenda entry.
pub type AgendaEntryId = Uuid;

/// Occupancy state of an agenda window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgendaStatus {
    Free,
    Busy,
}

/// One per-user calendar record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub id: AgendaEntryId,
    pub user_id: UserId,
    /// Provenance back-reference; `None` for manually created entries.
    pub meeting_id: Option<MeetingId>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: AgendaStatus,
}

impl AgendaEntry {
    /// Creates a manual entry not tied to any meeting.
    pub fn manual(user_id: UserId, window: TimeWindow, status: AgendaStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            meeting_id: None,
            start: window.start(),
            end: window.end(),
            status,
        }
    }

    /// Creates the BUSY projection of `meeting` for one involved user.
    pub fn busy_for_meeting(user_id: UserId, meeting: &Meeting) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            meeting_id: Some(meeting.id),
            start: meeting.start,
            end: meeting.end,
            status: AgendaStatus::Busy,
        }
    }

    /// Calendar date the entry starts on.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start.time()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end.time()
    }

    pub fn window(&self) -> Result<TimeWindow, TimeRangeError> {
        TimeWindow::new(self.start, self.end)
    }

    pub fn validate(&self) -> Result<(), TimeRangeError> {
        self.window().map(|_| ())
    }

    pub fn is_busy(&self) -> bool {
        self.status == AgendaStatus::Busy
    }

    /// Returns whether this entry is BUSY and overlaps `window`.
    pub fn blocks(&self, window: &TimeWindow) -> bool {
        self.is_busy()
            && self
                .window()
                .map(|own| own.overlaps(window))
                .unwrap_or(false)
    }
}
