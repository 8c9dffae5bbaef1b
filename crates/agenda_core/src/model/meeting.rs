//! Meeting domain model.
//!
//! # Responsibility
//! - Define the meeting record and its participant membership set.
//!
//! # Invariants
//! - `start < end` for every persisted meeting.
//! - Exactly one organizer; participants are a set keyed by user id.
//! - The organizer is kept out of `participants` by the scheduler.

use crate::model::user::UserId;
use crate::model::window::{TimeRangeError, TimeWindow};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier of a meeting.
pub type MeetingId = Uuid;

/// Persisted meeting between one organizer and a participant set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub organizer_id: UserId,
    pub participants: BTreeSet<UserId>,
}

impl Meeting {
    /// Creates a meeting with a generated stable ID and no participants.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        window: TimeWindow,
        organizer_id: UserId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            start: window.start(),
            end: window.end(),
            organizer_id,
            participants: BTreeSet::new(),
        }
    }

    /// Returns the meeting window, validating `start < end`.
    pub fn window(&self) -> Result<TimeWindow, TimeRangeError> {
        TimeWindow::new(self.start, self.end)
    }

    /// Validates model invariants before persistence.
    pub fn validate(&self) -> Result<(), TimeRangeError> {
        self.window().map(|_| ())
    }

    /// Returns whether `user_id` organizes or participates in this meeting.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id || self.participants.contains(&user_id)
    }

    /// Organizer followed by participants in id order.
    pub fn involved_users(&self) -> Vec<UserId> {
        let mut users = Vec::with_capacity(self.participants.len() + 1);
        users.push(self.organizer_id);
        users.extend(
            self.participants
                .iter()
                .copied()
                .filter(|id| *id != self.organizer_id),
        );
        users
    }
}
