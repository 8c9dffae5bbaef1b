//! Typed failures surfaced by scheduling services.
//!
//! Boundary layers map each kind to a transport status; the core only
//! guarantees the kind plus the ids/window needed for a useful message.

use crate::model::agenda::AgendaEntryId;
use crate::model::meeting::MeetingId;
use crate::model::user::UserId;
use crate::model::window::{TimeRangeError, TimeWindow};
use crate::repo::error::{RepoError, ResourceKind};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Service error for scheduling, availability and agenda use-cases.
#[derive(Debug)]
pub enum SchedulingError {
    /// Referenced user, meeting or agenda entry does not exist.
    NotFound { kind: ResourceKind, id: Uuid },
    /// Proposed window has `start >= end`.
    InvalidTimeRange(TimeRangeError),
    /// `user_id` already has meeting `meeting_id` overlapping the proposal.
    SchedulingConflict {
        user_id: UserId,
        meeting_id: MeetingId,
        window: TimeWindow,
    },
    /// Record id already taken. Only raised by user registration.
    DuplicateResource { kind: ResourceKind, id: Uuid },
    /// Agenda entry is a meeting projection; only meeting mutations change it.
    ProjectedEntry {
        entry_id: AgendaEntryId,
        meeting_id: MeetingId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for SchedulingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidTimeRange(err) => write!(f, "{err}"),
            Self::SchedulingConflict {
                user_id,
                meeting_id,
                window,
            } => write!(
                f,
                "user {user_id} already has meeting {meeting_id} scheduled between {} and {}",
                window.start(),
                window.end()
            ),
            Self::DuplicateResource { kind, id } => write!(f, "{kind} already exists: {id}"),
            Self::ProjectedEntry {
                entry_id,
                meeting_id,
            } => write!(
                f,
                "agenda entry {entry_id} belongs to meeting {meeting_id} and cannot be edited directly"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SchedulingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTimeRange(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TimeRangeError> for SchedulingError {
    fn from(value: TimeRangeError) -> Self {
        Self::InvalidTimeRange(value)
    }
}

impl From<RepoError> for SchedulingError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::Duplicate { kind, id } => Self::DuplicateResource { kind, id },
            RepoError::Validation(err) => Self::InvalidTimeRange(err),
            other => Self::Repo(other),
        }
    }
}

impl SchedulingError {
    /// Stable snake_case code for log lines and boundary mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidTimeRange(_) => "invalid_time_range",
            Self::SchedulingConflict { .. } => "scheduling_conflict",
            Self::DuplicateResource { .. } => "duplicate_resource",
            Self::ProjectedEntry { .. } => "projected_entry",
            Self::Repo(_) => "storage_error",
        }
    }
}
