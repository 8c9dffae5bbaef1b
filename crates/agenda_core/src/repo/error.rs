//! Repository error model shared by all scheduling repositories.

use crate::db::DbError;
use crate::model::window::TimeRangeError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Kind of record a lookup or write refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Meeting,
    AgendaEntry,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Meeting => "meeting",
            Self::AgendaEntry => "agenda entry",
        };
        f.write_str(label)
    }
}

/// Generic repository error for scheduling persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Write rejected by model validation.
    Validation(TimeRangeError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target record does not exist.
    NotFound { kind: ResourceKind, id: Uuid },
    /// A record with the same id already exists.
    Duplicate { kind: ResourceKind, id: Uuid },
    /// Persisted data cannot be converted to a valid model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl RepoError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: ResourceKind::User,
            id,
        }
    }

    pub fn meeting_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: ResourceKind::Meeting,
            id,
        }
    }

    pub fn entry_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: ResourceKind::AgendaEntry,
            id,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Duplicate { kind, id } => write!(f, "{kind} already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "scheduling store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Duplicate { .. } => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<TimeRangeError> for RepoError {
    fn from(value: TimeRangeError) -> Self {
        Self::Validation(value)
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
