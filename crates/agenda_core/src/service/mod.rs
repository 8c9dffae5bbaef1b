//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into scheduling use-cases.
//! - Keep boundary layers decoupled from storage details.
//!
//! # Invariants
//! - Services depend on repository traits only, never on SQLite types.
//! - Every mutating use-case runs inside one `Store::atomically` unit.

pub mod agenda_projector;
pub mod agenda_service;
pub mod availability;
pub mod conflict_checker;
pub mod error;
pub mod scheduler;
pub mod user_service;

use crate::model::meeting::{Meeting, MeetingId};
use crate::model::user::{User, UserId};
use crate::repo::error::{RepoError, ResourceKind};
use crate::repo::meeting_repo::MeetingRepository;
use crate::repo::user_repo::UserRepository;
use error::{SchedulingError, SchedulingResult};
use log::{info, warn};
use std::time::Instant;

pub(crate) fn require_user<R: UserRepository + ?Sized>(
    repo: &R,
    user_id: UserId,
) -> SchedulingResult<User> {
    repo.get_user(user_id)?
        .ok_or_else(|| RepoError::user_not_found(user_id).into())
}

pub(crate) fn require_meeting<R: MeetingRepository + ?Sized>(
    repo: &R,
    meeting_id: MeetingId,
) -> SchedulingResult<Meeting> {
    repo.get_meeting(meeting_id)?
        .ok_or(SchedulingError::NotFound {
            kind: ResourceKind::Meeting,
            id: meeting_id,
        })
}

/// Emits the ok/error line for one use-case call and passes `result` through.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    module: &'static str,
    started_at: Instant,
    result: SchedulingResult<T>,
) -> SchedulingResult<T> {
    match &result {
        Ok(_) => info!(
            "event={} module={} status=ok duration_ms={}",
            event,
            module,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={} module={} status=error duration_ms={} error_code={} error={}",
            event,
            module,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}
