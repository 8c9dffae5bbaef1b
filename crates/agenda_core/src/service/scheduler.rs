//! Meeting scheduling use-cases.
//!
//! # Responsibility
//! - Validate proposed meetings against every involved user's commitments.
//! - Commit a meeting together with its agenda projections.
//! - Apply field and participant mutations while keeping projections in
//!   step.
//!
//! # Invariants
//! - A meeting moves proposed -> validated -> persisted -> projected inside
//!   one `Store::atomically` unit; any failure leaves no partial writes.
//! - `start < end` for every meeting written.
//! - Conflict checks fail fast: organizer first, then participants in
//!   request order; the first conflict wins.
//! - The organizer is never stored in `participants`.
//! - After every successful mutation each involved user holds exactly one
//!   BUSY entry for the meeting.

use crate::model::meeting::{Meeting, MeetingId};
use crate::model::user::UserId;
use crate::model::window::TimeWindow;
use crate::repo::store::Store;
use crate::service::agenda_projector::AgendaProjector;
use crate::service::conflict_checker::ConflictChecker;
use crate::service::error::{SchedulingError, SchedulingResult};
use crate::service::{log_outcome, require_meeting, require_user};
use chrono::NaiveDateTime;
use log::debug;
use std::time::Instant;

const MODULE: &str = "scheduler";

/// Request model for proposing a new meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeeting {
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub organizer_id: UserId,
    /// Invitees; duplicates and the organizer's own id are ignored.
    pub participant_ids: Vec<UserId>,
}

/// Replacement values for the mutable meeting fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingUpdate {
    pub title: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Scheduling service over a transactional store.
pub struct Scheduler<S: Store> {
    store: S,
}

impl<S: Store> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and commits a new meeting plus one BUSY entry per
    /// involved user.
    ///
    /// # Errors
    /// - `InvalidTimeRange` when `start >= end`.
    /// - `NotFound` for an unknown organizer or participant.
    /// - `SchedulingConflict` naming the first user whose commitments
    ///   overlap the proposal.
    pub fn create_meeting(&self, request: &NewMeeting) -> SchedulingResult<Meeting> {
        let started_at = Instant::now();
        let result = TimeWindow::new(request.start, request.end)
            .map_err(SchedulingError::from)
            .and_then(|window| {
                self.store
                    .atomically(|store| commit_new_meeting(store, request, window))
            });
        if let Ok(meeting) = &result {
            debug!(
                "event=meeting_create module=scheduler status=committed meeting_id={} participants={}",
                meeting.id,
                meeting.participants.len()
            );
        }
        log_outcome("meeting_create", MODULE, started_at, result)
    }

    /// Overwrites title, description and window of an existing meeting.
    ///
    /// The new window is re-checked against every involved user's other
    /// meetings, and their agenda entries are moved to it.
    pub fn update_meeting(
        &self,
        meeting_id: MeetingId,
        update: &MeetingUpdate,
    ) -> SchedulingResult<Meeting> {
        let started_at = Instant::now();
        let result = self.store.atomically(|store| -> SchedulingResult<Meeting> {
            let mut meeting = require_meeting(store, meeting_id)?;
            let window = TimeWindow::new(update.start, update.end)?;

            let checker = ConflictChecker::new(store);
            for user_id in meeting.involved_users() {
                ensure_free(&checker, user_id, &window, Some(meeting.id))?;
            }

            meeting.title = update.title.clone();
            meeting.description = update.description.clone();
            meeting.start = window.start();
            meeting.end = window.end();
            store.update_meeting(&meeting)?;
            AgendaProjector::new(store).sync(&meeting)?;
            Ok(meeting)
        });
        log_outcome("meeting_update", MODULE, started_at, result)
    }

    /// Invites `user_id` to an existing meeting.
    ///
    /// Idempotent: inviting an already involved user (participant or
    /// organizer) returns the meeting unchanged. A new participant goes
    /// through the same conflict check and projection as at creation.
    pub fn add_participant(
        &self,
        meeting_id: MeetingId,
        user_id: UserId,
    ) -> SchedulingResult<Meeting> {
        let started_at = Instant::now();
        let result = self.store.atomically(|store| -> SchedulingResult<Meeting> {
            let mut meeting = require_meeting(store, meeting_id)?;
            let user = require_user(store, user_id)?;
            if meeting.involves(user.id) {
                debug!(
                    "event=participant_add module=scheduler status=noop meeting_id={} user_id={}",
                    meeting.id, user.id
                );
                return Ok(meeting);
            }

            let window = meeting.window()?;
            ensure_free(&ConflictChecker::new(store), user.id, &window, Some(meeting.id))?;
            meeting.participants.insert(user.id);
            store.update_meeting(&meeting)?;
            AgendaProjector::new(store).project(user.id, &meeting)?;
            Ok(meeting)
        });
        log_outcome("participant_add", MODULE, started_at, result)
    }

    /// Removes `user_id` from the participant set and drops their entry.
    ///
    /// Idempotent: removing a non-participant returns the meeting unchanged.
    pub fn remove_participant(
        &self,
        meeting_id: MeetingId,
        user_id: UserId,
    ) -> SchedulingResult<Meeting> {
        let started_at = Instant::now();
        let result = self.store.atomically(|store| -> SchedulingResult<Meeting> {
            let mut meeting = require_meeting(store, meeting_id)?;
            let user = require_user(store, user_id)?;
            if meeting.participants.remove(&user.id) {
                store.update_meeting(&meeting)?;
                AgendaProjector::new(store).retract(meeting.id, user.id)?;
            }
            Ok(meeting)
        });
        log_outcome("participant_remove", MODULE, started_at, result)
    }

    /// Deletes a meeting together with every agenda entry projected from it.
    pub fn delete_meeting(&self, meeting_id: MeetingId) -> SchedulingResult<()> {
        let started_at = Instant::now();
        let result = self.store.atomically(|store| -> SchedulingResult<()> {
            let meeting = require_meeting(store, meeting_id)?;
            AgendaProjector::new(store).retract_all(meeting.id)?;
            store.delete_meeting(meeting.id)?;
            Ok(())
        });
        log_outcome("meeting_delete", MODULE, started_at, result)
    }

    /// Loads one meeting by id.
    pub fn get_meeting(&self, meeting_id: MeetingId) -> SchedulingResult<Meeting> {
        require_meeting(&self.store, meeting_id)
    }

    /// Lists every meeting ordered by start.
    pub fn list_meetings(&self) -> SchedulingResult<Vec<Meeting>> {
        Ok(self.store.list_meetings()?)
    }

    /// Lists meetings organized by a known user.
    pub fn meetings_by_organizer(&self, user_id: UserId) -> SchedulingResult<Vec<Meeting>> {
        require_user(&self.store, user_id)?;
        Ok(self.store.meetings_by_organizer(user_id)?)
    }

    /// Lists meetings a known user participates in.
    pub fn meetings_by_participant(&self, user_id: UserId) -> SchedulingResult<Vec<Meeting>> {
        require_user(&self.store, user_id)?;
        Ok(self.store.meetings_by_participant(user_id)?)
    }

    /// Lists meetings a known user organizes or participates in, by start.
    pub fn meetings_for_user(&self, user_id: UserId) -> SchedulingResult<Vec<Meeting>> {
        require_user(&self.store, user_id)?;
        let mut meetings: Vec<Meeting> = ConflictChecker::new(&self.store)
            .commitments(user_id)?
            .into_values()
            .collect();
        meetings.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        Ok(meetings)
    }
}

fn commit_new_meeting<S: Store>(
    store: &S,
    request: &NewMeeting,
    window: TimeWindow,
) -> SchedulingResult<Meeting> {
    let organizer = require_user(store, request.organizer_id)?;
    let checker = ConflictChecker::new(store);
    ensure_free(&checker, organizer.id, &window, None)?;

    let mut meeting = Meeting::new(
        request.title.clone(),
        request.description.clone(),
        window,
        organizer.id,
    );
    for &participant_id in &request.participant_ids {
        if meeting.involves(participant_id) {
            continue;
        }
        let participant = require_user(store, participant_id)?;
        ensure_free(&checker, participant.id, &window, None)?;
        meeting.participants.insert(participant.id);
    }

    store.create_meeting(&meeting)?;

    let projector = AgendaProjector::new(store);
    for user_id in meeting.involved_users() {
        projector.project(user_id, &meeting)?;
    }

    Ok(meeting)
}

fn ensure_free<S: Store>(
    checker: &ConflictChecker<'_, S>,
    user_id: UserId,
    window: &TimeWindow,
    ignore: Option<MeetingId>,
) -> SchedulingResult<()> {
    match checker.find_conflict(user_id, window, ignore)? {
        Some(existing) => Err(SchedulingError::SchedulingConflict {
            user_id,
            meeting_id: existing.id,
            window: existing.window()?,
        }),
        None => Ok(()),
    }
}
