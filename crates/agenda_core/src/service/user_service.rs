//! User registration and the user deletion cascade.
//!
//! # Responsibility
//! - Seed user references the scheduler can resolve.
//! - Delete a user without leaving meetings or agenda entries pointing at
//!   them.
//!
//! # Invariants
//! - Cascade order: participant links, own entries, organized meetings
//!   (with every entry projected from them), then the user row.
//! - The cascade is one atomic unit.

use crate::model::user::{User, UserId};
use crate::repo::store::Store;
use crate::service::agenda_projector::AgendaProjector;
use crate::service::error::SchedulingResult;
use crate::service::{log_outcome, require_user};
use log::info;
use std::time::Instant;

const MODULE: &str = "user";

/// Summary of what a user deletion removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Meetings the user was removed from as participant.
    pub meetings_left: usize,
    /// Agenda entries owned by the user.
    pub entries_deleted: usize,
    /// Meetings organized by the user.
    pub meetings_deleted: usize,
}

/// User use-case service over a transactional store.
pub struct UserService<S: Store> {
    store: S,
}

impl<S: Store> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a user with a generated id.
    pub fn register_user(&self, name: impl Into<String>) -> SchedulingResult<User> {
        let user = User::new(name);
        self.store.create_user(&user)?;
        Ok(user)
    }

    /// Registers a user under an id issued by the account component.
    ///
    /// # Errors
    /// - `DuplicateResource` when the id is already registered.
    pub fn register_user_with_id(
        &self,
        id: UserId,
        name: impl Into<String>,
    ) -> SchedulingResult<User> {
        let user = User::with_id(id, name);
        self.store.create_user(&user)?;
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> SchedulingResult<User> {
        require_user(&self.store, id)
    }

    /// Deletes a user and everything that references them.
    pub fn delete_user_cascade(&self, id: UserId) -> SchedulingResult<CascadeReport> {
        let started_at = Instant::now();
        let result = self.store.atomically(|store| -> SchedulingResult<CascadeReport> {
            let user = require_user(store, id)?;
            let mut report = CascadeReport::default();

            for mut meeting in store.meetings_by_participant(user.id)? {
                if meeting.participants.remove(&user.id) {
                    store.update_meeting(&meeting)?;
                    report.meetings_left += 1;
                }
            }

            let own_entries: Vec<_> = store
                .entries_by_user(user.id)?
                .into_iter()
                .map(|entry| entry.id)
                .collect();
            report.entries_deleted = store.delete_entries(&own_entries)?;

            let projector = AgendaProjector::new(store);
            for meeting in store.meetings_by_organizer(user.id)? {
                projector.retract_all(meeting.id)?;
                store.delete_meeting(meeting.id)?;
                report.meetings_deleted += 1;
            }

            store.delete_user(user.id)?;
            Ok(report)
        });

        if let Ok(report) = &result {
            info!(
                "event=user_cascade module=user status=ok user_id={} meetings_left={} entries_deleted={} meetings_deleted={}",
                id, report.meetings_left, report.entries_deleted, report.meetings_deleted
            );
        }
        log_outcome("user_delete", MODULE, started_at, result)
    }
}
