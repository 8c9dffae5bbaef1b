//! Manual agenda entry use-cases.
//!
//! # Responsibility
//! - Create, read, update and delete per-user agenda entries that are not
//!   tied to a meeting.
//! - List a user's entries overall, per day, or across a date range.
//!
//! # Invariants
//! - Every write validates `start < end` and that the owning user exists.
//! - Entries projected from a meeting are read-only here; they change only
//!   through the scheduler.

use crate::model::agenda::{AgendaEntry, AgendaEntryId, AgendaStatus};
use crate::model::user::UserId;
use crate::model::window::TimeWindow;
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::error::RepoError;
use crate::repo::user_repo::UserRepository;
use crate::service::error::{SchedulingError, SchedulingResult};
use crate::service::{log_outcome, require_user};
use chrono::{NaiveDate, NaiveDateTime};
use std::time::Instant;

const MODULE: &str = "agenda";

/// Agenda service facade over user and agenda repositories.
pub struct AgendaService<S: UserRepository + AgendaRepository> {
    store: S,
}

impl<S: UserRepository + AgendaRepository> AgendaService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates one manual entry for a known user.
    pub fn create_entry(
        &self,
        user_id: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: AgendaStatus,
    ) -> SchedulingResult<AgendaEntry> {
        let started_at = Instant::now();
        let result = require_user(&self.store, user_id).and_then(|user| {
            let entry = AgendaEntry::manual(user.id, TimeWindow::new(start, end)?, status);
            self.store.create_entry(&entry)?;
            Ok(entry)
        });
        log_outcome("agenda_create", MODULE, started_at, result)
    }

    pub fn get_entry(&self, id: AgendaEntryId) -> SchedulingResult<AgendaEntry> {
        Ok(self
            .store
            .get_entry(id)?
            .ok_or_else(|| RepoError::entry_not_found(id))?)
    }

    pub fn entries_for_user(&self, user_id: UserId) -> SchedulingResult<Vec<AgendaEntry>> {
        require_user(&self.store, user_id)?;
        Ok(self.store.entries_by_user(user_id)?)
    }

    /// Entries intersecting the calendar day `date`.
    pub fn entries_for_user_on(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> SchedulingResult<Vec<AgendaEntry>> {
        require_user(&self.store, user_id)?;
        Ok(self.store.entries_by_user_and_date(user_id, date)?)
    }

    /// Entries intersecting the inclusive date range `from..=to`.
    pub fn entries_for_user_between(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SchedulingResult<Vec<AgendaEntry>> {
        require_user(&self.store, user_id)?;
        let window = TimeWindow::for_days(from, to)?;
        Ok(self.store.entries_by_user_between(user_id, &window)?)
    }

    /// Replaces the window and status of an existing manual entry.
    pub fn update_entry(
        &self,
        id: AgendaEntryId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: AgendaStatus,
    ) -> SchedulingResult<AgendaEntry> {
        let started_at = Instant::now();
        let result = self.get_manual_entry(id).and_then(|mut entry| {
            let window = TimeWindow::new(start, end)?;
            entry.start = window.start();
            entry.end = window.end();
            entry.status = status;
            self.store.update_entry(&entry)?;
            Ok(entry)
        });
        log_outcome("agenda_update", MODULE, started_at, result)
    }

    pub fn delete_entry(&self, id: AgendaEntryId) -> SchedulingResult<()> {
        let started_at = Instant::now();
        let result = self.get_manual_entry(id).and_then(|entry| {
            self.store.delete_entries(&[entry.id])?;
            Ok(())
        });
        log_outcome("agenda_delete", MODULE, started_at, result)
    }

    fn get_manual_entry(&self, id: AgendaEntryId) -> SchedulingResult<AgendaEntry> {
        let entry = self.get_entry(id)?;
        match entry.meeting_id {
            Some(meeting_id) => Err(SchedulingError::ProjectedEntry {
                entry_id: entry.id,
                meeting_id,
            }),
            None => Ok(entry),
        }
    }
}
