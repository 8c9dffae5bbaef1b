//! Read-only availability checks.
//!
//! Compares full instants, so a window crossing midnight is checked against
//! commitments on both calendar dates.

use crate::model::agenda::AgendaEntry;
use crate::model::user::UserId;
use crate::model::window::TimeWindow;
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::error::SchedulingResult;
use crate::service::require_user;
use chrono::NaiveDateTime;
use log::debug;

/// Availability query over user and agenda repositories.
pub struct AvailabilityQuery<S: UserRepository + AgendaRepository> {
    store: S,
}

impl<S: UserRepository + AgendaRepository> AvailabilityQuery<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns true iff no BUSY entry of `user_id` overlaps `[start, end)`.
    ///
    /// # Errors
    /// - `NotFound` for an unknown user.
    /// - `InvalidTimeRange` when `start >= end`.
    pub fn is_available(
        &self,
        user_id: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> SchedulingResult<bool> {
        let blocking = self.blocking_entries(user_id, start, end)?;
        debug!(
            "event=availability_check module=availability status=ok user_id={} blocking={}",
            user_id,
            blocking.len()
        );
        Ok(blocking.is_empty())
    }

    /// BUSY entries of `user_id` overlapping `[start, end)`, by start.
    pub fn blocking_entries(
        &self,
        user_id: UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> SchedulingResult<Vec<AgendaEntry>> {
        require_user(&self.store, user_id)?;
        let window = TimeWindow::new(start, end)?;
        Ok(self
            .store
            .entries_by_user_between(user_id, &window)?
            .into_iter()
            .filter(|entry| entry.blocks(&window))
            .collect())
    }
}
