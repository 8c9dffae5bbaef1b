//! Conflict detection over a user's existing meeting commitments.
//!
//! # Responsibility
//! - Decide whether a proposed window overlaps a meeting the user organizes
//!   or participates in.
//!
//! # Invariants
//! - Read-only: never writes to the store.
//! - Commitments are the union of organizer and participant lookups, keyed
//!   by meeting id.
//! - When several meetings overlap, the earliest (by start, then id) is
//!   reported.

use crate::model::meeting::{Meeting, MeetingId};
use crate::model::user::UserId;
use crate::model::window::TimeWindow;
use crate::repo::error::RepoResult;
use crate::repo::meeting_repo::MeetingRepository;
use std::collections::BTreeMap;

/// Read-only conflict checker borrowing a meeting repository.
pub struct ConflictChecker<'a, R: MeetingRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: MeetingRepository + ?Sized> ConflictChecker<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Returns whether `window` overlaps any commitment of `user_id`.
    pub fn has_conflict(&self, user_id: UserId, window: &TimeWindow) -> RepoResult<bool> {
        Ok(self.find_conflict(user_id, window, None)?.is_some())
    }

    /// Returns the first commitment of `user_id` overlapping `window`.
    ///
    /// `ignore` excludes one meeting, used when re-validating a meeting
    /// against everything except itself.
    pub fn find_conflict(
        &self,
        user_id: UserId,
        window: &TimeWindow,
        ignore: Option<MeetingId>,
    ) -> RepoResult<Option<Meeting>> {
        let mut overlapping: Vec<Meeting> = self
            .commitments(user_id)?
            .into_values()
            .filter(|meeting| Some(meeting.id) != ignore)
            .filter(|meeting| {
                meeting
                    .window()
                    .map(|existing| existing.overlaps(window))
                    .unwrap_or(false)
            })
            .collect();
        overlapping.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
        Ok(overlapping.into_iter().next())
    }

    /// Meetings `user_id` organizes or participates in.
    pub fn commitments(&self, user_id: UserId) -> RepoResult<BTreeMap<MeetingId, Meeting>> {
        let mut commitments = BTreeMap::new();
        for meeting in self
            .repo
            .meetings_by_organizer(user_id)?
            .into_iter()
            .chain(self.repo.meetings_by_participant(user_id)?)
        {
            commitments.entry(meeting.id).or_insert(meeting);
        }
        Ok(commitments)
    }
}
