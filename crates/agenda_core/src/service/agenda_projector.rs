//! Derivation of per-user agenda entries from meetings.
//!
//! # Responsibility
//! - Create the BUSY entry an involved user gets for a meeting.
//! - Keep those entries in step with meeting mutations.
//!
//! # Invariants
//! - At most one projected entry per (meeting id, user id); `sync` restores
//!   exactly one for every involved user and none for anyone else.
//! - Projected entries copy the meeting's full start/end instants.
//! - Manual entries (`meeting_id = None`) are never touched.

use crate::model::agenda::{AgendaEntry, AgendaStatus};
use crate::model::meeting::{Meeting, MeetingId};
use crate::model::user::UserId;
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::error::RepoResult;
use log::debug;
use std::collections::BTreeMap;

/// Writes agenda projections through a borrowed agenda repository.
pub struct AgendaProjector<'a, R: AgendaRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: AgendaRepository + ?Sized> AgendaProjector<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Persists the BUSY entry of `user_id` for `meeting`.
    ///
    /// Pure construction plus one write; never reads other entries.
    pub fn project(&self, user_id: UserId, meeting: &Meeting) -> RepoResult<AgendaEntry> {
        let entry = AgendaEntry::busy_for_meeting(user_id, meeting);
        self.repo.create_entry(&entry)?;
        debug!(
            "event=agenda_project module=projector status=ok meeting_id={} user_id={} entry_id={}",
            meeting.id, user_id, entry.id
        );
        Ok(entry)
    }

    /// Reconciles the projections of `meeting` with its current state.
    ///
    /// Updates the window of existing entries, projects missing ones and
    /// removes entries of users no longer involved (or duplicates).
    pub fn sync(&self, meeting: &Meeting) -> RepoResult<Vec<AgendaEntry>> {
        let mut by_user: BTreeMap<UserId, Vec<AgendaEntry>> = BTreeMap::new();
        for entry in self.repo.entries_by_meeting(meeting.id)? {
            by_user.entry(entry.user_id).or_default().push(entry);
        }

        let mut synced = Vec::new();
        let mut stale = Vec::new();
        for user_id in meeting.involved_users() {
            let mut entries = by_user.remove(&user_id).unwrap_or_default().into_iter();
            match entries.next() {
                Some(mut entry) => {
                    if entry.start != meeting.start
                        || entry.end != meeting.end
                        || entry.status != AgendaStatus::Busy
                    {
                        entry.start = meeting.start;
                        entry.end = meeting.end;
                        entry.status = AgendaStatus::Busy;
                        self.repo.update_entry(&entry)?;
                    }
                    synced.push(entry);
                }
                None => synced.push(self.project(user_id, meeting)?),
            }
            stale.extend(entries.map(|entry| entry.id));
        }
        stale.extend(by_user.into_values().flatten().map(|entry| entry.id));

        let removed = self.repo.delete_entries(&stale)?;
        debug!(
            "event=agenda_sync module=projector status=ok meeting_id={} entries={} removed={}",
            meeting.id,
            synced.len(),
            removed
        );
        Ok(synced)
    }

    /// Removes the projection of `meeting_id` held by `user_id`.
    pub fn retract(&self, meeting_id: MeetingId, user_id: UserId) -> RepoResult<usize> {
        let ids: Vec<_> = self
            .repo
            .entries_by_meeting(meeting_id)?
            .into_iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.id)
            .collect();
        self.repo.delete_entries(&ids)
    }

    /// Removes every projection of `meeting_id`.
    pub fn retract_all(&self, meeting_id: MeetingId) -> RepoResult<usize> {
        let ids: Vec<_> = self
            .repo
            .entries_by_meeting(meeting_id)?
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        self.repo.delete_entries(&ids)
    }
}
