use agenda_core::db::open_db_in_memory;
use agenda_core::{
    AgendaRepository, AgendaStatus, MeetingRepository, NewMeeting, ResourceKind, Scheduler,
    SchedulingError, SqliteStore, User, UserId, UserService,
};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

#[test]
fn add_participant_persists_and_projects_busy_entry() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer, guest] = seed_users(store, ["Olga", "Gus"]);
    let scheduler = Scheduler::new(store);
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[], at(10, 0), at(11, 0)))
        .unwrap();

    let updated = scheduler.add_participant(meeting.id, guest.id).unwrap();

    assert!(updated.participants.contains(&guest.id));
    let stored = store.get_meeting(meeting.id).unwrap().unwrap();
    assert_eq!(stored.participants, updated.participants);
    let entries = store.entries_by_user(guest.id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].meeting_id, Some(meeting.id));
    assert_eq!(entries[0].status, AgendaStatus::Busy);
    assert_eq!(entries[0].start, at(10, 0));
    assert_eq!(entries[0].end, at(11, 0));
}

#[test]
fn add_participant_twice_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer, guest] = seed_users(store, ["Olga", "Gus"]);
    let scheduler = Scheduler::new(store);
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[], at(10, 0), at(11, 0)))
        .unwrap();

    let first = scheduler.add_participant(meeting.id, guest.id).unwrap();
    let second = scheduler.add_participant(meeting.id, guest.id).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.participants.len(), 1);
    assert_eq!(store.entries_by_meeting(meeting.id).unwrap().len(), 2);
    assert_eq!(store.entries_by_user(guest.id).unwrap().len(), 1);
}

#[test]
fn adding_the_organizer_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer] = seed_users(store, ["Olga"]);
    let scheduler = Scheduler::new(store);
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[], at(10, 0), at(11, 0)))
        .unwrap();

    let unchanged = scheduler.add_participant(meeting.id, organizer.id).unwrap();

    assert_eq!(unchanged, meeting);
    assert!(unchanged.participants.is_empty());
    assert_eq!(store.entries_by_user(organizer.id).unwrap().len(), 1);
}

#[test]
fn add_participant_rejects_busy_user() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer, guest] = seed_users(store, ["Olga", "Gus"]);
    let scheduler = Scheduler::new(store);
    let own = scheduler
        .create_meeting(&proposal(guest.id, &[], at(10, 30), at(11, 30)))
        .unwrap();
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[], at(10, 0), at(11, 0)))
        .unwrap();

    let err = scheduler.add_participant(meeting.id, guest.id).unwrap_err();

    match err {
        SchedulingError::SchedulingConflict {
            user_id,
            meeting_id,
            ..
        } => {
            assert_eq!(user_id, guest.id);
            assert_eq!(meeting_id, own.id);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store
        .get_meeting(meeting.id)
        .unwrap()
        .unwrap()
        .participants
        .is_empty());
    assert_eq!(store.entries_by_user(guest.id).unwrap().len(), 1);
}

#[test]
fn add_participant_requires_known_meeting_and_user() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer, guest] = seed_users(store, ["Olga", "Gus"]);
    let scheduler = Scheduler::new(store);
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[], at(10, 0), at(11, 0)))
        .unwrap();
    let ghost = Uuid::new_v4();

    assert!(matches!(
        scheduler.add_participant(ghost, guest.id).unwrap_err(),
        SchedulingError::NotFound { kind: ResourceKind::Meeting, id } if id == ghost
    ));
    assert!(matches!(
        scheduler.add_participant(meeting.id, ghost).unwrap_err(),
        SchedulingError::NotFound { kind: ResourceKind::User, id } if id == ghost
    ));
}

#[test]
fn remove_participant_retracts_entry_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer, guest, bystander] = seed_users(store, ["Olga", "Gus", "Bea"]);
    let scheduler = Scheduler::new(store);
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[guest.id], at(10, 0), at(11, 0)))
        .unwrap();

    let updated = scheduler.remove_participant(meeting.id, guest.id).unwrap();
    assert!(updated.participants.is_empty());
    assert!(store.entries_by_user(guest.id).unwrap().is_empty());
    assert_eq!(store.entries_by_user(organizer.id).unwrap().len(), 1);

    let again = scheduler.remove_participant(meeting.id, guest.id).unwrap();
    assert_eq!(again, updated);
    let untouched = scheduler
        .remove_participant(meeting.id, bystander.id)
        .unwrap();
    assert_eq!(untouched, updated);

    scheduler
        .create_meeting(&proposal(guest.id, &[], at(10, 0), at(11, 0)))
        .expect("removed participant should be free again");
}

#[test]
fn remove_participant_never_removes_the_organizer() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let [organizer] = seed_users(store, ["Olga"]);
    let scheduler = Scheduler::new(store);
    let meeting = scheduler
        .create_meeting(&proposal(organizer.id, &[], at(10, 0), at(11, 0)))
        .unwrap();

    let unchanged = scheduler
        .remove_participant(meeting.id, organizer.id)
        .unwrap();

    assert_eq!(unchanged.organizer_id, organizer.id);
    assert_eq!(store.entries_by_user(organizer.id).unwrap().len(), 1);
}

fn seed_users<const N: usize>(store: SqliteStore<'_>, names: [&str; N]) -> [User; N] {
    let users = UserService::new(store);
    names.map(|name| users.register_user(name).unwrap())
}

fn proposal(
    organizer_id: UserId,
    participant_ids: &[UserId],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NewMeeting {
    NewMeeting {
        title: "Sync".to_string(),
        description: Some("weekly".to_string()),
        start,
        end,
        organizer_id,
        participant_ids: participant_ids.to_vec(),
    }
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
