use agenda_core::db::open_db_in_memory;
use agenda_core::{
    AgendaService, AgendaStatus, AvailabilityQuery, NewMeeting, ResourceKind, Scheduler,
    SchedulingError, SqliteStore, UserService,
};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

#[test]
fn user_without_entries_is_available() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = UserService::new(store).register_user("Ada").unwrap();

    let query = AvailabilityQuery::new(store);
    assert!(query.is_available(user.id, at(10, 9, 0), at(10, 17, 0)).unwrap());
}

#[test]
fn scheduled_meeting_blocks_overlapping_windows_only() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = UserService::new(store).register_user("Ada").unwrap();
    Scheduler::new(store)
        .create_meeting(&NewMeeting {
            title: "Planning".to_string(),
            description: None,
            start: at(10, 10, 0),
            end: at(10, 11, 0),
            organizer_id: user.id,
            participant_ids: Vec::new(),
        })
        .unwrap();

    let query = AvailabilityQuery::new(store);
    assert!(!query.is_available(user.id, at(10, 10, 30), at(10, 11, 30)).unwrap());
    assert!(!query.is_available(user.id, at(10, 9, 0), at(10, 12, 0)).unwrap());
    assert!(query.is_available(user.id, at(10, 11, 0), at(10, 12, 0)).unwrap());
    assert!(query.is_available(user.id, at(10, 9, 0), at(10, 10, 0)).unwrap());
    assert!(query.is_available(user.id, at(11, 10, 0), at(11, 11, 0)).unwrap());
}

#[test]
fn free_entries_never_block() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = UserService::new(store).register_user("Ada").unwrap();
    AgendaService::new(store)
        .create_entry(user.id, at(10, 8, 0), at(10, 18, 0), AgendaStatus::Free)
        .unwrap();

    let query = AvailabilityQuery::new(store);
    assert!(query.is_available(user.id, at(10, 9, 0), at(10, 10, 0)).unwrap());
    assert!(query
        .blocking_entries(user.id, at(10, 9, 0), at(10, 10, 0))
        .unwrap()
        .is_empty());
}

#[test]
fn manual_busy_entry_blocks() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = UserService::new(store).register_user("Ada").unwrap();
    let entry = AgendaService::new(store)
        .create_entry(user.id, at(10, 14, 0), at(10, 15, 0), AgendaStatus::Busy)
        .unwrap();

    let query = AvailabilityQuery::new(store);
    let blocking = query
        .blocking_entries(user.id, at(10, 14, 45), at(10, 16, 0))
        .unwrap();
    assert_eq!(blocking, vec![entry]);
    assert!(!query.is_available(user.id, at(10, 14, 45), at(10, 16, 0)).unwrap());
}

#[test]
fn entry_crossing_midnight_blocks_the_next_morning() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = UserService::new(store).register_user("Ada").unwrap();
    AgendaService::new(store)
        .create_entry(user.id, at(10, 23, 0), at(11, 1, 0), AgendaStatus::Busy)
        .unwrap();

    let query = AvailabilityQuery::new(store);
    assert!(!query.is_available(user.id, at(11, 0, 30), at(11, 0, 45)).unwrap());
    assert!(!query.is_available(user.id, at(10, 22, 0), at(10, 23, 30)).unwrap());
    assert!(query.is_available(user.id, at(11, 1, 0), at(11, 2, 0)).unwrap());
}

#[test]
fn invalid_window_and_unknown_user_are_errors() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = UserService::new(store).register_user("Ada").unwrap();
    let query = AvailabilityQuery::new(store);

    assert!(matches!(
        query.is_available(user.id, at(10, 12, 0), at(10, 12, 0)).unwrap_err(),
        SchedulingError::InvalidTimeRange(_)
    ));
    let ghost = Uuid::new_v4();
    assert!(matches!(
        query.is_available(ghost, at(10, 9, 0), at(10, 10, 0)).unwrap_err(),
        SchedulingError::NotFound { kind: ResourceKind::User, id } if id == ghost
    ));
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
