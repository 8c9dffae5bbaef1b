//! Meeting scheduling core.
//! This crate is the single source of truth for scheduling invariants:
//! conflict-free meetings, their per-user agenda projections, and
//! availability answers.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::agenda::{AgendaEntry, AgendaEntryId, AgendaStatus};
pub use model::meeting::{Meeting, MeetingId};
pub use model::user::{User, UserId};
pub use model::window::{TimeRangeError, TimeWindow};
pub use repo::agenda_repo::AgendaRepository;
pub use repo::error::{RepoError, RepoResult, ResourceKind};
pub use repo::meeting_repo::MeetingRepository;
pub use repo::store::{SqliteStore, Store};
pub use repo::user_repo::UserRepository;
pub use service::agenda_projector::AgendaProjector;
pub use service::agenda_service::AgendaService;
pub use service::availability::AvailabilityQuery;
pub use service::conflict_checker::ConflictChecker;
pub use service::error::{SchedulingError, SchedulingResult};
pub use service::scheduler::{MeetingUpdate, NewMeeting, Scheduler};
pub use service::user_service::{CascadeReport, UserService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
