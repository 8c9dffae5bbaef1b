//! Scheduling domain model.
//!
//! # Responsibility
//! - Define users, meetings and agenda entries used by core services.
//! - Own the time-window invariant (`start < end`) and overlap rule.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Windows are compared as full date-time instants, never as bare
//!   time-of-day values.

pub mod agenda;
pub mod meeting;
pub mod user;
pub mod window;
