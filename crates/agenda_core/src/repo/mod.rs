//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the user/meeting/agenda data access contracts the scheduling
//!   services depend on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate model invariants before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod agenda_repo;
pub mod error;
pub mod meeting_repo;
pub mod store;
pub mod user_repo;
