//! User reference model.
//!
//! Users are owned by the external account component. The scheduling core
//! only needs a stable id and a display name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a user.
pub type UserId = Uuid;

/// Immutable user reference used by scheduling services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name only; never used for identity comparisons.
    pub name: String,
}

impl User {
    /// Creates a user with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a user with a caller-provided ID.
    pub fn with_id(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
