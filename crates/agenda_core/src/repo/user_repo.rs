//! User lookup repository.
//!
//! The account component owns users; the scheduling core only needs to
//! resolve ids, seed users for local use, and delete them at the end of the
//! deletion cascade.

use crate::model::user::{User, UserId};
use crate::repo::error::{RepoError, RepoResult, ResourceKind};
use crate::repo::store::{parse_uuid, SqliteStore};
use rusqlite::{params, OptionalExtension};

/// Repository interface for user references.
pub trait UserRepository {
    /// Inserts a user; fails with `Duplicate` when the id is taken.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Deletes a user row. Callers must remove references first.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

impl UserRepository for SqliteStore<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let changed = self.conn().execute(
            "INSERT INTO users (user_uuid, name)
             VALUES (?1, ?2)
             ON CONFLICT (user_uuid) DO NOTHING;",
            params![user.id.to_string(), user.name.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::Duplicate {
                kind: ResourceKind::User,
                id: user.id,
            });
        }

        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT user_uuid, name
                 FROM users
                 WHERE user_uuid = ?1;",
                [id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(uuid_text, name)| -> RepoResult<User> {
            Ok(User {
                id: parse_uuid(&uuid_text, "users.user_uuid")?,
                name,
            })
        })
        .transpose()
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM users WHERE user_uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::user_not_found(id));
        }

        Ok(())
    }
}
