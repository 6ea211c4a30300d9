//! CRUD operations for [`User`] accounts.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

impl Database {
    /// Insert a new account and return its assigned id.
    ///
    /// The `users.email` column carries a UNIQUE constraint; violating it
    /// yields [`StoreError::DuplicateEmail`].
    pub fn insert_user(&self, user: &User) -> Result<i64> {
        self.conn()
            .execute(
                "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)",
                params![user.name, user.email, user.password],
            )
            .map_err(map_unique_violation)?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Fetch an account by email.
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, name, email, password FROM users WHERE email = ?1 LIMIT 1",
                params![email],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch an account only when both email and password match exactly.
    ///
    /// Passwords are compared as stored, without hashing.  This is a lookup
    /// predicate, not a security boundary.
    pub fn login_user(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, name, email, password FROM users
                 WHERE email = ?1 AND password = ?2 LIMIT 1",
                params![email, password],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Fetch an account by id.
    pub fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, name, email, password FROM users WHERE id = ?1 LIMIT 1",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Replace an account's password in place.  Returns `true` if the account
    /// exists.
    pub fn update_user_password(&self, id: i64, new_password: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE users SET password = ?1 WHERE id = ?2",
            params![new_password, id],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

/// Translate a UNIQUE-constraint failure into [`StoreError::DuplicateEmail`].
fn map_unique_violation(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateEmail
        }
        _ => StoreError::Sqlite(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn alice() -> User {
        User {
            id: 0,
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "hunter2".into(),
        }
    }

    #[test]
    fn insert_and_lookup() {
        let (_dir, db) = open_db();

        let id = db.insert_user(&alice()).unwrap();
        assert!(id > 0);

        let by_email = db.user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.name, "Alice");

        let by_id = db.user_by_id(id).unwrap().unwrap();
        assert_eq!(by_id, by_email);

        assert!(db.user_by_email("nobody@example.com").unwrap().is_none());
        assert!(db.user_by_id(id + 1).unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (_dir, db) = open_db();

        db.insert_user(&alice()).unwrap();

        let mut dup = alice();
        dup.name = "Another Alice".into();
        dup.password = "different".into();
        assert!(matches!(
            db.insert_user(&dup),
            Err(StoreError::DuplicateEmail)
        ));

        // the first registration is untouched
        let stored = db.user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
    }

    #[test]
    fn login_requires_exact_match() {
        let (_dir, db) = open_db();

        let id = db.insert_user(&alice()).unwrap();

        let ok = db.login_user("alice@example.com", "hunter2").unwrap();
        assert_eq!(ok.map(|u| u.id), Some(id));

        assert!(db.login_user("alice@example.com", "wrong").unwrap().is_none());
        assert!(db.login_user("bob@example.com", "hunter2").unwrap().is_none());
    }

    #[test]
    fn password_update_in_place() {
        let (_dir, db) = open_db();

        let id = db.insert_user(&alice()).unwrap();

        assert!(db.update_user_password(id, "correct horse").unwrap());
        assert!(db.login_user("alice@example.com", "hunter2").unwrap().is_none());
        assert!(db
            .login_user("alice@example.com", "correct horse")
            .unwrap()
            .is_some());

        assert!(!db.update_user_password(id + 1, "whatever").unwrap());
    }
}
