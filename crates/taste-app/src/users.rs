//! Async facade over the user store.

use std::sync::{Arc, Mutex};

use taste_store::{Database, User};

use crate::error::Result;
use crate::{lock, run_blocking};

/// Thin pass-through exposing the account operations to presentation code.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Mutex<Database>>,
}

impl UserRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Insert a new account; fails with a duplicate-email store error when
    /// the address is taken.
    pub async fn insert(&self, user: User) -> Result<i64> {
        let db = self.db.clone();
        run_blocking(move || Ok(lock(&db).insert_user(&user)?)).await
    }

    /// Look an account up by email.
    pub async fn by_email(&self, email: &str) -> Result<Option<User>> {
        let db = self.db.clone();
        let email = email.to_string();
        run_blocking(move || Ok(lock(&db).user_by_email(&email)?)).await
    }

    /// The matching account when both email and password match exactly,
    /// `None` otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let db = self.db.clone();
        let email = email.to_string();
        let password = password.to_string();
        run_blocking(move || Ok(lock(&db).login_user(&email, &password)?)).await
    }

    /// Look an account up by id.
    pub async fn by_id(&self, id: i64) -> Result<Option<User>> {
        let db = self.db.clone();
        run_blocking(move || Ok(lock(&db).user_by_id(id)?)).await
    }

    /// Replace an account's password in place.
    pub async fn update_password(&self, id: i64, new_password: &str) -> Result<bool> {
        let db = self.db.clone();
        let new_password = new_password.to_string();
        run_blocking(move || Ok(lock(&db).update_user_password(id, &new_password)?)).await
    }
}
