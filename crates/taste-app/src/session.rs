//! Persisted session slot.
//!
//! A single scalar: the id of the currently logged-in user, `0` meaning "no
//! session".  Backed by a small JSON preference file next to the database so
//! it survives process restarts and is readable before the database opens.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use taste_store::Database;

use crate::error::Result;
use crate::lock;

/// File name of the session slot inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionSlot {
    user_id: i64,
}

/// The single persisted pointer to the currently authenticated user.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    user_id: Mutex<i64>,
}

impl Session {
    /// Load the session slot from the default data directory.
    pub fn load() -> Result<Self> {
        let data_dir = Database::data_dir()?;
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self::load_at(&data_dir.join(SESSION_FILE_NAME)))
    }

    /// Load the session slot from an explicit path.
    ///
    /// A missing file means "no session".  An unreadable or corrupt file is
    /// treated the same way, with a warning, rather than blocking startup.
    pub fn load_at(path: &Path) -> Self {
        let user_id = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<SessionSlot>(&raw) {
                Ok(slot) => slot.user_id,
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt session file, starting signed out");
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable session file, starting signed out");
                0
            }
        };

        Self {
            path: path.to_path_buf(),
            user_id: Mutex::new(user_id),
        }
    }

    /// Persist `id` as the logged-in user, then update the in-memory value.
    pub fn set_user(&self, id: i64) -> Result<()> {
        let json = serde_json::to_string(&SessionSlot { user_id: id })?;
        std::fs::write(&self.path, json)?;
        *lock(&self.user_id) = id;
        tracing::debug!(user_id = id, "session updated");
        Ok(())
    }

    /// The persisted user id, `0` if nobody is logged in.
    pub fn user_id(&self) -> i64 {
        *lock(&self.user_id)
    }

    /// Remove the persisted slot and reset to "no session".
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *lock(&self.user_id) = 0;
        tracing::debug!("session cleared");
        Ok(())
    }
}
