//! Application state shared with the presentation layer.
//!
//! [`App`] owns every store, constructed explicitly at startup and handed to
//! the screens; there is no lazily initialized global handle.

use std::path::Path;
use std::sync::{Arc, Mutex};

use taste_media::ImageStore;
use taste_store::{Database, Dish, DishStore, StoreError, User};

use crate::dishes::DishRepository;
use crate::error::{AppError, Result};
use crate::run_blocking;
use crate::session::{Session, SESSION_FILE_NAME};
use crate::users::UserRepository;

/// Central application state.
///
/// Holds the repository facades, the image store, and the persisted session
/// slot.  The dish and user repositories share one database handle.
pub struct App {
    /// Dish journal: reactive reads plus mutating calls.
    pub dishes: DishRepository,

    /// Account storage.
    pub users: UserRepository,

    /// App-owned image copies for dish photos.
    pub images: ImageStore,

    /// The persisted pointer to the logged-in user.
    pub session: Session,
}

impl App {
    /// Wire the data layer up in the platform data directory.
    pub fn init() -> Result<Self> {
        let db = Arc::new(Mutex::new(Database::new()?));

        Ok(Self {
            dishes: DishRepository::new(DishStore::new(Arc::clone(&db))),
            users: UserRepository::new(db),
            images: ImageStore::new()?,
            session: Session::load()?,
        })
    }

    /// Wire the data layer up inside an explicit directory.
    ///
    /// Lays out the same files `init` uses: the journal database, the
    /// session slot, and an `images/` subdirectory.
    pub fn open_at(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(taste_store::database::DB_FILE_NAME);
        let db = Arc::new(Mutex::new(Database::open_at(&db_path)?));

        Ok(Self {
            dishes: DishRepository::new(DishStore::new(Arc::clone(&db))),
            users: UserRepository::new(db),
            images: ImageStore::open_at(&data_dir.join("images"))?,
            session: Session::load_at(&data_dir.join(SESSION_FILE_NAME)),
        })
    }

    // ------------------------------------------------------------------
    // Auth flows
    // ------------------------------------------------------------------

    /// Create an account and start a session for it.
    ///
    /// Fields are trimmed first; blank ones fail validation before the store
    /// is touched.  A taken email surfaces as [`AppError::EmailTaken`].
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Name, email and password are required".into(),
            ));
        }

        let mut user = User {
            id: 0,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        user.id = match self.users.insert(user.clone()).await {
            Ok(id) => id,
            Err(AppError::Store(StoreError::DuplicateEmail)) => return Err(AppError::EmailTaken),
            Err(e) => return Err(e),
        };

        self.session.set_user(user.id)?;
        tracing::info!(user_id = user.id, "account registered");
        Ok(user)
    }

    /// Check credentials; on a match, start a session and return the account.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let found = self.users.login(email.trim(), password).await?;
        if let Some(user) = &found {
            self.session.set_user(user.id)?;
            tracing::info!(user_id = user.id, "logged in");
        }
        Ok(found)
    }

    /// Drop the persisted session.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    /// Resolve the session to an account.  `None` when nobody is logged in
    /// or the referenced account no longer exists.
    pub async fn current_user(&self) -> Result<Option<User>> {
        let id = self.session.user_id();
        if id == 0 {
            return Ok(None);
        }
        self.users.by_id(id).await
    }

    /// Change the logged-in user's password after verifying the current one.
    ///
    /// Returns `false` when there is no session, the current password does
    /// not match, or the new one is blank.
    pub async fn change_password(&self, current: &str, new_password: &str) -> Result<bool> {
        let id = self.session.user_id();
        if id == 0 || new_password.is_empty() {
            return Ok(false);
        }

        let Some(user) = self.users.by_id(id).await? else {
            return Ok(false);
        };
        if user.password != current {
            return Ok(false);
        }

        self.users.update_password(id, new_password).await
    }

    // ------------------------------------------------------------------
    // Dish entry
    // ------------------------------------------------------------------

    /// Copy a picked photo into app storage, attach its stable reference to
    /// the dish, and save.  Returns the persisted dish id.
    pub async fn save_with_image(&self, mut dish: Dish, picked: &Path) -> Result<i64> {
        let images = self.images.clone();
        let picked = picked.to_path_buf();
        let uri = run_blocking(move || Ok(images.save_image(&picked)?)).await?;

        dish.image_uri = Some(uri);
        self.dishes.save(dish).await
    }
}
