//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dish
// ---------------------------------------------------------------------------

/// One journaled meal record.
///
/// Records are immutable value snapshots: editing a dish means building a new
/// snapshot and saving it under the same id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dish {
    /// Row id assigned by the store.  `0` means "not yet persisted"; the
    /// store assigns a positive id on first save and keeps it on update.
    pub id: i64,
    /// Display name.
    pub dish_name: String,
    /// Calories, if the user entered them.
    pub kcal: Option<i64>,
    /// Cooking time in minutes.
    pub cook_minutes: Option<i64>,
    /// Free-text ingredient block, one entry per line.
    pub ingredients: String,
    /// Free-text preparation steps.
    pub steps: String,
    /// Optional URL the recipe came from.
    pub source_link: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// When the dish was cooked.  Stored as epoch milliseconds.
    pub date_cooked: DateTime<Utc>,
    /// Optional cuisine tag ("Italian", "Thai", ...).
    pub cuisine: Option<String>,
    /// Optional meal-type tag ("Breakfast", "Dinner", ...).
    pub meal_type: Option<String>,
    /// Reference to a locally stored image file, if one was attached.
    pub image_uri: Option<String>,
    /// Rating on the 0..=5 scale.  The store does not enforce the range.
    pub rating: Option<i64>,
}

impl Dish {
    /// Build an unsaved dish with the given name, cooked right now.
    pub fn new(dish_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            dish_name: dish_name.into(),
            kcal: None,
            cook_minutes: None,
            ingredients: String::new(),
            steps: String::new(),
            source_link: None,
            notes: None,
            date_cooked: Utc::now(),
            cuisine: None,
            meal_type: None,
            image_uri: None,
            rating: None,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
///
/// The password is stored and compared as plaintext to stay compatible with
/// existing database contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Row id assigned by the store.  `0` means "not yet persisted".
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.  Unique across the users table.
    pub email: String,
    /// Login password.
    pub password: String,
}
