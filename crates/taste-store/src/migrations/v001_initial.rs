//! v001 -- Initial schema creation.
//!
//! Creates the two core tables: `dishes` and `users`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Dishes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS dishes (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    dish_name    TEXT NOT NULL,
    kcal         INTEGER,
    cook_minutes INTEGER,
    ingredients  TEXT NOT NULL DEFAULT '',
    steps        TEXT NOT NULL DEFAULT '',
    source_link  TEXT,
    notes        TEXT,
    date_cooked  INTEGER NOT NULL,            -- epoch milliseconds
    cuisine      TEXT,
    meal_type    TEXT,
    image_uri    TEXT,
    rating       INTEGER                      -- 0..5, nullable
);

CREATE INDEX IF NOT EXISTS idx_dishes_date_cooked
    ON dishes(date_cooked DESC);

CREATE INDEX IF NOT EXISTS idx_dishes_rating_date
    ON dishes(rating DESC, date_cooked DESC);

-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL,
    email    TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
