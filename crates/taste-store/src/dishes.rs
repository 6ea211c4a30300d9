//! CRUD and query helpers for [`Dish`] records.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::Dish;

/// Column list shared by every dish SELECT.
const DISH_COLUMNS: &str = "id, dish_name, kcal, cook_minutes, ingredients, steps, \
     source_link, notes, date_cooked, cuisine, meal_type, image_uri, rating";

impl Database {
    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Insert a new dish or replace an existing one sharing the same id.
    ///
    /// A dish with `id == 0` is treated as unsaved: the store assigns the
    /// next row id and returns it.  Any other id replaces that row and is
    /// returned unchanged.
    pub fn upsert_dish(&self, dish: &Dish) -> Result<i64> {
        if dish.id == 0 {
            self.conn().execute(
                "INSERT INTO dishes (dish_name, kcal, cook_minutes, ingredients, steps,
                                     source_link, notes, date_cooked, cuisine, meal_type,
                                     image_uri, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    dish.dish_name,
                    dish.kcal,
                    dish.cook_minutes,
                    dish.ingredients,
                    dish.steps,
                    dish.source_link,
                    dish.notes,
                    dish.date_cooked.timestamp_millis(),
                    dish.cuisine,
                    dish.meal_type,
                    dish.image_uri,
                    dish.rating,
                ],
            )?;
            Ok(self.conn().last_insert_rowid())
        } else {
            self.conn().execute(
                "INSERT OR REPLACE INTO dishes (id, dish_name, kcal, cook_minutes, ingredients,
                                                steps, source_link, notes, date_cooked, cuisine,
                                                meal_type, image_uri, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    dish.id,
                    dish.dish_name,
                    dish.kcal,
                    dish.cook_minutes,
                    dish.ingredients,
                    dish.steps,
                    dish.source_link,
                    dish.notes,
                    dish.date_cooked.timestamp_millis(),
                    dish.cuisine,
                    dish.meal_type,
                    dish.image_uri,
                    dish.rating,
                ],
            )?;
            Ok(dish.id)
        }
    }

    /// Delete a dish by id.  Returns `true` if a row was deleted.
    pub fn delete_dish(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM dishes WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Delete every dish.  Returns the number of rows removed.
    pub fn clear_dishes(&self) -> Result<usize> {
        let affected = self.conn().execute("DELETE FROM dishes", [])?;
        Ok(affected)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single dish by id.
    pub fn get_dish(&self, id: i64) -> Result<Option<Dish>> {
        let dish = self
            .conn()
            .query_row(
                &format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = ?1"),
                params![id],
                row_to_dish,
            )
            .optional()?;
        Ok(dish)
    }

    /// List all dishes, most recently cooked first.
    pub fn list_dishes(&self) -> Result<Vec<Dish>> {
        self.query_dishes(
            &format!("SELECT {DISH_COLUMNS} FROM dishes ORDER BY date_cooked DESC"),
            params![],
        )
    }

    /// The `n` most recently cooked dishes.
    pub fn recent_dishes(&self, n: u32) -> Result<Vec<Dish>> {
        self.query_dishes(
            &format!("SELECT {DISH_COLUMNS} FROM dishes ORDER BY date_cooked DESC LIMIT ?1"),
            params![n],
        )
    }

    /// The `n` best-rated dishes, ties broken by more recent `date_cooked`.
    ///
    /// Unrated dishes sort after every rated one (SQLite treats NULL as
    /// smaller than any value, so `rating DESC` puts them last).
    pub fn top_dishes(&self, n: u32) -> Result<Vec<Dish>> {
        self.query_dishes(
            &format!(
                "SELECT {DISH_COLUMNS} FROM dishes
                 ORDER BY rating DESC, date_cooked DESC LIMIT ?1"
            ),
            params![n],
        )
    }

    /// Forgotten favorites: dishes rated at least `min_rating` that were last
    /// cooked on or before `cutoff`, oldest first, limited to `n`.
    pub fn forgotten_dishes(
        &self,
        min_rating: i64,
        cutoff: DateTime<Utc>,
        n: u32,
    ) -> Result<Vec<Dish>> {
        self.query_dishes(
            &format!(
                "SELECT {DISH_COLUMNS} FROM dishes
                 WHERE rating >= ?1 AND date_cooked <= ?2
                 ORDER BY date_cooked ASC LIMIT ?3"
            ),
            params![min_rating, cutoff.timestamp_millis(), n],
        )
    }

    /// One uniformly selected dish, or `None` if the table is empty.
    pub fn random_dish(&self) -> Result<Option<Dish>> {
        let dish = self
            .conn()
            .query_row(
                &format!("SELECT {DISH_COLUMNS} FROM dishes ORDER BY RANDOM() LIMIT 1"),
                [],
                row_to_dish,
            )
            .optional()?;
        Ok(dish)
    }

    fn query_dishes<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Dish>> {
        let mut stmt = self.conn().prepare(sql)?;

        let rows = stmt.query_map(params, row_to_dish)?;

        let mut dishes = Vec::new();
        for row in rows {
            dishes.push(row?);
        }
        Ok(dishes)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Dish`].
fn row_to_dish(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dish> {
    let date_ms: i64 = row.get(8)?;
    let date_cooked: DateTime<Utc> = DateTime::from_timestamp_millis(date_ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Integer,
            format!("timestamp out of range: {date_ms}").into(),
        )
    })?;

    Ok(Dish {
        id: row.get(0)?,
        dish_name: row.get(1)?,
        kcal: row.get(2)?,
        cook_minutes: row.get(3)?,
        ingredients: row.get(4)?,
        steps: row.get(5)?,
        source_link: row.get(6)?,
        notes: row.get(7)?,
        date_cooked,
        cuisine: row.get(9)?,
        meal_type: row.get(10)?,
        image_uri: row.get(11)?,
        rating: row.get(12)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn dish_at(name: &str, ms: i64, rating: Option<i64>) -> Dish {
        Dish {
            date_cooked: Utc.timestamp_millis_opt(ms).unwrap(),
            rating,
            ..Dish::new(name)
        }
    }

    #[test]
    fn upsert_assigns_id_and_round_trips() {
        let (_dir, db) = open_db();

        let mut dish = dish_at("Tacos", 1_000, Some(5));
        dish.kcal = Some(550);
        dish.cook_minutes = Some(20);
        dish.ingredients = "tortillas\nbeef\nsalsa".into();
        dish.steps = "brown the beef\nassemble".into();
        dish.source_link = Some("https://example.com/tacos".into());
        dish.cuisine = Some("Mexican".into());
        dish.meal_type = Some("Dinner".into());

        let id = db.upsert_dish(&dish).unwrap();
        assert!(id > 0);

        dish.id = id;
        let loaded = db.get_dish(id).unwrap().expect("dish should exist");
        assert_eq!(loaded, dish);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let (_dir, db) = open_db();

        let id = db.upsert_dish(&dish_at("Soup", 1_000, Some(3))).unwrap();

        let mut edited = dish_at("Chunky soup", 2_000, Some(4));
        edited.id = id;
        assert_eq!(db.upsert_dish(&edited).unwrap(), id);

        let loaded = db.get_dish(id).unwrap().unwrap();
        assert_eq!(loaded.dish_name, "Chunky soup");
        assert_eq!(loaded.rating, Some(4));
        assert_eq!(db.list_dishes().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_row() {
        let (_dir, db) = open_db();

        let id = db.upsert_dish(&dish_at("Pasta", 1_000, None)).unwrap();
        assert!(db.delete_dish(id).unwrap());
        assert!(db.get_dish(id).unwrap().is_none());
        assert!(db.list_dishes().unwrap().is_empty());

        // deleting again is a no-op
        assert!(!db.delete_dish(id).unwrap());
    }

    #[test]
    fn recent_orders_by_date_descending() {
        let (_dir, db) = open_db();

        db.upsert_dish(&dish_at("Oldest", 1_000, None)).unwrap();
        db.upsert_dish(&dish_at("Newest", 3_000, None)).unwrap();
        db.upsert_dish(&dish_at("Middle", 2_000, None)).unwrap();

        let names: Vec<_> = db
            .recent_dishes(2)
            .unwrap()
            .into_iter()
            .map(|d| d.dish_name)
            .collect();
        assert_eq!(names, ["Newest", "Middle"]);
    }

    #[test]
    fn top_breaks_ties_by_date_and_sorts_unrated_last() {
        let (_dir, db) = open_db();

        db.upsert_dish(&dish_at("Old five", 1_000, Some(5))).unwrap();
        db.upsert_dish(&dish_at("Unrated", 4_000, None)).unwrap();
        db.upsert_dish(&dish_at("Three", 2_000, Some(3))).unwrap();
        db.upsert_dish(&dish_at("New five", 3_000, Some(5))).unwrap();

        let names: Vec<_> = db
            .top_dishes(2)
            .unwrap()
            .into_iter()
            .map(|d| d.dish_name)
            .collect();
        assert_eq!(names, ["New five", "Old five"]);

        let all: Vec<_> = db
            .top_dishes(10)
            .unwrap()
            .into_iter()
            .map(|d| d.dish_name)
            .collect();
        assert_eq!(all, ["New five", "Old five", "Three", "Unrated"]);
    }

    #[test]
    fn forgotten_filters_and_orders_oldest_first() {
        let (_dir, db) = open_db();

        db.upsert_dish(&dish_at("Liked, old", 1_000, Some(5))).unwrap();
        db.upsert_dish(&dish_at("Liked, older", 500, Some(4))).unwrap();
        db.upsert_dish(&dish_at("Disliked, old", 800, Some(2))).unwrap();
        db.upsert_dish(&dish_at("Liked, recent", 9_000, Some(5))).unwrap();
        db.upsert_dish(&dish_at("Unrated, old", 700, None)).unwrap();

        let cutoff = Utc.timestamp_millis_opt(5_000).unwrap();
        let names: Vec<_> = db
            .forgotten_dishes(4, cutoff, 10)
            .unwrap()
            .into_iter()
            .map(|d| d.dish_name)
            .collect();
        assert_eq!(names, ["Liked, older", "Liked, old"]);
    }

    #[test]
    fn random_and_clear() {
        let (_dir, db) = open_db();

        assert!(db.random_dish().unwrap().is_none());

        db.upsert_dish(&dish_at("Only", 1_000, None)).unwrap();
        assert_eq!(db.random_dish().unwrap().unwrap().dish_name, "Only");

        db.upsert_dish(&dish_at("Other", 2_000, None)).unwrap();
        assert_eq!(db.clear_dishes().unwrap(), 2);
        assert!(db.list_dishes().unwrap().is_empty());
        assert!(db.random_dish().unwrap().is_none());
    }
}
