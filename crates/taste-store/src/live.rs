//! Reactive dish store with live-query subscriptions.
//!
//! [`DishStore`] wraps the shared [`Database`] handle behind a single writer
//! lock.  Every mutation re-evaluates all active subscriptions and pushes
//! fresh results through their [`tokio::sync::watch`] channels before the
//! call returns, so subscribers never observe a torn intermediate state.
//! Dropping a [`LiveQuery`] unsubscribes it; the dead entry is pruned on the
//! next mutation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::database::Database;
use crate::error::Result;
use crate::models::Dish;

/// Re-runs one subscribed query against the database and publishes the result.
/// Returns `false` once the subscriber is gone.
type Refresh = Box<dyn FnMut(&Database) -> bool + Send>;

/// A live read: the current value at subscription time, then an updated value
/// whenever a mutation changes the query result.
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> LiveQuery<T> {
    /// The most recently published result.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next result that differs from the last published one.
    ///
    /// Returns `None` when the store side has been dropped.
    pub async fn updated(&mut self) -> Option<T> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

/// Durable dish storage with change notification.
///
/// Cloning is cheap; clones share the same database handle and subscription
/// registry.
#[derive(Clone)]
pub struct DishStore {
    db: Arc<Mutex<Database>>,
    watchers: Arc<Mutex<Vec<Refresh>>>,
}

impl DishStore {
    /// Build a store over an already opened database handle.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self {
            db,
            watchers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Insert or replace a dish, then notify all subscriptions.
    ///
    /// Returns the persisted id (newly assigned when `dish.id == 0`).
    pub fn upsert(&self, dish: &Dish) -> Result<i64> {
        let db = lock(&self.db);
        let id = db.upsert_dish(dish)?;
        tracing::debug!(id, name = %dish.dish_name, "dish saved");
        self.notify(&db);
        Ok(id)
    }

    /// Delete the record matching the dish's id, then notify.  Deleting an
    /// unknown id is a no-op and returns `false`.
    pub fn delete(&self, dish: &Dish) -> Result<bool> {
        let db = lock(&self.db);
        let deleted = db.delete_dish(dish.id)?;
        if deleted {
            self.notify(&db);
        }
        Ok(deleted)
    }

    /// Delete every dish, then notify.
    pub fn clear(&self) -> Result<usize> {
        let db = lock(&self.db);
        let removed = db.clear_dishes()?;
        tracing::info!(removed, "dish history cleared");
        self.notify(&db);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Live queries
    // ------------------------------------------------------------------

    /// All dishes, most recently cooked first.
    pub fn all(&self) -> Result<LiveQuery<Vec<Dish>>> {
        self.subscribe(|db| db.list_dishes())
    }

    /// A single record by id; `None` when absent or deleted.
    pub fn by_id(&self, id: i64) -> Result<LiveQuery<Option<Dish>>> {
        self.subscribe(move |db| db.get_dish(id))
    }

    /// The `n` most recently cooked dishes.
    pub fn recent(&self, n: u32) -> Result<LiveQuery<Vec<Dish>>> {
        self.subscribe(move |db| db.recent_dishes(n))
    }

    /// The `n` best-rated dishes, unrated ones last.
    pub fn top(&self, n: u32) -> Result<LiveQuery<Vec<Dish>>> {
        self.subscribe(move |db| db.top_dishes(n))
    }

    /// Forgotten favorites: rated at least `min_rating`, last cooked on or
    /// before `cutoff`, oldest first.
    pub fn forgotten(
        &self,
        min_rating: i64,
        cutoff: DateTime<Utc>,
        n: u32,
    ) -> Result<LiveQuery<Vec<Dish>>> {
        self.subscribe(move |db| db.forgotten_dishes(min_rating, cutoff, n))
    }

    // ------------------------------------------------------------------
    // One-shot reads
    // ------------------------------------------------------------------

    /// One uniformly selected dish, or `None` when the store is empty.
    pub fn random(&self) -> Result<Option<Dish>> {
        lock(&self.db).random_dish()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn subscribe<T, F>(&self, query: F) -> Result<LiveQuery<T>>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&Database) -> Result<T> + Send + 'static,
    {
        let db = lock(&self.db);
        let initial = query(&db)?;
        let (tx, rx) = watch::channel(initial);

        lock(&self.watchers).push(Box::new(move |db: &Database| {
            if tx.is_closed() {
                return false;
            }
            match query(db) {
                Ok(value) => {
                    // only wake subscribers when the result actually changed
                    tx.send_if_modified(|current| {
                        if *current == value {
                            false
                        } else {
                            *current = value;
                            true
                        }
                    });
                }
                Err(e) => {
                    // keep the last published value rather than tearing down
                    // the subscription
                    tracing::warn!(error = %e, "live query refresh failed");
                }
            }
            true
        }));

        Ok(LiveQuery { rx })
    }

    /// Re-run every registered query against the just-mutated database and
    /// drop entries whose subscribers went away.  Called with the database
    /// lock held so no writer can interleave.
    fn notify(&self, db: &Database) {
        let mut watchers = lock(&self.watchers);
        watchers.retain_mut(|refresh| refresh(db));
    }

    #[cfg(test)]
    fn active_subscriptions(&self) -> usize {
        lock(&self.watchers).len()
    }
}

/// Recover the guard if a previous holder panicked; the connection itself
/// stays usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;

    fn open_store() -> (tempfile::TempDir, DishStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, DishStore::new(Arc::new(Mutex::new(db))))
    }

    fn dish_at(name: &str, ms: i64, rating: Option<i64>) -> Dish {
        Dish {
            date_cooked: Utc.timestamp_millis_opt(ms).unwrap(),
            rating,
            ..Dish::new(name)
        }
    }

    #[tokio::test]
    async fn all_sees_initial_state_then_updates() {
        let (_dir, store) = open_store();
        store.upsert(&dish_at("First", 1_000, None)).unwrap();

        let mut all = store.all().unwrap();
        assert_eq!(all.current().len(), 1);

        store.upsert(&dish_at("Second", 2_000, None)).unwrap();
        let dishes = all.updated().await.unwrap();
        let names: Vec<_> = dishes.into_iter().map(|d| d.dish_name).collect();
        assert_eq!(names, ["Second", "First"]);
    }

    #[tokio::test]
    async fn by_id_goes_none_after_delete() {
        let (_dir, store) = open_store();
        let mut dish = dish_at("Curry", 1_000, Some(4));
        dish.id = store.upsert(&dish).unwrap();

        let mut one = store.by_id(dish.id).unwrap();
        assert_eq!(one.current().as_ref(), Some(&dish));

        assert!(store.delete(&dish).unwrap());
        assert_eq!(one.updated().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unrelated_mutation_does_not_wake_subscriber() {
        let (_dir, store) = open_store();
        let mut dish = dish_at("Stew", 1_000, None);
        dish.id = store.upsert(&dish).unwrap();

        let mut one = store.by_id(dish.id).unwrap();

        // a different record changes; this query's result does not
        store.upsert(&dish_at("Salad", 2_000, None)).unwrap();

        let woke = tokio::time::timeout(Duration::from_millis(50), one.updated()).await;
        assert!(woke.is_err(), "subscriber should not have been notified");
    }

    #[tokio::test]
    async fn clear_empties_every_live_view() {
        let (_dir, store) = open_store();
        store.upsert(&dish_at("A", 1_000, Some(5))).unwrap();
        store.upsert(&dish_at("B", 2_000, Some(3))).unwrap();

        let mut all = store.all().unwrap();
        let mut top = store.top(5).unwrap();
        assert_eq!(all.current().len(), 2);
        assert_eq!(top.current().len(), 2);

        assert_eq!(store.clear().unwrap(), 2);
        assert!(all.updated().await.unwrap().is_empty());
        assert!(top.updated().await.unwrap().is_empty());
        assert!(store.random().unwrap().is_none());
    }

    #[tokio::test]
    async fn dropped_subscriptions_are_pruned() {
        let (_dir, store) = open_store();

        let all = store.all().unwrap();
        let recent = store.recent(3).unwrap();
        assert_eq!(store.active_subscriptions(), 2);

        drop(all);
        drop(recent);

        // the next mutation sweeps the dead entries
        store.upsert(&dish_at("Toast", 1_000, None)).unwrap();
        assert_eq!(store.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn recent_window_tracks_newest() {
        let (_dir, store) = open_store();
        store.upsert(&dish_at("Old", 1_000, None)).unwrap();

        let mut recent = store.recent(1).unwrap();
        assert_eq!(recent.current()[0].dish_name, "Old");

        store.upsert(&dish_at("New", 5_000, None)).unwrap();
        assert_eq!(recent.updated().await.unwrap()[0].dish_name, "New");
    }
}
