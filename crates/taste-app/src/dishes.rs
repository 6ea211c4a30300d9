//! Async facade over the reactive dish store.

use chrono::{DateTime, Duration, Utc};
use taste_store::{Dish, DishStore, LiveQuery};

use crate::error::Result;
use crate::run_blocking;

/// How many dishes the home and timeline rows show.
pub const RECENT_LIMIT: u32 = 10;
/// How many top-rated dishes the timeline shows.
pub const TOP_LIMIT: u32 = 10;
/// Minimum rating for a dish to count as a forgotten favorite.
pub const FORGOTTEN_MIN_RATING: i64 = 4;
/// A favorite is "forgotten" once it has not been cooked for this long.
pub const FORGOTTEN_WINDOW_DAYS: i64 = 60;
/// How many forgotten favorites the timeline shows.
pub const FORGOTTEN_LIMIT: u32 = 10;

/// Thin pass-through exposing [`DishStore`] to presentation code: reactive
/// read streams plus mutating calls, with the blocking storage work pushed
/// off the foreground path.
#[derive(Clone)]
pub struct DishRepository {
    store: DishStore,
}

impl DishRepository {
    pub fn new(store: DishStore) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Save a dish (insert when `id == 0`, replace otherwise) and return the
    /// persisted id.
    pub async fn save(&self, dish: Dish) -> Result<i64> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.upsert(&dish)?)).await
    }

    /// Delete the record matching the dish's id.
    pub async fn delete(&self, dish: &Dish) -> Result<bool> {
        let store = self.store.clone();
        let dish = dish.clone();
        run_blocking(move || Ok(store.delete(&dish)?)).await
    }

    /// Delete the whole dish history.
    pub async fn clear(&self) -> Result<usize> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.clear()?)).await
    }

    // ------------------------------------------------------------------
    // Live queries
    // ------------------------------------------------------------------

    /// All dishes, most recently cooked first.
    pub async fn all(&self) -> Result<LiveQuery<Vec<Dish>>> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.all()?)).await
    }

    /// A single record, `None` when absent or deleted.
    pub async fn by_id(&self, id: i64) -> Result<LiveQuery<Option<Dish>>> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.by_id(id)?)).await
    }

    /// The `n` most recently cooked dishes.
    pub async fn recent(&self, n: u32) -> Result<LiveQuery<Vec<Dish>>> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.recent(n)?)).await
    }

    /// The `n` best-rated dishes, unrated ones last.
    pub async fn top(&self, n: u32) -> Result<LiveQuery<Vec<Dish>>> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.top(n)?)).await
    }

    /// Dishes rated at least `min_rating` and last cooked on or before
    /// `cutoff`, oldest first.
    pub async fn forgotten(
        &self,
        min_rating: i64,
        cutoff: DateTime<Utc>,
        n: u32,
    ) -> Result<LiveQuery<Vec<Dish>>> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.forgotten(min_rating, cutoff, n)?)).await
    }

    /// The recent row with the default the home and timeline screens use.
    pub async fn timeline_recent(&self) -> Result<LiveQuery<Vec<Dish>>> {
        self.recent(RECENT_LIMIT).await
    }

    /// The top-rated row with the default the timeline screen uses.
    pub async fn timeline_top(&self) -> Result<LiveQuery<Vec<Dish>>> {
        self.top(TOP_LIMIT).await
    }

    /// The forgotten-favorites row with the defaults the timeline screen
    /// uses: well rated, untouched for [`FORGOTTEN_WINDOW_DAYS`].
    pub async fn forgotten_favorites(&self) -> Result<LiveQuery<Vec<Dish>>> {
        let cutoff = Utc::now() - Duration::days(FORGOTTEN_WINDOW_DAYS);
        self.forgotten(FORGOTTEN_MIN_RATING, cutoff, FORGOTTEN_LIMIT)
            .await
    }

    // ------------------------------------------------------------------
    // One-shot reads
    // ------------------------------------------------------------------

    /// One uniformly selected dish for the shuffle screen, `None` when the
    /// journal is empty.
    pub async fn random(&self) -> Result<Option<Dish>> {
        let store = self.store.clone();
        run_blocking(move || Ok(store.random()?)).await
    }
}
