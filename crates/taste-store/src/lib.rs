//! # taste-store
//!
//! Local persistent storage for the Taste Journal application, backed by
//! SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model, plus the reactive [`DishStore`] which layers live-query
//! subscriptions on top of the dish table.

pub mod database;
pub mod dishes;
pub mod live;
pub mod migrations;
pub mod models;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use live::{DishStore, LiveQuery};
pub use models::*;
