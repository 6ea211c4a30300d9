//! # taste-media
//!
//! App-owned image storage.  Picked photos are copied out of their transient,
//! access-scoped location into the application's private image directory and
//! referenced from dish records by the returned path string.

pub mod images;

pub use images::{ImageStore, MediaError};
