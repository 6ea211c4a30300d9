//! # taste-app
//!
//! Presentation-facing layer of the Taste Journal data stack.  Wires the
//! stores together behind explicitly constructed state ([`App`]), exposes
//! async repository facades over the blocking storage calls, and carries the
//! small pieces of shared glue the screens need (session slot, search filter,
//! date formatting).

pub mod dishes;
pub mod error;
pub mod search;
pub mod session;
pub mod state;
pub mod timefmt;
pub mod users;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing_subscriber::{fmt, EnvFilter};

pub use dishes::DishRepository;
pub use error::AppError;
pub use search::filter_dishes;
pub use session::Session;
pub use state::App;
pub use users::UserRepository;

/// Install the global tracing subscriber with sane defaults.
///
/// Call once from the embedding shell's entrypoint.  `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("taste_app=debug,taste_store=info,taste_media=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Recover the guard if a previous holder panicked; the guarded state stays
/// usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run blocking storage work off the async foreground path.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Task(e.to_string()))?
}
