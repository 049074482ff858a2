// Adapters layer: concrete stores and notifiers behind the domain ports.

pub mod memory;
pub mod notifier;
pub mod seed;
#[cfg(feature = "store-sqlite")]
pub mod sqlite;

pub use memory::InMemoryCityStore;
pub use notifier::{build_notifier, CloudNotifier, LocalNotifier};
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteCityStore;

use crate::utils::error::{CityInfoError, Result};
use tokio_util::sync::CancellationToken;

/// Run a blocking store step as a cancellable suspension point. A token
/// cancelled before the step starts means the step never runs.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    op: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(CityInfoError::Cancelled);
    }
    tokio::task::yield_now().await;
    if cancel.is_cancelled() {
        return Err(CityInfoError::Cancelled);
    }
    op()
}
