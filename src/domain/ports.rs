use crate::domain::changes::ChangeSet;
use crate::domain::model::{City, CityId, PointId, PointOfInterest};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Blocking access to the city / point-of-interest store.
pub trait CityInfoRepository: Send + Sync {
    fn city_exists(&self, city_id: CityId) -> Result<bool>;

    /// All cities without children, ordered by name.
    fn cities(&self) -> Result<Vec<City>>;

    /// All cities with children, ordered by name.
    fn all_city_info(&self) -> Result<Vec<City>>;

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Result<Option<City>>;

    fn points_of_interest_for_city(&self, city_id: CityId) -> Result<Vec<PointOfInterest>>;

    fn point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_id: PointId,
    ) -> Result<Option<PointOfInterest>>;

    /// Commit every staged change atomically. `Ok(false)` means the store
    /// rejected the write and nothing was applied.
    fn save(&self, changes: ChangeSet) -> Result<bool>;

    fn health_check(&self) -> Result<bool>;
}

/// Cancellable twin of [`CityInfoRepository`].
///
/// A cancelled token aborts the call before its I/O step; a cancelled
/// `save_async` commits nothing.
#[async_trait]
pub trait AsyncCityInfoRepository: Send + Sync {
    async fn city_exists_async(&self, city_id: CityId, cancel: &CancellationToken) -> Result<bool>;

    async fn cities_async(&self, cancel: &CancellationToken) -> Result<Vec<City>>;

    async fn all_city_info_async(&self, cancel: &CancellationToken) -> Result<Vec<City>>;

    async fn city_async(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<City>>;

    async fn points_of_interest_for_city_async(
        &self,
        city_id: CityId,
        cancel: &CancellationToken,
    ) -> Result<Vec<PointOfInterest>>;

    async fn point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterest>>;

    async fn save_async(&self, changes: ChangeSet, cancel: &CancellationToken) -> Result<bool>;

    async fn health_check_async(&self, cancel: &CancellationToken) -> Result<bool>;
}

/// Outbound message dispatch. Delivery failures stay inside the notifier.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn send(&self, subject: &str, message: &str);

    async fn send_async(&self, subject: &str, message: &str);
}
