//! Read-only city queries.

use crate::core::mapping::Mapper;
use crate::domain::dto::{CityDto, CityView, CityWithoutPointsOfInterestDto};
use crate::domain::model::{City, CityId};
use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait CitiesPipeline: Send + Sync {
    /// Summaries ordered by name.
    fn cities(&self) -> Result<Vec<CityWithoutPointsOfInterestDto>>;

    /// Every city with its points, ordered by name.
    fn all_city_info(&self) -> Result<Vec<CityDto>>;

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Result<Option<CityView>>;

    async fn cities_async(&self, cancel: &CancellationToken) -> Result<Vec<CityWithoutPointsOfInterestDto>>;

    async fn all_city_info_async(&self, cancel: &CancellationToken) -> Result<Vec<CityDto>>;

    async fn city_async(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<CityView>>;
}

pub struct CitiesService<R> {
    repository: Arc<R>,
    mapper: Mapper,
}

impl<R> CitiesService<R>
where
    R: CityInfoRepository + AsyncCityInfoRepository,
{
    pub fn new(repository: Arc<R>, mapper: Mapper) -> Self {
        Self { repository, mapper }
    }

    fn view(&self, city: Option<City>, city_id: CityId, include_points_of_interest: bool) -> Option<CityView> {
        let Some(city) = city else {
            tracing::warn!(city_id, "City does not exist: {}", city_id);
            return None;
        };
        Some(if include_points_of_interest {
            CityView::Detail(self.mapper.city_detail(&city))
        } else {
            CityView::Summary(self.mapper.city_summary(&city))
        })
    }

    fn summaries(&self, cities: Vec<City>) -> Vec<CityWithoutPointsOfInterestDto> {
        ordered_by_name(cities)
            .iter()
            .map(|city| self.mapper.city_summary(city))
            .collect()
    }

    fn details(&self, cities: Vec<City>) -> Vec<CityDto> {
        ordered_by_name(cities)
            .iter()
            .map(|city| self.mapper.city_detail(city))
            .collect()
    }
}

/// Ordinal name order, ties broken by id so the order is total.
fn ordered_by_name(mut cities: Vec<City>) -> Vec<City> {
    cities.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    cities
}

#[async_trait]
impl<R> CitiesPipeline for CitiesService<R>
where
    R: CityInfoRepository + AsyncCityInfoRepository,
{
    fn cities(&self) -> Result<Vec<CityWithoutPointsOfInterestDto>> {
        Ok(self.summaries(self.repository.cities()?))
    }

    fn all_city_info(&self) -> Result<Vec<CityDto>> {
        Ok(self.details(self.repository.all_city_info()?))
    }

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Result<Option<CityView>> {
        let city = self.repository.city(city_id, include_points_of_interest)?;
        Ok(self.view(city, city_id, include_points_of_interest))
    }

    async fn cities_async(&self, cancel: &CancellationToken) -> Result<Vec<CityWithoutPointsOfInterestDto>> {
        Ok(self.summaries(self.repository.cities_async(cancel).await?))
    }

    async fn all_city_info_async(&self, cancel: &CancellationToken) -> Result<Vec<CityDto>> {
        Ok(self.details(self.repository.all_city_info_async(cancel).await?))
    }

    async fn city_async(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<CityView>> {
        let city = self
            .repository
            .city_async(city_id, include_points_of_interest, cancel)
            .await?;
        Ok(self.view(city, city_id, include_points_of_interest))
    }
}
