use crate::app::response::ApiResponse;
use crate::core::cities::CitiesPipeline;
use crate::domain::dto::{CityDto, CityView, CityWithoutPointsOfInterestDto};
use crate::domain::model::CityId;
use tokio_util::sync::CancellationToken;

/// City endpoints under `/api/cities`.
pub struct CitiesController<P> {
    pipeline: P,
}

impl<P: CitiesPipeline> CitiesController<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn get_cities(&self) -> ApiResponse<Vec<CityWithoutPointsOfInterestDto>> {
        ApiResponse::from_lookup(self.pipeline.cities().map(Some))
    }

    pub fn get_all_city_info(&self) -> ApiResponse<Vec<CityDto>> {
        ApiResponse::from_lookup(self.pipeline.all_city_info().map(Some))
    }

    pub fn get_city(&self, city_id: CityId, include_points_of_interest: bool) -> ApiResponse<CityView> {
        ApiResponse::from_lookup(self.pipeline.city(city_id, include_points_of_interest))
    }

    pub async fn get_cities_async(
        &self,
        cancel: &CancellationToken,
    ) -> ApiResponse<Vec<CityWithoutPointsOfInterestDto>> {
        ApiResponse::from_lookup(self.pipeline.cities_async(cancel).await.map(Some))
    }

    pub async fn get_all_city_info_async(&self, cancel: &CancellationToken) -> ApiResponse<Vec<CityDto>> {
        ApiResponse::from_lookup(self.pipeline.all_city_info_async(cancel).await.map(Some))
    }

    pub async fn get_city_async(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
        cancel: &CancellationToken,
    ) -> ApiResponse<CityView> {
        ApiResponse::from_lookup(
            self.pipeline
                .city_async(city_id, include_points_of_interest, cancel)
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCityStore;
    use crate::adapters::seed::seed_cities;
    use crate::core::cities::CitiesService;
    use crate::core::mapping::Mapper;
    use std::sync::Arc;

    fn controller() -> CitiesController<CitiesService<InMemoryCityStore>> {
        let store = Arc::new(InMemoryCityStore::with_cities(seed_cities()));
        CitiesController::new(CitiesService::new(store, Mapper::default()))
    }

    #[test]
    fn test_cities_are_listed_by_name() {
        let response = controller().get_cities();
        let names: Vec<&str> = response
            .body()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Antwerp", "New York City", "Paris", "Sofia", "Sydney"]);
    }

    #[test]
    fn test_city_detail_includes_points() {
        match controller().get_city(4, true) {
            ApiResponse::Ok(CityView::Detail(city)) => {
                assert_eq!(city.name, "Sydney");
                assert_eq!(city.number_of_points_of_interest, 3);
            }
            other => panic!("expected city detail, got {}", other.status()),
        }
    }

    #[tokio::test]
    async fn test_unknown_city_is_not_found() {
        let cancel = CancellationToken::new();
        assert_eq!(controller().get_city_async(99, false, &cancel).await.status(), 404);
    }
}
