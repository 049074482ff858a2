//! Error-logging decorator for the pipelines.
//!
//! Wraps a pipeline and logs every failure with the operation name and the
//! ids involved, then hands the error back untouched.

use crate::core::cities::CitiesPipeline;
use crate::core::points_of_interest::PointsOfInterestPipeline;
use crate::domain::dto::{
    CityDto, CityView, CityWithoutPointsOfInterestDto, PointOfInterestDto,
    PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
use crate::domain::model::{CityId, MutationOutcome, PointId};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub struct Logged<P> {
    inner: P,
}

impl<P> Logged<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

fn observe<T>(
    operation: &'static str,
    city_id: Option<CityId>,
    point_id: Option<PointId>,
    result: Result<T>,
) -> Result<T> {
    if let Err(e) = &result {
        if e.is_cancelled() {
            tracing::info!(operation, ?city_id, ?point_id, "{} cancelled", operation);
        } else {
            tracing::error!(operation, ?city_id, ?point_id, error = %e, "{} error", operation);
        }
    }
    result
}

#[async_trait]
impl<P: PointsOfInterestPipeline> PointsOfInterestPipeline for Logged<P> {
    fn points_of_interest_for_city(&self, city_id: CityId) -> Result<Option<Vec<PointOfInterestDto>>> {
        observe(
            "points_of_interest_for_city",
            Some(city_id),
            None,
            self.inner.points_of_interest_for_city(city_id),
        )
    }

    fn point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_id: PointId,
    ) -> Result<Option<PointOfInterestDto>> {
        observe(
            "point_of_interest_for_city",
            Some(city_id),
            Some(point_id),
            self.inner.point_of_interest_for_city(city_id, point_id),
        )
    }

    fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        input: &PointOfInterestForCreationDto,
    ) -> Result<Option<PointOfInterestDto>> {
        observe(
            "add_point_of_interest_for_city",
            Some(city_id),
            None,
            self.inner.add_point_of_interest_for_city(city_id, input),
        )
    }

    fn update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: &PointOfInterestForUpdateDto,
    ) -> Result<MutationOutcome> {
        observe(
            "update_point_of_interest",
            Some(city_id),
            Some(point_id),
            self.inner.update_point_of_interest(city_id, point_id, input),
        )
    }

    fn partially_update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        merged: &PointOfInterestForUpdateDto,
    ) -> Result<MutationOutcome> {
        observe(
            "partially_update_point_of_interest",
            Some(city_id),
            Some(point_id),
            self.inner
                .partially_update_point_of_interest(city_id, point_id, merged),
        )
    }

    fn delete_point_of_interest(&self, city_id: CityId, point_id: PointId) -> Result<MutationOutcome> {
        observe(
            "delete_point_of_interest",
            Some(city_id),
            Some(point_id),
            self.inner.delete_point_of_interest(city_id, point_id),
        )
    }

    async fn points_of_interest_for_city_async(
        &self,
        city_id: CityId,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<PointOfInterestDto>>> {
        let result = self
            .inner
            .points_of_interest_for_city_async(city_id, cancel)
            .await;
        observe("points_of_interest_for_city_async", Some(city_id), None, result)
    }

    async fn point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterestDto>> {
        let result = self
            .inner
            .point_of_interest_for_city_async(city_id, point_id, cancel)
            .await;
        observe(
            "point_of_interest_for_city_async",
            Some(city_id),
            Some(point_id),
            result,
        )
    }

    async fn add_point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        input: &PointOfInterestForCreationDto,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterestDto>> {
        let result = self
            .inner
            .add_point_of_interest_for_city_async(city_id, input, cancel)
            .await;
        observe("add_point_of_interest_for_city_async", Some(city_id), None, result)
    }

    async fn update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: &PointOfInterestForUpdateDto,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let result = self
            .inner
            .update_point_of_interest_async(city_id, point_id, input, cancel)
            .await;
        observe(
            "update_point_of_interest_async",
            Some(city_id),
            Some(point_id),
            result,
        )
    }

    async fn partially_update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        merged: &PointOfInterestForUpdateDto,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let result = self
            .inner
            .partially_update_point_of_interest_async(city_id, point_id, merged, cancel)
            .await;
        observe(
            "partially_update_point_of_interest_async",
            Some(city_id),
            Some(point_id),
            result,
        )
    }

    async fn delete_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let result = self
            .inner
            .delete_point_of_interest_async(city_id, point_id, cancel)
            .await;
        observe(
            "delete_point_of_interest_async",
            Some(city_id),
            Some(point_id),
            result,
        )
    }
}

#[async_trait]
impl<P: CitiesPipeline> CitiesPipeline for Logged<P> {
    fn cities(&self) -> Result<Vec<CityWithoutPointsOfInterestDto>> {
        observe("cities", None, None, self.inner.cities())
    }

    fn all_city_info(&self) -> Result<Vec<CityDto>> {
        observe("all_city_info", None, None, self.inner.all_city_info())
    }

    fn city(&self, city_id: CityId, include_points_of_interest: bool) -> Result<Option<CityView>> {
        observe(
            "city",
            Some(city_id),
            None,
            self.inner.city(city_id, include_points_of_interest),
        )
    }

    async fn cities_async(&self, cancel: &CancellationToken) -> Result<Vec<CityWithoutPointsOfInterestDto>> {
        let result = self.inner.cities_async(cancel).await;
        observe("cities_async", None, None, result)
    }

    async fn all_city_info_async(&self, cancel: &CancellationToken) -> Result<Vec<CityDto>> {
        let result = self.inner.all_city_info_async(cancel).await;
        observe("all_city_info_async", None, None, result)
    }

    async fn city_async(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<CityView>> {
        let result = self
            .inner
            .city_async(city_id, include_points_of_interest, cancel)
            .await;
        observe("city_async", Some(city_id), None, result)
    }
}
