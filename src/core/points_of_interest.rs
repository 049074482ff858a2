//! Points-of-interest pipeline: existence checks, lookup, merge, persist and
//! notify, scoped to a parent city.

use crate::core::mapping::Mapper;
use crate::domain::changes::ChangeSet;
use crate::domain::dto::{
    PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
use crate::domain::model::{CityId, MutationOutcome, PointId, PointOfInterest};
use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository, Notifier};
use crate::utils::error::{CityInfoError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DELETED_SUBJECT: &str = "Point of interest deleted.";

pub fn deleted_message(point: &PointOfInterest) -> String {
    format!(
        "Point of interest {} with id {} was deleted.",
        point.name, point.id
    )
}

/// Not-found is `None` / [`MutationOutcome::NotFound`], never an error.
/// Errors are store or write failures and are not retried.
#[async_trait]
pub trait PointsOfInterestPipeline: Send + Sync {
    fn points_of_interest_for_city(&self, city_id: CityId) -> Result<Option<Vec<PointOfInterestDto>>>;

    fn point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_id: PointId,
    ) -> Result<Option<PointOfInterestDto>>;

    fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        input: &PointOfInterestForCreationDto,
    ) -> Result<Option<PointOfInterestDto>>;

    /// Full replace (PUT): fields missing from `input` are cleared.
    fn update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: &PointOfInterestForUpdateDto,
    ) -> Result<MutationOutcome>;

    /// Persist an already merged and validated update shape.
    fn partially_update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        merged: &PointOfInterestForUpdateDto,
    ) -> Result<MutationOutcome>;

    fn delete_point_of_interest(&self, city_id: CityId, point_id: PointId) -> Result<MutationOutcome>;

    async fn points_of_interest_for_city_async(
        &self,
        city_id: CityId,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<PointOfInterestDto>>>;

    async fn point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterestDto>>;

    async fn add_point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        input: &PointOfInterestForCreationDto,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterestDto>>;

    async fn update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: &PointOfInterestForUpdateDto,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome>;

    async fn partially_update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        merged: &PointOfInterestForUpdateDto,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome>;

    async fn delete_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome>;
}

pub struct PointsOfInterestService<R, N: ?Sized> {
    repository: Arc<R>,
    notifier: Arc<N>,
    mapper: Mapper,
}

impl<R, N: ?Sized> PointsOfInterestService<R, N>
where
    R: CityInfoRepository + AsyncCityInfoRepository,
    N: Notifier,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, mapper: Mapper) -> Self {
        Self {
            repository,
            notifier,
            mapper,
        }
    }

    fn city_missing(city_id: CityId) {
        tracing::warn!(city_id, "City does not exist: {}", city_id);
    }

    fn point_missing(city_id: CityId, point_id: PointId) {
        tracing::warn!(
            city_id,
            point_id,
            "Point of Interest {} for city {} does not exist",
            point_id,
            city_id
        );
    }

    fn commit(&self, city_id: CityId, point_id: Option<PointId>, changes: ChangeSet) -> Result<()> {
        if !self.repository.save(changes)? {
            return Err(CityInfoError::save_failed(city_id, point_id));
        }
        Ok(())
    }

    async fn commit_async(
        &self,
        city_id: CityId,
        point_id: Option<PointId>,
        changes: ChangeSet,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if !self.repository.save_async(changes, cancel).await? {
            return Err(CityInfoError::save_failed(city_id, point_id));
        }
        Ok(())
    }

    /// Point scoped to an existing city, or `None` after logging why.
    fn load_point(&self, city_id: CityId, point_id: PointId) -> Result<Option<PointOfInterest>> {
        if !self.repository.city_exists(city_id)? {
            Self::city_missing(city_id);
            return Ok(None);
        }
        let point = self.repository.point_of_interest_for_city(city_id, point_id)?;
        if point.is_none() {
            Self::point_missing(city_id, point_id);
        }
        Ok(point)
    }

    async fn load_point_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterest>> {
        if !self.repository.city_exists_async(city_id, cancel).await? {
            Self::city_missing(city_id);
            return Ok(None);
        }
        let point = self
            .repository
            .point_of_interest_for_city_async(city_id, point_id, cancel)
            .await?;
        if point.is_none() {
            Self::point_missing(city_id, point_id);
        }
        Ok(point)
    }

    fn created_dto(
        &self,
        city_id: CityId,
        mut point: PointOfInterest,
        assigned: Option<PointId>,
    ) -> Result<PointOfInterestDto> {
        point.id = assigned.ok_or_else(|| CityInfoError::StoreError {
            message: format!("Store did not assign an id to the new point of city {}", city_id),
        })?;
        tracing::info!(city_id, point_id = point.id, "Point of interest created");
        Ok(self.mapper.point_dto(&point))
    }

    fn overwrite(
        &self,
        mut point: PointOfInterest,
        input: &PointOfInterestForUpdateDto,
    ) -> ChangeSet {
        self.mapper.apply_update(input, &mut point);
        let mut changes = ChangeSet::new();
        changes.update_point(&point);
        changes
    }
}

#[async_trait]
impl<R, N: ?Sized> PointsOfInterestPipeline for PointsOfInterestService<R, N>
where
    R: CityInfoRepository + AsyncCityInfoRepository,
    N: Notifier,
{
    fn points_of_interest_for_city(&self, city_id: CityId) -> Result<Option<Vec<PointOfInterestDto>>> {
        if !self.repository.city_exists(city_id)? {
            Self::city_missing(city_id);
            return Ok(None);
        }
        let points = self.repository.points_of_interest_for_city(city_id)?;
        Ok(Some(self.mapper.point_dtos(&points)))
    }

    fn point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_id: PointId,
    ) -> Result<Option<PointOfInterestDto>> {
        Ok(self
            .load_point(city_id, point_id)?
            .map(|point| self.mapper.point_dto(&point)))
    }

    fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        input: &PointOfInterestForCreationDto,
    ) -> Result<Option<PointOfInterestDto>> {
        if !self.repository.city_exists(city_id)? {
            Self::city_missing(city_id);
            return Ok(None);
        }
        let point = self.mapper.new_point(input);
        let mut changes = ChangeSet::new();
        let pending = changes.add_point_for_city(city_id, point.clone());
        self.commit(city_id, None, changes)?;

        let point = PointOfInterest { city_id, ..point };
        self.created_dto(city_id, point, pending.id()).map(Some)
    }

    fn update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: &PointOfInterestForUpdateDto,
    ) -> Result<MutationOutcome> {
        let Some(point) = self.load_point(city_id, point_id)? else {
            return Ok(MutationOutcome::NotFound);
        };
        let changes = self.overwrite(point, input);
        self.commit(city_id, Some(point_id), changes)?;
        Ok(MutationOutcome::Applied)
    }

    fn partially_update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        merged: &PointOfInterestForUpdateDto,
    ) -> Result<MutationOutcome> {
        let Some(point) = self.load_point(city_id, point_id)? else {
            return Ok(MutationOutcome::NotFound);
        };
        let changes = self.overwrite(point, merged);
        self.commit(city_id, Some(point_id), changes)?;
        Ok(MutationOutcome::Applied)
    }

    fn delete_point_of_interest(&self, city_id: CityId, point_id: PointId) -> Result<MutationOutcome> {
        let Some(point) = self.load_point(city_id, point_id)? else {
            return Ok(MutationOutcome::NotFound);
        };
        let mut changes = ChangeSet::new();
        changes.delete_point(&point);
        self.commit(city_id, Some(point_id), changes)?;

        self.notifier.send(DELETED_SUBJECT, &deleted_message(&point));
        Ok(MutationOutcome::Applied)
    }

    async fn points_of_interest_for_city_async(
        &self,
        city_id: CityId,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<PointOfInterestDto>>> {
        if !self.repository.city_exists_async(city_id, cancel).await? {
            Self::city_missing(city_id);
            return Ok(None);
        }
        let points = self
            .repository
            .points_of_interest_for_city_async(city_id, cancel)
            .await?;
        Ok(Some(self.mapper.point_dtos(&points)))
    }

    async fn point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterestDto>> {
        Ok(self
            .load_point_async(city_id, point_id, cancel)
            .await?
            .map(|point| self.mapper.point_dto(&point)))
    }

    async fn add_point_of_interest_for_city_async(
        &self,
        city_id: CityId,
        input: &PointOfInterestForCreationDto,
        cancel: &CancellationToken,
    ) -> Result<Option<PointOfInterestDto>> {
        if !self.repository.city_exists_async(city_id, cancel).await? {
            Self::city_missing(city_id);
            return Ok(None);
        }
        let point = self.mapper.new_point(input);
        let mut changes = ChangeSet::new();
        let pending = changes.add_point_for_city(city_id, point.clone());
        self.commit_async(city_id, None, changes, cancel).await?;

        let point = PointOfInterest { city_id, ..point };
        self.created_dto(city_id, point, pending.id()).map(Some)
    }

    async fn update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: &PointOfInterestForUpdateDto,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let Some(point) = self.load_point_async(city_id, point_id, cancel).await? else {
            return Ok(MutationOutcome::NotFound);
        };
        let changes = self.overwrite(point, input);
        self.commit_async(city_id, Some(point_id), changes, cancel)
            .await?;
        Ok(MutationOutcome::Applied)
    }

    async fn partially_update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        merged: &PointOfInterestForUpdateDto,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let Some(point) = self.load_point_async(city_id, point_id, cancel).await? else {
            return Ok(MutationOutcome::NotFound);
        };
        let changes = self.overwrite(point, merged);
        self.commit_async(city_id, Some(point_id), changes, cancel)
            .await?;
        Ok(MutationOutcome::Applied)
    }

    async fn delete_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let Some(point) = self.load_point_async(city_id, point_id, cancel).await? else {
            return Ok(MutationOutcome::NotFound);
        };
        let mut changes = ChangeSet::new();
        changes.delete_point(&point);
        self.commit_async(city_id, Some(point_id), changes, cancel)
            .await?;

        self.notifier
            .send_async(DELETED_SUBJECT, &deleted_message(&point))
            .await;
        Ok(MutationOutcome::Applied)
    }
}
