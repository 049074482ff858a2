//! Point-of-interest endpoints under `/api/cities/{cityId}/pointsofinterest`.
//!
//! Input checks happen here; lookups and writes go through the pipeline.

use crate::app::response::ApiResponse;
use crate::core::mapping::Mapper;
use crate::core::patch::PatchDocument;
use crate::core::points_of_interest::PointsOfInterestPipeline;
use crate::domain::dto::{
    PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
use crate::domain::model::{CityId, PointId};
use crate::utils::error::Result;
use crate::utils::validation::{check_differs_from_name, ValidationErrors};
use tokio_util::sync::CancellationToken;

pub const MISSING_BODY: &str = "A non-empty request body is required.";

pub fn point_location(city_id: CityId, point_id: PointId) -> String {
    format!("/api/cities/{}/pointsofinterest/{}", city_id, point_id)
}

fn missing_body<T>() -> ApiResponse<T> {
    let mut errors = ValidationErrors::new();
    errors.add("body", MISSING_BODY);
    ApiResponse::BadRequest(errors)
}

fn created(city_id: CityId, result: Result<Option<PointOfInterestDto>>) -> ApiResponse<PointOfInterestDto> {
    match result {
        Ok(Some(point)) => ApiResponse::Created {
            location: point_location(city_id, point.id),
            body: point,
        },
        Ok(None) => ApiResponse::NotFound,
        Err(e) => ApiResponse::server_error(&e),
    }
}

pub struct PointsOfInterestController<P> {
    pipeline: P,
    mapper: Mapper,
}

impl<P: PointsOfInterestPipeline> PointsOfInterestController<P> {
    pub fn new(pipeline: P, mapper: Mapper) -> Self {
        Self { pipeline, mapper }
    }

    /// Apply `patch` to the current state, then validate the merged result.
    /// Patch errors stop before the business rule and field checks run.
    pub fn merge_patch(
        &self,
        current: &PointOfInterestDto,
        patch: &PatchDocument,
    ) -> std::result::Result<PointOfInterestForUpdateDto, ValidationErrors> {
        let mut merged = self.mapper.update_shape(current);
        let mut errors = ValidationErrors::new();
        patch.apply_to(&mut merged, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }

        check_differs_from_name(&mut errors, merged.name.as_deref(), merged.description.as_deref());
        errors.merge(merged.field_errors());
        if errors.is_empty() {
            Ok(merged)
        } else {
            Err(errors)
        }
    }

    pub fn get_points_of_interest(&self, city_id: CityId) -> ApiResponse<Vec<PointOfInterestDto>> {
        ApiResponse::from_lookup(self.pipeline.points_of_interest_for_city(city_id))
    }

    pub fn get_point_of_interest(&self, city_id: CityId, point_id: PointId) -> ApiResponse<PointOfInterestDto> {
        ApiResponse::from_lookup(self.pipeline.point_of_interest_for_city(city_id, point_id))
    }

    pub fn create_point_of_interest(
        &self,
        city_id: CityId,
        input: Option<&PointOfInterestForCreationDto>,
    ) -> ApiResponse<PointOfInterestDto> {
        let Some(input) = input else {
            return missing_body();
        };
        let errors = input.validation_errors();
        if !errors.is_empty() {
            return ApiResponse::BadRequest(errors);
        }
        created(city_id, self.pipeline.add_point_of_interest_for_city(city_id, input))
    }

    pub fn update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: Option<&PointOfInterestForUpdateDto>,
    ) -> ApiResponse<()> {
        let Some(input) = input else {
            return missing_body();
        };
        let errors = input.validation_errors();
        if !errors.is_empty() {
            return ApiResponse::BadRequest(errors);
        }
        ApiResponse::from_mutation(self.pipeline.update_point_of_interest(city_id, point_id, input))
    }

    pub fn partially_update_point_of_interest(
        &self,
        city_id: CityId,
        point_id: PointId,
        patch: Option<&PatchDocument>,
    ) -> ApiResponse<()> {
        let Some(patch) = patch else {
            return missing_body();
        };
        let current = match self.pipeline.point_of_interest_for_city(city_id, point_id) {
            Ok(Some(current)) => current,
            Ok(None) => return ApiResponse::NotFound,
            Err(e) => return ApiResponse::server_error(&e),
        };
        let merged = match self.merge_patch(&current, patch) {
            Ok(merged) => merged,
            Err(errors) => return ApiResponse::BadRequest(errors),
        };
        ApiResponse::from_mutation(
            self.pipeline
                .partially_update_point_of_interest(city_id, point_id, &merged),
        )
    }

    pub fn delete_point_of_interest(&self, city_id: CityId, point_id: PointId) -> ApiResponse<()> {
        ApiResponse::from_mutation(self.pipeline.delete_point_of_interest(city_id, point_id))
    }

    pub async fn get_points_of_interest_async(
        &self,
        city_id: CityId,
        cancel: &CancellationToken,
    ) -> ApiResponse<Vec<PointOfInterestDto>> {
        ApiResponse::from_lookup(
            self.pipeline
                .points_of_interest_for_city_async(city_id, cancel)
                .await,
        )
    }

    pub async fn get_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> ApiResponse<PointOfInterestDto> {
        ApiResponse::from_lookup(
            self.pipeline
                .point_of_interest_for_city_async(city_id, point_id, cancel)
                .await,
        )
    }

    pub async fn create_point_of_interest_async(
        &self,
        city_id: CityId,
        input: Option<&PointOfInterestForCreationDto>,
        cancel: &CancellationToken,
    ) -> ApiResponse<PointOfInterestDto> {
        let Some(input) = input else {
            return missing_body();
        };
        let errors = input.validation_errors();
        if !errors.is_empty() {
            return ApiResponse::BadRequest(errors);
        }
        let result = self
            .pipeline
            .add_point_of_interest_for_city_async(city_id, input, cancel)
            .await;
        created(city_id, result)
    }

    pub async fn update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        input: Option<&PointOfInterestForUpdateDto>,
        cancel: &CancellationToken,
    ) -> ApiResponse<()> {
        let Some(input) = input else {
            return missing_body();
        };
        let errors = input.validation_errors();
        if !errors.is_empty() {
            return ApiResponse::BadRequest(errors);
        }
        ApiResponse::from_mutation(
            self.pipeline
                .update_point_of_interest_async(city_id, point_id, input, cancel)
                .await,
        )
    }

    pub async fn partially_update_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        patch: Option<&PatchDocument>,
        cancel: &CancellationToken,
    ) -> ApiResponse<()> {
        let Some(patch) = patch else {
            return missing_body();
        };
        let current = match self
            .pipeline
            .point_of_interest_for_city_async(city_id, point_id, cancel)
            .await
        {
            Ok(Some(current)) => current,
            Ok(None) => return ApiResponse::NotFound,
            Err(e) => return ApiResponse::server_error(&e),
        };
        let merged = match self.merge_patch(&current, patch) {
            Ok(merged) => merged,
            Err(errors) => return ApiResponse::BadRequest(errors),
        };
        ApiResponse::from_mutation(
            self.pipeline
                .partially_update_point_of_interest_async(city_id, point_id, &merged, cancel)
                .await,
        )
    }

    pub async fn delete_point_of_interest_async(
        &self,
        city_id: CityId,
        point_id: PointId,
        cancel: &CancellationToken,
    ) -> ApiResponse<()> {
        ApiResponse::from_mutation(
            self.pipeline
                .delete_point_of_interest_async(city_id, point_id, cancel)
                .await,
        )
    }
}
