//! Entity <-> wire shape conversion.

use crate::domain::dto::{
    CityDto, CityWithoutPointsOfInterestDto, PointOfInterestDto, PointOfInterestForCreationDto,
    PointOfInterestForUpdateDto,
};
use crate::domain::model::{City, PointOfInterest, UNASSIGNED_ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Trim leading/trailing whitespace from client-supplied text.
    #[serde(default)]
    pub trim_whitespace: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MappingConfig,
}

impl Mapper {
    pub fn new(config: MappingConfig) -> Self {
        Self { config }
    }

    fn incoming(&self, value: Option<&String>) -> Option<String> {
        value.map(|v| {
            if self.config.trim_whitespace {
                v.trim().to_string()
            } else {
                v.clone()
            }
        })
    }

    pub fn point_dto(&self, point: &PointOfInterest) -> PointOfInterestDto {
        PointOfInterestDto {
            id: point.id,
            name: point.name.clone(),
            description: point.description.clone(),
        }
    }

    pub fn point_dtos(&self, points: &[PointOfInterest]) -> Vec<PointOfInterestDto> {
        points.iter().map(|p| self.point_dto(p)).collect()
    }

    /// Only name and description are taken from the input.
    pub fn new_point(&self, input: &PointOfInterestForCreationDto) -> PointOfInterest {
        PointOfInterest {
            id: UNASSIGNED_ID,
            name: self.incoming(input.name.as_ref()).unwrap_or_default(),
            description: self.incoming(input.description.as_ref()),
            city_id: UNASSIGNED_ID,
        }
    }

    /// Full overwrite: fields missing from `input` are cleared on `point`.
    pub fn apply_update(&self, input: &PointOfInterestForUpdateDto, point: &mut PointOfInterest) {
        point.name = self.incoming(input.name.as_ref()).unwrap_or_default();
        point.description = self.incoming(input.description.as_ref());
    }

    pub fn update_shape(&self, point: &PointOfInterestDto) -> PointOfInterestForUpdateDto {
        PointOfInterestForUpdateDto {
            name: Some(point.name.clone()),
            description: point.description.clone(),
        }
    }

    pub fn city_summary(&self, city: &City) -> CityWithoutPointsOfInterestDto {
        CityWithoutPointsOfInterestDto {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
        }
    }

    pub fn city_detail(&self, city: &City) -> CityDto {
        CityDto::new(
            city.id,
            city.name.clone(),
            city.description.clone(),
            self.point_dtos(&city.points_of_interest),
        )
    }
}
