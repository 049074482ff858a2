//! Wire-facing shapes. Entities never leave the pipeline; these do.

use crate::domain::model::{CityId, PointId};
use crate::utils::validation::{
    check_differs_from_name, check_max_length, require_name, ValidationErrors,
};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    pub id: PointId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

impl CityDto {
    pub fn new(
        id: CityId,
        name: String,
        description: Option<String>,
        points_of_interest: Vec<PointOfInterestDto>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            number_of_points_of_interest: points_of_interest.len(),
            points_of_interest,
        }
    }
}

/// `GET city` answer: summary or detail depending on the caller's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CityView {
    Summary(CityWithoutPointsOfInterestDto),
    Detail(CityDto),
}

/// Client input for a new point. Identity and parent come from the route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreationDto {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Full-replace input, and the target shape of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdateDto {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn collect_field_errors(
    errors: &mut ValidationErrors,
    name: Option<&str>,
    description: Option<&str>,
) {
    require_name(errors, "name", name);
    check_max_length(errors, "name", name, NAME_MAX_LENGTH);
    check_max_length(errors, "description", description, DESCRIPTION_MAX_LENGTH);
}

impl PointOfInterestForCreationDto {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    /// Structural checks followed by the name/description business rule.
    pub fn validation_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_differs_from_name(&mut errors, self.name.as_deref(), self.description.as_deref());
        collect_field_errors(&mut errors, self.name.as_deref(), self.description.as_deref());
        errors
    }
}

impl PointOfInterestForUpdateDto {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    /// Data-annotation style checks only (required, lengths).
    pub fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        collect_field_errors(&mut errors, self.name.as_deref(), self.description.as_deref());
        errors
    }

    pub fn validation_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_differs_from_name(&mut errors, self.name.as_deref(), self.description.as_deref());
        collect_field_errors(&mut errors, self.name.as_deref(), self.description.as_deref());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::{NAME_EQUALS_DESCRIPTION, NAME_REQUIRED};

    #[test]
    fn test_city_dto_counts_nested_points() {
        let points = vec![
            PointOfInterestDto {
                id: 1,
                name: "Central Park".to_string(),
                description: None,
            },
            PointOfInterestDto {
                id: 2,
                name: "Empire State Building".to_string(),
                description: None,
            },
        ];
        let city = CityDto::new(1, "New York City".to_string(), None, points);
        assert_eq!(city.number_of_points_of_interest, 2);
    }

    #[test]
    fn test_creation_requires_name() {
        let input = PointOfInterestForCreationDto {
            name: None,
            description: Some("A park".to_string()),
        };
        let errors = input.validation_errors();
        assert_eq!(errors.get("name").unwrap(), &[NAME_REQUIRED.to_string()]);
    }

    #[test]
    fn test_creation_rejects_description_equal_to_name() {
        let errors = PointOfInterestForCreationDto::new("Park", "Park").validation_errors();
        assert_eq!(errors.get("title").unwrap(), &[NAME_EQUALS_DESCRIPTION.to_string()]);
    }

    #[test]
    fn test_update_with_empty_description_is_valid() {
        let errors = PointOfInterestForUpdateDto::new("Park2", "").validation_errors();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_update_rejects_overlong_description() {
        let input = PointOfInterestForUpdateDto::new("Park", "d".repeat(201));
        assert!(input.field_errors().contains("description"));
    }

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let city = CityDto::new(7, "Sofia".to_string(), None, vec![]);
        let json = serde_json::to_value(&city).unwrap();
        assert_eq!(json["numberOfPointsOfInterest"], 0);
        assert!(json.get("pointsOfInterest").is_some());
    }
}
