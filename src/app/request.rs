use crate::app::response::ApiResponse;
use crate::domain::model::{CityId, PointId};
use crate::utils::validation::ValidationErrors;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// One call against the REST surface. Bodies stay raw JSON text until the
/// handler decodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Cities,
    AllCityInfo,
    City {
        id: CityId,
        include_points_of_interest: bool,
    },
    PointsOfInterest {
        city_id: CityId,
    },
    PointOfInterest {
        city_id: CityId,
        id: PointId,
    },
    CreatePointOfInterest {
        city_id: CityId,
        body: String,
    },
    UpdatePointOfInterest {
        city_id: CityId,
        id: PointId,
        body: String,
    },
    PatchPointOfInterest {
        city_id: CityId,
        id: PointId,
        body: String,
    },
    DeletePointOfInterest {
        city_id: CityId,
        id: PointId,
    },
    Status,
    Version,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub body: Value,
}

impl Reply {
    pub fn bad_request(errors: ValidationErrors) -> Self {
        ApiResponse::<()>::BadRequest(errors).into()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl<T: Serialize> From<ApiResponse<T>> for Reply {
    fn from(response: ApiResponse<T>) -> Self {
        Reply {
            status: response.status(),
            location: response.location().map(str::to_string),
            body: response.to_json(),
        }
    }
}

/// Blank text is a missing body; malformed JSON is a `body` validation error.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ValidationErrors> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).map(Some).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("body", format!("The request body is not valid JSON: {}", e));
        errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patch::PatchDocument;
    use crate::domain::dto::PointOfInterestForCreationDto;

    #[test]
    fn test_blank_body_is_missing() {
        let parsed: Option<PointOfInterestForCreationDto> = parse_body("  ").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_malformed_body_is_a_body_error() {
        let errors = parse_body::<PointOfInterestForCreationDto>("{\"name\":").unwrap_err();
        assert!(errors.contains("body"));
    }

    #[test]
    fn test_patch_body_uses_json_patch_format() {
        let patch: PatchDocument = parse_body(r#"[{"op":"replace","path":"/name","value":"Park2"}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(patch, PatchDocument::default().replace("/name", "Park2"));
    }

    #[test]
    fn test_created_reply_carries_location() {
        let reply: Reply = ApiResponse::Created {
            location: "/api/cities/1/pointsofinterest/7".to_string(),
            body: 7,
        }
        .into();
        assert_eq!(reply.status, 201);
        assert_eq!(reply.location.as_deref(), Some("/api/cities/1/pointsofinterest/7"));
    }
}
