use crate::domain::model::MutationOutcome;
use crate::utils::error::Result;
use crate::utils::validation::ValidationErrors;
use serde::Serialize;
use serde_json::{json, Value};

/// Transport-neutral REST answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Ok(T),
    Created { location: String, body: T },
    NoContent,
    BadRequest(ValidationErrors),
    NotFound,
    InternalServerError,
    /// 500 carrying a body for the caller.
    Failed(T),
}

impl<T> ApiResponse<T> {
    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Ok(_) => 200,
            ApiResponse::Created { .. } => 201,
            ApiResponse::NoContent => 204,
            ApiResponse::BadRequest(_) => 400,
            ApiResponse::NotFound => 404,
            ApiResponse::InternalServerError | ApiResponse::Failed(_) => 500,
        }
    }

    pub fn body(&self) -> Option<&T> {
        match self {
            ApiResponse::Ok(body) | ApiResponse::Created { body, .. } | ApiResponse::Failed(body) => {
                Some(body)
            }
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            ApiResponse::Created { location, .. } => Some(location),
            _ => None,
        }
    }

    /// `Ok(Some)` → 200, `Ok(None)` → 404, `Err` → 500.
    pub fn from_lookup(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(body)) => ApiResponse::Ok(body),
            Ok(None) => ApiResponse::NotFound,
            Err(e) => Self::server_error(&e),
        }
    }

    pub(crate) fn server_error(error: &dyn std::fmt::Display) -> Self {
        tracing::debug!("Responding 500: {}", error);
        ApiResponse::InternalServerError
    }
}

impl ApiResponse<()> {
    /// `Applied` → 204, `NotFound` → 404, `Err` → 500.
    pub fn from_mutation(result: Result<MutationOutcome>) -> Self {
        match result {
            Ok(MutationOutcome::Applied) => ApiResponse::NoContent,
            Ok(MutationOutcome::NotFound) => ApiResponse::NotFound,
            Err(e) => Self::server_error(&e),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// JSON representation of the body; errors carry their field detail.
    pub fn to_json(&self) -> Value {
        match self {
            ApiResponse::Ok(body) | ApiResponse::Created { body, .. } | ApiResponse::Failed(body) => {
                serde_json::to_value(body).unwrap_or(Value::Null)
            }
            ApiResponse::BadRequest(errors) => json!({ "status": 400, "errors": errors }),
            ApiResponse::NoContent => Value::Null,
            ApiResponse::NotFound => json!({ "status": 404 }),
            ApiResponse::InternalServerError => json!({ "status": 500 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CityInfoError;

    #[test]
    fn test_lookup_mapping() {
        assert_eq!(ApiResponse::from_lookup(Ok(Some(1))).status(), 200);
        assert_eq!(ApiResponse::<i32>::from_lookup(Ok(None)).status(), 404);
        let failed: ApiResponse<i32> =
            ApiResponse::from_lookup(Err(CityInfoError::save_failed(1, Some(2))));
        assert_eq!(failed.status(), 500);
    }

    #[test]
    fn test_mutation_mapping() {
        assert_eq!(ApiResponse::from_mutation(Ok(MutationOutcome::Applied)).status(), 204);
        assert_eq!(ApiResponse::from_mutation(Ok(MutationOutcome::NotFound)).status(), 404);
    }

    #[test]
    fn test_bad_request_json_carries_field_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "You should provide a name value.");
        let response: ApiResponse<()> = ApiResponse::BadRequest(errors);
        let json = response.to_json();
        assert_eq!(json["errors"]["name"][0], "You should provide a name value.");
    }
}
