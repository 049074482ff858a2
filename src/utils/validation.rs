use crate::utils::error::{CityInfoError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

pub const NAME_REQUIRED: &str = "You should provide a name value.";
pub const NAME_EQUALS_DESCRIPTION: &str =
    "The provided description should be different from the name.";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn require_name(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if value.map(|v| v.trim().is_empty()).unwrap_or(true) {
        errors.add(field, NAME_REQUIRED);
    }
}

pub fn check_max_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.add(
                field,
                format!(
                    "The field {} must be a string with a maximum length of {}.",
                    field, max
                ),
            );
        }
    }
}

pub fn check_differs_from_name(
    errors: &mut ValidationErrors,
    name: Option<&str>,
    description: Option<&str>,
) {
    if name == description {
        errors.add("title", NAME_EQUALS_DESCRIPTION);
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CityInfoError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CityInfoError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("notifier.endpoint", "https://example.com").is_ok());
        assert!(validate_url("notifier.endpoint", "http://example.com").is_ok());
        assert!(validate_url("notifier.endpoint", "").is_err());
        assert!(validate_url("notifier.endpoint", "invalid-url").is_err());
        assert!(validate_url("notifier.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("notifier.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("notifier.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_require_name() {
        let mut errors = ValidationErrors::new();
        require_name(&mut errors, "name", Some("Park"));
        assert!(errors.is_empty());

        require_name(&mut errors, "name", None);
        require_name(&mut errors, "name", Some("   "));
        assert_eq!(errors.get("name").map(|m| m.len()), Some(2));
        assert_eq!(errors.get("name").unwrap()[0], NAME_REQUIRED);
    }

    #[test]
    fn test_check_max_length_counts_chars() {
        let mut errors = ValidationErrors::new();
        check_max_length(&mut errors, "name", Some(&"é".repeat(50)), 50);
        assert!(errors.is_empty());

        check_max_length(&mut errors, "name", Some(&"a".repeat(51)), 50);
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_name_equal_to_description_is_reported_under_title() {
        let mut errors = ValidationErrors::new();
        check_differs_from_name(&mut errors, Some("Park"), Some("Park"));
        assert_eq!(errors.get("title").unwrap()[0], NAME_EQUALS_DESCRIPTION);
    }

    #[test]
    fn test_validation_errors_serialize_as_map() {
        let mut errors = ValidationErrors::new();
        errors.add("name", NAME_REQUIRED);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "name": [NAME_REQUIRED] }));
    }
}
