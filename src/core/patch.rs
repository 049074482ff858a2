//! Sparse field operations applied onto a point's update shape.
//!
//! The document follows JSON Patch wire format (`op`, `path`, `value`,
//! `from`). Only the two members of the update shape are addressable.

use crate::domain::dto::PointOfInterestForUpdateDto;
use crate::utils::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Description,
}

impl Field {
    fn parse(path: &str) -> Option<Self> {
        let member = path.strip_prefix('/').unwrap_or(path);
        if member.eq_ignore_ascii_case("name") {
            Some(Field::Name)
        } else if member.eq_ignore_ascii_case("description") {
            Some(Field::Description)
        } else {
            None
        }
    }

    fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
        }
    }

    fn slot(self, target: &mut PointOfInterestForUpdateDto) -> &mut Option<String> {
        match self {
            Field::Name => &mut target.name,
            Field::Description => &mut target.description,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.key())
    }
}

/// Ordered list of operations; later operations see the effect of earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument {
    operations: Vec<PatchOperation>,
}

impl PatchDocument {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }

    pub fn replace(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.operations.push(PatchOperation::Replace {
            path: path.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn remove(mut self, path: &str) -> Self {
        self.operations.push(PatchOperation::Remove {
            path: path.to_string(),
        });
        self
    }

    /// Apply every operation in order. Failed operations leave the target
    /// untouched and are recorded in `errors`; the rest still apply.
    pub fn apply_to(&self, target: &mut PointOfInterestForUpdateDto, errors: &mut ValidationErrors) {
        for operation in &self.operations {
            if let Err((key, message)) = apply_operation(operation, target) {
                tracing::debug!("Patch operation rejected: {}", message);
                errors.add(&key, message);
            }
        }
    }
}

type OperationError = (String, String);

fn resolve(path: &str) -> Result<Field, OperationError> {
    Field::parse(path).ok_or_else(|| {
        (
            "patch".to_string(),
            format!("The target location specified by path segment '{}' was not found.", path),
        )
    })
}

fn as_text(field: Field, value: &Value) -> Result<Option<String>, OperationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        other => Err((
            field.key().to_string(),
            format!("The value '{}' is invalid for target location.", other),
        )),
    }
}

fn apply_operation(
    operation: &PatchOperation,
    target: &mut PointOfInterestForUpdateDto,
) -> Result<(), OperationError> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            let field = resolve(path)?;
            *field.slot(target) = as_text(field, value)?;
        }
        PatchOperation::Remove { path } => {
            let field = resolve(path)?;
            *field.slot(target) = None;
        }
        PatchOperation::Move { from, path } => {
            let source = resolve(from)?;
            let destination = resolve(path)?;
            let value = source.slot(target).take();
            *destination.slot(target) = value;
        }
        PatchOperation::Copy { from, path } => {
            let source = resolve(from)?;
            let destination = resolve(path)?;
            let value = source.slot(target).clone();
            *destination.slot(target) = value;
        }
        PatchOperation::Test { path, value } => {
            let field = resolve(path)?;
            let expected = as_text(field, value)?;
            let current = field.slot(target).clone();
            if current != expected {
                return Err((
                    field.key().to_string(),
                    format!(
                        "The current value '{}' at path '{}' is not equal to the test value '{}'.",
                        current.unwrap_or_default(),
                        field,
                        expected.unwrap_or_default()
                    ),
                ));
            }
        }
    }
    Ok(())
}
