use serde::{Deserialize, Serialize};

pub type CityId = i32;
pub type PointId = i32;

/// Identity carried by entities that have not been persisted yet.
pub const UNASSIGNED_ID: i32 = 0;

/// Persisted city with its owned points of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    /// Populated only when the store was asked to include children.
    pub points_of_interest: Vec<PointOfInterest>,
}

impl City {
    pub fn new(name: impl Into<String>, description: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            description: Some(description.into()),
            link: Some(link.into()),
            points_of_interest: Vec::new(),
        }
    }

    pub fn with_point(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.points_of_interest.push(PointOfInterest {
            id: UNASSIGNED_ID,
            name: name.into(),
            description: Some(description.into()),
            city_id: self.id,
        });
        self
    }
}

/// Persisted point of interest. Always owned by exactly one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PointId,
    pub name: String,
    pub description: Option<String>,
    pub city_id: CityId,
}

/// Result of a mutation that may target a missing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    NotFound,
}
