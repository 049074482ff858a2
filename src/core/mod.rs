pub mod cities;
pub mod logging;
pub mod mapping;
pub mod patch;
pub mod points_of_interest;
pub mod status;

pub use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository, Notifier};
pub use crate::utils::error::Result;
pub use cities::{CitiesPipeline, CitiesService};
pub use logging::Logged;
pub use mapping::{Mapper, MappingConfig};
pub use patch::{PatchDocument, PatchOperation};
pub use points_of_interest::{PointsOfInterestPipeline, PointsOfInterestService};
pub use status::StatusService;
