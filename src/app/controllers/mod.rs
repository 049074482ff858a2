pub mod cities;
pub mod points_of_interest;
pub mod status;

pub use cities::CitiesController;
pub use points_of_interest::{point_location, PointsOfInterestController};
pub use status::StatusController;
