// Domain layer: entities, wire shapes and ports. No adapters here.

pub mod changes;
pub mod dto;
pub mod model;
pub mod ports;

pub use changes::{Change, ChangeSet, PendingPoint};
pub use model::{City, CityId, MutationOutcome, PointId, PointOfInterest};
pub use ports::{AsyncCityInfoRepository, CityInfoRepository, Notifier};
