// App layer: transport-facing controllers and the request dispatcher that
// wires stores, notifiers and pipelines together.

pub mod controllers;
pub mod request;
pub mod response;

pub use controllers::{CitiesController, PointsOfInterestController, StatusController};
pub use request::{Reply, Request};
pub use response::ApiResponse;

use crate::core::cities::CitiesService;
use crate::core::logging::Logged;
use crate::core::mapping::Mapper;
use crate::core::points_of_interest::PointsOfInterestService;
use crate::core::status::StatusService;
use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository, Notifier};
use std::sync::Arc;
use request::parse_body;
use tokio_util::sync::CancellationToken;

type Cities<R> = Logged<CitiesService<R>>;
type PointsOfInterest<R> = Logged<PointsOfInterestService<R, dyn Notifier>>;

/// Controllers over one store, with every pipeline behind the error-logging
/// decorator.
pub struct Application<R> {
    cities: CitiesController<Cities<R>>,
    points_of_interest: PointsOfInterestController<PointsOfInterest<R>>,
    status: StatusController<R>,
}

impl<R> Application<R>
where
    R: CityInfoRepository + AsyncCityInfoRepository + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<dyn Notifier>, mapper: Mapper) -> Self {
        let cities = Logged::new(CitiesService::new(repository.clone(), mapper.clone()));
        let points_of_interest = Logged::new(PointsOfInterestService::new(
            repository.clone(),
            notifier,
            mapper.clone(),
        ));
        Self {
            cities: CitiesController::new(cities),
            points_of_interest: PointsOfInterestController::new(points_of_interest, mapper),
            status: StatusController::new(StatusService::new(repository)),
        }
    }

    pub fn cities(&self) -> &CitiesController<Cities<R>> {
        &self.cities
    }

    pub fn points_of_interest(&self) -> &PointsOfInterestController<PointsOfInterest<R>> {
        &self.points_of_interest
    }

    pub fn status(&self) -> &StatusController<R> {
        &self.status
    }

    pub fn handle(&self, request: &Request) -> Reply {
        tracing::debug!(?request, "Handling request");
        let points = &self.points_of_interest;
        match request {
            Request::Cities => self.cities.get_cities().into(),
            Request::AllCityInfo => self.cities.get_all_city_info().into(),
            Request::City {
                id,
                include_points_of_interest,
            } => self.cities.get_city(*id, *include_points_of_interest).into(),
            Request::PointsOfInterest { city_id } => points.get_points_of_interest(*city_id).into(),
            Request::PointOfInterest { city_id, id } => {
                points.get_point_of_interest(*city_id, *id).into()
            }
            Request::CreatePointOfInterest { city_id, body } => match parse_body(body) {
                Ok(input) => points.create_point_of_interest(*city_id, input.as_ref()).into(),
                Err(errors) => Reply::bad_request(errors),
            },
            Request::UpdatePointOfInterest { city_id, id, body } => match parse_body(body) {
                Ok(input) => points.update_point_of_interest(*city_id, *id, input.as_ref()).into(),
                Err(errors) => Reply::bad_request(errors),
            },
            Request::PatchPointOfInterest { city_id, id, body } => match parse_body(body) {
                Ok(patch) => points
                    .partially_update_point_of_interest(*city_id, *id, patch.as_ref())
                    .into(),
                Err(errors) => Reply::bad_request(errors),
            },
            Request::DeletePointOfInterest { city_id, id } => {
                points.delete_point_of_interest(*city_id, *id).into()
            }
            Request::Status => self.status.get_status().into(),
            Request::Version => self.status.get_version().into(),
        }
    }

    pub async fn handle_async(&self, request: &Request, cancel: &CancellationToken) -> Reply {
        tracing::debug!(?request, "Handling request");
        let points = &self.points_of_interest;
        match request {
            Request::Cities => self.cities.get_cities_async(cancel).await.into(),
            Request::AllCityInfo => self.cities.get_all_city_info_async(cancel).await.into(),
            Request::City {
                id,
                include_points_of_interest,
            } => self
                .cities
                .get_city_async(*id, *include_points_of_interest, cancel)
                .await
                .into(),
            Request::PointsOfInterest { city_id } => {
                points.get_points_of_interest_async(*city_id, cancel).await.into()
            }
            Request::PointOfInterest { city_id, id } => points
                .get_point_of_interest_async(*city_id, *id, cancel)
                .await
                .into(),
            Request::CreatePointOfInterest { city_id, body } => match parse_body(body) {
                Ok(input) => points
                    .create_point_of_interest_async(*city_id, input.as_ref(), cancel)
                    .await
                    .into(),
                Err(errors) => Reply::bad_request(errors),
            },
            Request::UpdatePointOfInterest { city_id, id, body } => match parse_body(body) {
                Ok(input) => points
                    .update_point_of_interest_async(*city_id, *id, input.as_ref(), cancel)
                    .await
                    .into(),
                Err(errors) => Reply::bad_request(errors),
            },
            Request::PatchPointOfInterest { city_id, id, body } => match parse_body(body) {
                Ok(patch) => points
                    .partially_update_point_of_interest_async(*city_id, *id, patch.as_ref(), cancel)
                    .await
                    .into(),
                Err(errors) => Reply::bad_request(errors),
            },
            Request::DeletePointOfInterest { city_id, id } => points
                .delete_point_of_interest_async(*city_id, *id, cancel)
                .await
                .into(),
            Request::Status => self.status.get_status_async(cancel).await.into(),
            Request::Version => self.status.get_version().into(),
        }
    }
}
