use crate::app::response::ApiResponse;
use crate::core::status::{is_healthy, StatusService};
use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository};
use tokio_util::sync::CancellationToken;

/// `/api/status` and `/api/status/version`.
pub struct StatusController<R> {
    service: StatusService<R>,
}

impl<R> StatusController<R>
where
    R: CityInfoRepository + AsyncCityInfoRepository,
{
    pub fn new(service: StatusService<R>) -> Self {
        Self { service }
    }

    pub fn get_status(&self) -> ApiResponse<String> {
        respond(self.service.status())
    }

    pub async fn get_status_async(&self, cancel: &CancellationToken) -> ApiResponse<String> {
        respond(self.service.status_async(cancel).await)
    }

    pub fn get_version(&self) -> ApiResponse<String> {
        ApiResponse::Ok(format!("Version: {}", self.service.version()))
    }
}

fn respond(status: String) -> ApiResponse<String> {
    if is_healthy(&status) {
        ApiResponse::Ok(status)
    } else {
        ApiResponse::Failed(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCityStore;
    use crate::core::status::{HEALTH_CHECK_OK, HEALTH_CHECK_UNKNOWN};
    use std::sync::Arc;

    #[test]
    fn test_unhealthy_store_is_a_server_error() {
        let store = Arc::new(InMemoryCityStore::new());
        let controller = StatusController::new(StatusService::new(store.clone()));
        assert_eq!(controller.get_status(), ApiResponse::Ok(HEALTH_CHECK_OK.to_string()));

        store.set_healthy(false);
        let response = controller.get_status();
        assert_eq!(response.status(), 500);
        assert_eq!(response.body().map(String::as_str), Some(HEALTH_CHECK_UNKNOWN));
    }

    #[test]
    fn test_version_text() {
        let controller = StatusController::new(StatusService::new(Arc::new(InMemoryCityStore::new())));
        let response = controller.get_version();
        assert_eq!(
            response.body().map(String::as_str),
            Some(concat!("Version: ", env!("CARGO_PKG_VERSION")))
        );
    }
}
