use crate::domain::ports::{AsyncCityInfoRepository, CityInfoRepository};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const HEALTH_CHECK_OK: &str = "Health Check OK";
pub const HEALTH_CHECK_UNKNOWN: &str = "Unknown Error";

pub struct StatusService<R> {
    repository: Arc<R>,
}

impl<R> StatusService<R>
where
    R: CityInfoRepository + AsyncCityInfoRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Never fails: store errors are folded into the returned text.
    pub fn status(&self) -> String {
        describe(self.repository.health_check())
    }

    pub async fn status_async(&self, cancel: &CancellationToken) -> String {
        describe(self.repository.health_check_async(cancel).await)
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

pub fn is_healthy(status: &str) -> bool {
    status == HEALTH_CHECK_OK
}

fn describe(health: Result<bool>) -> String {
    match health {
        Ok(true) => HEALTH_CHECK_OK.to_string(),
        Ok(false) => HEALTH_CHECK_UNKNOWN.to_string(),
        Err(e) => {
            tracing::error!(operation = "status", error = %e, "Health check failed");
            format!("Error:{}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCityStore;

    #[test]
    fn test_status_reflects_store_health() {
        let store = Arc::new(InMemoryCityStore::new());
        let service = StatusService::new(store.clone());
        assert_eq!(service.status(), HEALTH_CHECK_OK);

        store.set_healthy(false);
        assert_eq!(service.status(), HEALTH_CHECK_UNKNOWN);
        assert!(!is_healthy(&service.status()));
    }

    #[tokio::test]
    async fn test_status_async_is_cancellable() {
        let service = StatusService::new(Arc::new(InMemoryCityStore::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(service.status_async(&cancel).await.starts_with("Error:"));
    }

    #[test]
    fn test_version_is_crate_version() {
        let service = StatusService::new(Arc::new(InMemoryCityStore::new()));
        assert_eq!(service.version(), env!("CARGO_PKG_VERSION"));
    }
}
