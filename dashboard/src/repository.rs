use std::sync::Arc;

use entities::dashboard::DashboardSnapshot;
use shared_kernel::connectivity::Connectivity;
use shared_kernel::failure::Failure;

use crate::api::DashboardApi;

/// Repository for the dashboard feature. Exactly one of
/// `{Validation, Network, <transport fold>, success}` per call; a single
/// best-effort attempt with no retry, backoff or cancellation.
pub struct DashboardRepository {
    connectivity: Arc<dyn Connectivity>,
    api: DashboardApi,
}

impl DashboardRepository {
    pub fn new(connectivity: Arc<dyn Connectivity>, api: DashboardApi) -> Self {
        DashboardRepository { connectivity, api }
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn fetch(&self, geocode: &str) -> Result<DashboardSnapshot, Failure> {
        let geocode = geocode.trim();
        if geocode.is_empty() {
            return Err(Failure::validation("geographic code must not be empty"));
        }
        if !self.connectivity.is_reachable().await {
            return Err(Failure::no_connectivity());
        }
        self.api.fetch(geocode).await
    }
}
