use std::sync::Arc;

use entities::heatmap::{AggregationPeriod, HeatmapSnapshot};
use shared_kernel::connectivity::Connectivity;
use shared_kernel::failure::Failure;

use crate::api::HeatmapApi;

/// Repository for the heatmap feature. Same single-attempt contract as the
/// other repositories; the aggregation period travels with every fetch.
pub struct HeatmapRepository {
    connectivity: Arc<dyn Connectivity>,
    api: HeatmapApi,
}

impl HeatmapRepository {
    pub fn new(connectivity: Arc<dyn Connectivity>, api: HeatmapApi) -> Self {
        HeatmapRepository { connectivity, api }
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        region: &str,
        period: AggregationPeriod,
    ) -> Result<HeatmapSnapshot, Failure> {
        let region = region.trim();
        if region.is_empty() {
            return Err(Failure::validation("region code must not be empty"));
        }
        if !self.connectivity.is_reachable().await {
            return Err(Failure::no_connectivity());
        }
        self.api.fetch(region, period).await
    }
}
