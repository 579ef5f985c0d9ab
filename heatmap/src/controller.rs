use std::sync::Arc;
use std::sync::Mutex;

use entities::heatmap::{AggregationPeriod, HeatmapSnapshot};
use entities::locations::RegionCode;
use state_sync::{StateCell, ViewState};
use tokio::sync::watch;

use crate::repository::HeatmapRepository;

/// State holder for the heatmap screen, carrying the selectable aggregation
/// period as a secondary dimension. The period defaults to the current week
/// and is never restored from persistence; there is no location-recovery
/// chain here — the region is fixed at construction.
pub struct HeatmapController {
    cell: StateCell<HeatmapSnapshot>,
    repository: Arc<HeatmapRepository>,
    region: RegionCode,
    period: Mutex<AggregationPeriod>,
}

impl HeatmapController {
    pub fn new(region: RegionCode, repository: Arc<HeatmapRepository>) -> Self {
        HeatmapController {
            cell: StateCell::new(),
            repository,
            region,
            period: Mutex::new(AggregationPeriod::default()),
        }
    }

    pub fn state(&self) -> ViewState<HeatmapSnapshot> {
        self.cell.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<HeatmapSnapshot>> {
        self.cell.subscribe()
    }

    pub fn period(&self) -> AggregationPeriod {
        *self.period.lock().unwrap()
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn load(&self) {
        match self.cell.current() {
            ViewState::Idle | ViewState::Error(_) => {}
            _ => return,
        }
        self.run().await;
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn refresh(&self) {
        self.run().await;
    }

    /// Selecting the already-active period is a no-op; a new value re-enters
    /// `Loading` and refetches with the new token.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn set_period(&self, period: AggregationPeriod) {
        {
            let mut current = self.period.lock().unwrap();
            if *current == period {
                return;
            }
            *current = period;
        }
        self.run().await;
    }

    async fn run(&self) {
        let ticket = self.cell.begin();
        self.cell.commit(&ticket, ViewState::Loading);

        let period = self.period();
        let next = match self.repository.fetch(self.region.as_ref(), period).await {
            Ok(snapshot) => ViewState::Success(snapshot),
            Err(failure) => ViewState::Error(failure),
        };
        self.cell.commit(&ticket, next);
    }

    pub fn dispose(&self) {
        self.cell.dispose();
    }
}
