use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use dashboard::api::DashboardApi;
use dashboard::controller::DashboardController;
use dashboard::repository::DashboardRepository;
use heatmap::api::HeatmapApi;
use heatmap::controller::HeatmapController;
use heatmap::repository::HeatmapRepository;
use locations::api::CitiesApi;
use locations::controller::LocationSearchController;
use locations::current_location::CurrentLocation;
use locations::repository::LocationRepository;
use predictions::api::PredictionApi;
use predictions::controller::PredictionController;
use predictions::repository::PredictionRepository;
use preferences::{FilePreferences, KeyValueStore};
use shared_kernel::connectivity::{Connectivity, HttpProbe};
use url::Url;

use crate::config::{Settings, SETTINGS_CONFIG};

/// Everything the screens need, wired once. Producers and consumers of the
/// current-location dependency meet here and nowhere else.
pub struct Application {
    pub current_location: Arc<CurrentLocation>,
    pub location_search: LocationSearchController,
    pub dashboard: DashboardController,
    pub heatmap: HeatmapController,
    pub prediction: PredictionController,
}

impl Application {
    /// Wires the container against the checked-in configuration.
    pub fn bootstrap() -> anyhow::Result<Self> {
        let settings = SETTINGS_CONFIG.clone();
        let probe_url = Url::parse(&settings.api.probe_url).context("Invalid probe url")?;
        let connectivity: Arc<dyn Connectivity> = Arc::new(HttpProbe::new(probe_url)?);
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FilePreferences::new(&storage_directory(&settings)?));
        Self::new(&settings, connectivity, store)
    }

    /// Wires the container from explicit collaborators. Tests hand in a
    /// fixed connectivity answer and an in-memory store here.
    pub fn new(
        settings: &Settings,
        connectivity: Arc<dyn Connectivity>,
        store: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let base = Url::parse(&settings.api.host).context("Invalid api host")?;

        let location_repository = Arc::new(LocationRepository::new(
            Arc::clone(&connectivity),
            CitiesApi::new(base.clone()),
            store,
        ));
        let current_location = Arc::new(CurrentLocation::new(Arc::clone(&location_repository)));

        let dashboard_repository = Arc::new(DashboardRepository::new(
            Arc::clone(&connectivity),
            DashboardApi::new(base.clone()),
        ));
        let heatmap_repository = Arc::new(HeatmapRepository::new(
            Arc::clone(&connectivity),
            HeatmapApi::new(base.clone()),
        ));
        let prediction_repository = Arc::new(PredictionRepository::new(
            Arc::clone(&connectivity),
            PredictionApi::new(base),
        ));

        Ok(Application {
            location_search: LocationSearchController::new(location_repository),
            dashboard: DashboardController::new(
                Arc::clone(&current_location),
                dashboard_repository,
            ),
            heatmap: HeatmapController::new(
                settings.heatmap.default_region.as_str().into(),
                heatmap_repository,
            ),
            prediction: PredictionController::new(
                Arc::clone(&current_location),
                prediction_repository,
                settings.predictions.weeks_ahead,
            ),
            current_location,
        })
    }

    /// Disposes every controller; late results are discarded from then on.
    pub fn shutdown(&self) {
        self.location_search.dispose();
        self.dashboard.dispose();
        self.heatmap.dispose();
        self.prediction.dispose();
    }
}

fn storage_directory(settings: &Settings) -> anyhow::Result<PathBuf> {
    if let Some(directory) = &settings.storage.directory {
        return Ok(PathBuf::from(directory));
    }
    directories::ProjectDirs::from("br", "Dengo", "dengo")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .context("Failed to resolve the platform data directory")
}
