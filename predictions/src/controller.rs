use std::sync::Arc;

use locations::current_location::CurrentLocation;
use serde_json::Value;
use state_sync::{StateCell, ViewState};
use tokio::sync::watch;

use crate::repository::PredictionRepository;

/// Resilient state holder for the prediction screen. Same contract as the
/// dashboard controller: context-resolution chain first, then a single
/// fetch, every commit liveness- and generation-gated. The horizon is fixed
/// at construction.
pub struct PredictionController {
    cell: StateCell<Value>,
    current_location: Arc<CurrentLocation>,
    repository: Arc<PredictionRepository>,
    weeks_ahead: u8,
}

impl PredictionController {
    pub fn new(
        current_location: Arc<CurrentLocation>,
        repository: Arc<PredictionRepository>,
        weeks_ahead: u8,
    ) -> Self {
        PredictionController {
            cell: StateCell::new(),
            current_location,
            repository,
            weeks_ahead,
        }
    }

    pub fn state(&self) -> ViewState<Value> {
        self.cell.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Value>> {
        self.cell.subscribe()
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

    async fn run(&self) {
        let ticket = self.cell.begin();
        self.cell.commit(&ticket, ViewState::Loading);

        let location = match self.current_location.resolve().await {
            Ok(location) => location,
            Err(failure) => {
                self.cell.commit(&ticket, ViewState::Error(failure));
                return;
            }
        };

        let next = match self
            .repository
            .predict(location.ibge_code.as_ref(), self.weeks_ahead)
            .await
        {
            Ok(payload) => ViewState::Success(payload),
            Err(failure) => ViewState::Error(failure),
        };
        self.cell.commit(&ticket, next);
    }

    pub fn dispose(&self) {
        self.cell.dispose();
    }
}
