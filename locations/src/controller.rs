use std::sync::Arc;
use std::sync::Mutex;

use entities::locations::Location;
use state_sync::{StateCell, ViewState};
use tokio::sync::watch;

use crate::repository::LocationRepository;

/// Drives the city search screen. The query is the required context here,
/// so there is no location-recovery chain; validation failures surface as
/// `Error` like any other failure.
pub struct LocationSearchController {
    cell: StateCell<Vec<Location>>,
    repository: Arc<LocationRepository>,
    last_query: Mutex<Option<String>>,
}

impl LocationSearchController {
    pub fn new(repository: Arc<LocationRepository>) -> Self {
        LocationSearchController {
            cell: StateCell::new(),
            repository,
            last_query: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ViewState<Vec<Location>> {
        self.cell.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<Location>>> {
        self.cell.subscribe()
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) {
        *self.last_query.lock().unwrap() = Some(query.to_owned());

        let ticket = self.cell.begin();
        self.cell.commit(&ticket, ViewState::Loading);

        let next = match self.repository.search(query).await {
            Ok(results) => ViewState::Success(results),
            Err(failure) => ViewState::Error(failure),
        };
        self.cell.commit(&ticket, next);
    }

    /// Re-runs the last submitted query; a refresh before any search is a
    /// no-op.
    pub async fn refresh(&self) {
        let query = self.last_query.lock().unwrap().clone();
        if let Some(query) = query {
            self.search(&query).await;
        }
    }

    pub fn dispose(&self) {
        self.cell.dispose();
    }
}
