use std::sync::Arc;

use entities::dashboard::DashboardSnapshot;
use locations::current_location::CurrentLocation;
use state_sync::{CommitTicket, StateCell, ViewState};
use tokio::sync::watch;

use crate::repository::DashboardRepository;

/// Resilient state holder for the dashboard screen.
///
/// `load()` acts from `Idle` or `Error`; `refresh()` re-enters `Loading`
/// from any state. Both walk the context-resolution chain first: current
/// location, one recovery attempt from the persisted copy, then the fixed
/// "no location selected" failure.
pub struct DashboardController {
    cell: StateCell<DashboardSnapshot>,
    current_location: Arc<CurrentLocation>,
    repository: Arc<DashboardRepository>,
}

impl DashboardController {
    pub fn new(
        current_location: Arc<CurrentLocation>,
        repository: Arc<DashboardRepository>,
    ) -> Self {
        DashboardController {
            cell: StateCell::new(),
            current_location,
            repository,
        }
    }

    pub fn state(&self) -> ViewState<DashboardSnapshot> {
        self.cell.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<DashboardSnapshot>> {
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
                self.fail(&ticket, failure);
                return;
            }
        };

        let next = match self.repository.fetch(location.ibge_code.as_ref()).await {
            Ok(snapshot) => ViewState::Success(snapshot),
            Err(failure) => ViewState::Error(failure),
        };
        self.cell.commit(&ticket, next);
    }

    fn fail(&self, ticket: &CommitTicket, failure: shared_kernel::failure::Failure) {
        self.cell.commit(ticket, ViewState::Error(failure));
    }

    pub fn dispose(&self) {
        self.cell.dispose();
    }
}
