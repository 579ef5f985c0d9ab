use std::sync::Arc;

use entities::locations::Location;
use shared_kernel::failure::Failure;
use state_sync::Observable;
use tokio::sync::watch;

use crate::repository::LocationRepository;

/// The reactive "current location" dependency observed by every feature
/// that needs one. Holds the in-memory slot and the recovery entry point
/// that falls back to the persisted copy.
pub struct CurrentLocation {
    slot: Observable<Option<Location>>,
    repository: Arc<LocationRepository>,
}

impl CurrentLocation {
    pub fn new(repository: Arc<LocationRepository>) -> Self {
        CurrentLocation {
            slot: Observable::new(None),
            repository,
        }
    }

    pub fn get(&self) -> Option<Location> {
        self.slot.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Location>> {
        self.slot.subscribe()
    }

    /// Single recovery attempt: when the slot is empty, read the persisted
    /// copy and publish it. A failed read leaves the slot empty; the caller
    /// decides what that means.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn recover(&self) {
        if self.slot.get().is_some() {
            return;
        }
        if let Ok(saved) = self.repository.get_saved().await {
            self.slot.set(Some(saved));
        }
    }

    /// The context-resolution chain: current value, else one recovery
    /// attempt, else the fixed "no location selected" failure. No automatic
    /// retry beyond the single attempt; selection must complete before the
    /// caller re-triggers.
    pub async fn resolve(&self) -> Result<Location, Failure> {
        if let Some(location) = self.slot.get() {
            return Ok(location);
        }
        self.recover().await;
        self.slot.get().ok_or_else(Failure::no_location_selected)
    }

    /// Completes a selection from search results: persists the location and
    /// publishes it to every subscriber.
    #[tracing::instrument(skip(self, location), level = "info")]
    pub async fn select(&self, location: Location) -> Result<(), Failure> {
        self.repository.save(&location).await?;
        self.slot.set(Some(location));
        Ok(())
    }

    /// Explicit reset: clears the persisted copy and empties the slot.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn reset(&self) -> Result<(), Failure> {
        self.repository.clear_saved().await?;
        self.slot.set(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use preferences::memory::InMemoryPreferences;
    use shared_kernel::connectivity::Presumed;
    use shared_kernel::failure::Failure;
    use url::Url;

    use crate::api::CitiesApi;
    use crate::repository::LocationRepository;

    use super::{CurrentLocation, Location};

    fn repository() -> Arc<LocationRepository> {
        Arc::new(LocationRepository::new(
            Arc::new(Presumed(true)),
            CitiesApi::new(Url::parse("http://localhost:0/").unwrap()),
            Arc::new(InMemoryPreferences::new()),
        ))
    }

    fn maringa() -> Location {
        Location {
            id: "4115200".to_owned(),
            name: "Maringá".to_owned(),
            state: "PR".into(),
            ibge_code: "4115200".into(),
            latitude: -23.4205,
            longitude: -51.9333,
            population: 430_157,
        }
    }

    #[tokio::test]
    async fn resolve_fails_with_the_fixed_message_when_nothing_is_saved() {
        let current = CurrentLocation::new(repository());
        assert_eq!(
            current.resolve().await,
            Err(Failure::no_location_selected())
        );
        assert_eq!(current.get(), None);
    }

    #[tokio::test]
    async fn resolve_recovers_the_persisted_copy_and_publishes_it() {
        let repository = repository();
        repository.save(&maringa()).await.unwrap();

        let current = CurrentLocation::new(repository);
        let mut subscription = current.subscribe();

        let resolved = current.resolve().await.unwrap();
        assert_eq!(resolved, maringa());

        subscription.changed().await.unwrap();
        assert_eq!(subscription.borrow().as_ref(), Some(&maringa()));
    }

    #[tokio::test]
    async fn select_persists_and_notifies() {
        let repository = repository();
        let current = CurrentLocation::new(Arc::clone(&repository));

        current.select(maringa()).await.unwrap();
        assert_eq!(current.get(), Some(maringa()));
        assert_eq!(repository.get_saved().await.unwrap(), maringa());
    }

    #[tokio::test]
    async fn reset_returns_to_the_unselected_state() {
        let repository = repository();
        let current = CurrentLocation::new(Arc::clone(&repository));

        current.select(maringa()).await.unwrap();
        current.reset().await.unwrap();
        assert_eq!(current.get(), None);
        assert_eq!(
            repository.get_saved().await,
            Err(Failure::no_location_selected())
        );
    }
}
