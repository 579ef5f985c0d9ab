use std::sync::Arc;

use entities::locations::Location;
use preferences::KeyValueStore;
use serde::{Deserialize, Serialize};
use shared_kernel::connectivity::Connectivity;
use shared_kernel::failure::{Failure, CACHE_FAILURE_MESSAGE};

use crate::api::CitiesApi;

pub const SELECTED_LOCATION_KEY: &str = "selected_location";

const MIN_SEARCH_LENGTH: usize = 3;

/// Repository for the city feature: remote search/lookup plus the single
/// persisted slot for the selected location. Every operation returns a
/// `Result` carrying a taxonomy failure; nothing panics across this
/// boundary.
pub struct LocationRepository {
    connectivity: Arc<dyn Connectivity>,
    api: CitiesApi,
    store: Arc<dyn KeyValueStore>,
}

/// Persisted representation of the selected location. Written wholesale
/// under [`SELECTED_LOCATION_KEY`]; schema changes must keep old records
/// readable or treat them as absent.
#[derive(Serialize, Deserialize, Debug)]
struct StoredLocation {
    id: String,
    name: String,
    state: String,
    ibge_code: String,
    latitude: f64,
    longitude: f64,
    population: u64,
}

impl From<&Location> for StoredLocation {
    fn from(location: &Location) -> Self {
        StoredLocation {
            id: location.id.clone(),
            name: location.name.clone(),
            state: location.state.inner(),
            ibge_code: location.ibge_code.inner(),
            latitude: location.latitude,
            longitude: location.longitude,
            population: location.population,
        }
    }
}

impl From<StoredLocation> for Location {
    fn from(stored: StoredLocation) -> Self {
        Location {
            id: stored.id,
            name: stored.name,
            state: stored.state.into(),
            ibge_code: stored.ibge_code.into(),
            latitude: stored.latitude,
            longitude: stored.longitude,
            population: stored.population,
        }
    }
}

fn cache_failure(err: impl std::fmt::Display) -> Failure {
    Failure::cache_with_trace(CACHE_FAILURE_MESSAGE, err.to_string())
}

impl LocationRepository {
    pub fn new(
        connectivity: Arc<dyn Connectivity>,
        api: CitiesApi,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        LocationRepository {
            connectivity,
            api,
            store,
        }
    }

    /// City autocomplete. The query must keep at least 3 characters after
    /// trimming; violations fail before any I/O is attempted.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<Location>, Failure> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LENGTH {
            return Err(Failure::validation(
                "search text must have at least 3 characters",
            ));
        }
        if !self.connectivity.is_reachable().await {
            return Err(Failure::no_connectivity());
        }
        self.api.search(query).await
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn find_by_geocode(&self, geocode: &str) -> Result<Location, Failure> {
        let geocode = geocode.trim();
        if geocode.is_empty() {
            return Err(Failure::validation("geographic code must not be empty"));
        }
        if !self.connectivity.is_reachable().await {
            return Err(Failure::no_connectivity());
        }
        self.api.find_by_geocode(geocode).await
    }

    /// Reads the single cached entry. Absence and store level errors both
    /// surface as `Cache`; connectivity is not consulted.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn get_saved(&self) -> Result<Location, Failure> {
        let raw = self
            .store
            .get_raw(SELECTED_LOCATION_KEY)
            .await
            .map_err(cache_failure)?;
        let raw = raw.ok_or_else(Failure::no_location_selected)?;
        let stored: StoredLocation = serde_json::from_str(&raw).map_err(cache_failure)?;
        Ok(stored.into())
    }

    /// Overwrites the single cached entry wholesale. Local only.
    #[tracing::instrument(skip(self, location), level = "info")]
    pub async fn save(&self, location: &Location) -> Result<(), Failure> {
        let stored = StoredLocation::from(location);
        let raw = serde_json::to_string(&stored).map_err(cache_failure)?;
        self.store
            .put_raw(SELECTED_LOCATION_KEY, raw)
            .await
            .map_err(cache_failure)
    }

    /// Explicit reset of the cached entry.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn clear_saved(&self) -> Result<(), Failure> {
        self.store
            .remove(SELECTED_LOCATION_KEY)
            .await
            .map_err(cache_failure)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use preferences::memory::{BrokenPreferences, InMemoryPreferences};
    use rstest::rstest;
    use serde_json::json;
    use shared_kernel::connectivity::Presumed;
    use shared_kernel::failure::Failure;
    use url::Url;

    use super::{CitiesApi, Location, LocationRepository};

    fn repository_for(server: &MockServer, online: bool) -> LocationRepository {
        LocationRepository::new(
            Arc::new(Presumed(online)),
            CitiesApi::new(Url::parse(&server.base_url()).unwrap()),
            Arc::new(InMemoryPreferences::new()),
        )
    }

    fn curitiba() -> Location {
        Location {
            id: "4106902".to_owned(),
            name: "Curitiba".to_owned(),
            state: "PR".into(),
            ibge_code: "4106902".into(),
            latitude: -25.4284,
            longitude: -49.2733,
            population: 1_963_726,
        }
    }

    #[rstest]
    #[case("")]
    #[case("ab")]
    #[case("  a  ")]
    #[tokio::test]
    async fn short_queries_fail_validation_without_any_io(#[case] query: &str) {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/cities/search");
            then.status(200).json_body(json!([]));
        });

        let result = repository_for(&server, true).search(query).await;
        assert!(matches!(result, Err(Failure::Validation { .. })));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn an_unreachable_network_short_circuits_before_the_remote_call() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/cities/search");
            then.status(200).json_body(json!([]));
        });

        let result = repository_for(&server, false).search("curitiba").await;
        assert_eq!(result, Err(Failure::no_connectivity()));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn search_accepts_both_wire_spellings() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/cities/search")
                .query_param("q", "curitiba");
            then.status(200).json_body(json!([
                {
                    "id": "4106902",
                    "nome": "Curitiba",
                    "uf": "PR",
                    "ibge_code": "4106902",
                    "latitude": -25.4284,
                    "longitude": -49.2733,
                    "populacao": 1963726
                },
                {
                    "id": "4106571",
                    "name": "Curitibanos do Sul",
                    "state": "PR",
                    "ibge_code": "4106571",
                    "latitude": -24.03,
                    "longitude": -50.35,
                    "population": 12000
                }
            ]));
        });

        let results = repository_for(&server, true)
            .search("curitiba")
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], curitiba());
        assert_eq!(results[1].name, "Curitibanos do Sul");
    }

    #[tokio::test]
    async fn a_failing_backend_surfaces_as_a_server_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cities/search");
            then.status(500);
        });

        let result = repository_for(&server, true).search("curitiba").await;
        assert!(matches!(result, Err(Failure::Server { .. })));
    }

    #[tokio::test]
    async fn lookup_of_an_unknown_geocode_surfaces_as_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cities/9999999");
            then.status(404);
        });

        let result = repository_for(&server, true).find_by_geocode("9999999").await;
        assert!(matches!(result, Err(Failure::NotFound { .. })));
    }

    #[tokio::test]
    async fn saved_location_round_trips_with_all_fields_equal() {
        let server = MockServer::start();
        let repository = repository_for(&server, true);

        assert_eq!(
            repository.get_saved().await,
            Err(Failure::no_location_selected())
        );

        repository.save(&curitiba()).await.unwrap();
        assert_eq!(repository.get_saved().await.unwrap(), curitiba());
    }

    #[tokio::test]
    async fn clearing_restores_the_absent_state() {
        let server = MockServer::start();
        let repository = repository_for(&server, true);

        repository.save(&curitiba()).await.unwrap();
        repository.clear_saved().await.unwrap();
        assert_eq!(
            repository.get_saved().await,
            Err(Failure::no_location_selected())
        );
    }

    #[tokio::test]
    async fn store_level_errors_fold_into_cache() {
        let server = MockServer::start();
        let repository = LocationRepository::new(
            Arc::new(Presumed(true)),
            CitiesApi::new(Url::parse(&server.base_url()).unwrap()),
            Arc::new(BrokenPreferences),
        );

        assert!(matches!(
            repository.get_saved().await,
            Err(Failure::Cache { .. })
        ));
        assert!(matches!(
            repository.save(&curitiba()).await,
            Err(Failure::Cache { .. })
        ));
        assert!(matches!(
            repository.clear_saved().await,
            Err(Failure::Cache { .. })
        ));
    }
}
