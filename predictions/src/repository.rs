use std::sync::Arc;

use serde_json::Value;
use shared_kernel::connectivity::Connectivity;
use shared_kernel::failure::Failure;

use crate::api::PredictionApi;

/// Repository for the prediction feature. The payload stays opaque; only
/// the resilience contract (validation, connectivity gate, taxonomy fold)
/// is owned here.
pub struct PredictionRepository {
    connectivity: Arc<dyn Connectivity>,
    api: PredictionApi,
}

impl PredictionRepository {
    pub fn new(connectivity: Arc<dyn Connectivity>, api: PredictionApi) -> Self {
        PredictionRepository { connectivity, api }
    }

    #[tracing::instrument(skip(self), level = "info")]
    pub async fn predict(&self, geocode: &str, weeks_ahead: u8) -> Result<Value, Failure> {
        let geocode = geocode.trim();
        if geocode.is_empty() {
            return Err(Failure::validation("geographic code must not be empty"));
        }
        if !self.connectivity.is_reachable().await {
            return Err(Failure::no_connectivity());
        }
        self.api.predict(geocode, weeks_ahead).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;
    use shared_kernel::connectivity::Presumed;
    use shared_kernel::failure::Failure;
    use url::Url;

    use super::{PredictionApi, PredictionRepository};

    pub(crate) fn repository_for(server: &MockServer, online: bool) -> PredictionRepository {
        PredictionRepository::new(
            Arc::new(Presumed(online)),
            PredictionApi::new(Url::parse(&server.base_url()).unwrap()),
        )
    }

    pub(crate) fn prediction_body() -> serde_json::Value {
        json!({
            "geocode": "4106902",
            "predictions": [
                { "week": 1, "predicted_cases": 31, "confidence": 0.82 },
                { "week": 2, "predicted_cases": 28, "confidence": 0.75 }
            ],
            "trend": "subindo",
            "model": { "name": "lstm", "version": "1.3.0" }
        })
    }

    #[tokio::test]
    async fn the_opaque_payload_is_returned_untouched() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/predictions/predict")
                .json_body(json!({ "geocode": "4106902", "weeks_ahead": 2 }));
            then.status(200).json_body(prediction_body());
        });

        let payload = repository_for(&server, true)
            .predict("4106902", 2)
            .await
            .unwrap();
        assert_eq!(payload, prediction_body());
    }

    #[tokio::test]
    async fn an_empty_geocode_fails_validation_without_any_io() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/predictions/predict");
            then.status(200).json_body(prediction_body());
        });

        let result = repository_for(&server, true).predict("", 2).await;
        assert!(matches!(result, Err(Failure::Validation { .. })));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn an_unreachable_network_short_circuits_before_the_remote_call() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/predictions/predict");
            then.status(200).json_body(prediction_body());
        });

        let result = repository_for(&server, false).predict("4106902", 2).await;
        assert_eq!(result, Err(Failure::no_connectivity()));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn insufficient_data_answers_fold_by_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predictions/predict");
            then.status(422);
        });

        let result = repository_for(&server, true).predict("4106902", 2).await;
        assert!(matches!(result, Err(Failure::Server { .. })));
    }
}
