use serde_json::{json, Value};
use shared_kernel::failure::Failure;
use shared_kernel::http_client::HttpClient;
use url::Url;

/// Remote accessor for the prediction model:
/// `POST /predictions/predict` with `{geocode, weeks_ahead}`.
///
/// The response shape belongs to the model service and evolves with it, so
/// it is carried opaquely and not decoded here.
pub struct PredictionApi {
    base: Url,
}

impl PredictionApi {
    pub fn new(base: Url) -> Self {
        PredictionApi { base }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn predict(&self, geocode: &str, weeks_ahead: u8) -> Result<Value, Failure> {
        let base = self.base.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}/predictions/predict"))
            .map_err(|err| Failure::unknown_with_trace(format!("invalid url: {err}")))?;
        let body = json!({ "geocode": geocode, "weeks_ahead": weeks_ahead });
        Ok(HttpClient::post_json::<Value>(url, body).await?)
    }
}
