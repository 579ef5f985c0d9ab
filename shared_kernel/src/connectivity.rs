use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use url::Url;

/// Reports current network reachability. Awaited before every remote
/// attempt; implementations answer with a plain boolean and never error.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Probes a well known endpoint with a short timeout. Any response at all,
/// including an error status, counts as reachable; only a failure to get a
/// response does not.
pub struct HttpProbe {
    client: reqwest::Client,
    probe_url: Url,
}

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

impl HttpProbe {
    pub fn new(probe_url: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .context("Failed to build the connectivity probe client")?;
        Ok(HttpProbe { client, probe_url })
    }
}

#[async_trait]
impl Connectivity for HttpProbe {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn is_reachable(&self) -> bool {
        self.client
            .head(self.probe_url.clone())
            .send()
            .await
            .is_ok()
    }
}

/// A fixed answer. Used by tests and by callers that want to bypass the
/// probe entirely.
pub struct Presumed(pub bool);

#[async_trait]
impl Connectivity for Presumed {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use url::Url;

    use super::{Connectivity, HttpProbe, Presumed};

    #[tokio::test]
    async fn a_responding_endpoint_is_reachable_even_on_an_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::HEAD).path("/generate_204");
            then.status(503);
        });

        let probe = HttpProbe::new(Url::parse(&server.url("/generate_204")).unwrap()).unwrap();
        assert!(probe.is_reachable().await);
    }

    #[tokio::test]
    async fn a_dead_endpoint_is_unreachable() {
        let probe = HttpProbe::new(Url::parse("http://127.0.0.1:9/generate_204").unwrap()).unwrap();
        assert!(!probe.is_reachable().await);
    }

    #[tokio::test]
    async fn presumed_answers_are_fixed() {
        assert!(Presumed(true).is_reachable().await);
        assert!(!Presumed(false).is_reachable().await);
    }
}
