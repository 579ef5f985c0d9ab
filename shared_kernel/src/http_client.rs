use lazy_static::lazy_static;
use reqwest::StatusCode;
use reqwest_tracing::TracingMiddleware;
use thiserror::Error as ThisError;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::failure::Failure;

lazy_static! {
    static ref CLIENT: ClientWithMiddleware = ClientBuilder::new(reqwest::Client::new())
        .with(TracingMiddleware::default())
        .build();
}

pub struct HttpClient;

/// Transport level errors. Status, decode and connection level causes stay
/// distinguishable so that the repository boundary can fold them into the
/// failure taxonomy without losing what the transport already knows.
#[derive(ThisError, Debug)]
pub enum HttpError {
    #[error("{url} responded with status {status}")]
    UnexpectedStatus { status: StatusCode, url: Url },
    #[error("failed to decode response from {url}: {source}")]
    Decode { url: Url, source: reqwest::Error },
    #[error(transparent)]
    Transport(#[from] reqwest_middleware::Error),
}

impl HttpClient {
    async fn send_checked(
        request: reqwest_middleware::RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, HttpError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::UnexpectedStatus {
                status,
                url: url.clone(),
            });
        }
        Ok(response)
    }

    async fn decode_json<DTO: DeserializeOwned>(
        response: reqwest::Response,
        url: &Url,
    ) -> Result<DTO, HttpError> {
        response
            .json::<DTO>()
            .await
            .map_err(|source| HttpError::Decode {
                url: url.clone(),
                source,
            })
    }

    pub async fn get_json<DTO: DeserializeOwned>(url: Url) -> Result<DTO, HttpError> {
        let response = Self::send_checked(CLIENT.get(url.clone()), &url).await?;
        Self::decode_json(response, &url).await
    }

    pub async fn post_json<DTO: DeserializeOwned>(url: Url, body: Value) -> Result<DTO, HttpError> {
        let response = Self::send_checked(CLIENT.post(url.clone()).json(&body), &url).await?;
        Self::decode_json(response, &url).await
    }
}

impl From<HttpError> for Failure {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::UnexpectedStatus { status, url } => {
                let message = format!("server responded with status {status}");
                let trace = url.to_string();
                match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Failure::Authentication {
                        message,
                        trace: Some(trace),
                    },
                    StatusCode::NOT_FOUND => Failure::NotFound {
                        message,
                        trace: Some(trace),
                    },
                    StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Failure::Timeout {
                        message,
                        trace: Some(trace),
                    },
                    _ => Failure::Server {
                        message,
                        trace: Some(trace),
                    },
                }
            }
            HttpError::Decode { url, source } => Failure::parse(format!("{url}: {source}")),
            HttpError::Transport(err) => {
                let timed_out = matches!(
                    &err,
                    reqwest_middleware::Error::Reqwest(source) if source.is_timeout()
                );
                if timed_out {
                    Failure::timeout("request timed out")
                } else {
                    Failure::server_with_trace("failed to reach the server", err.to_string())
                }
            }
        }
    }
}
