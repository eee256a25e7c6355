//! HTTP client for the orchestration API, used by the terminal front end.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{
    AnalysisResponse, AnalyzeRequest, ContentSeriesRequest, ContentSeriesResponse, ErrorResponse,
    HealthResponse, NewsQuery, NewsResponse, SocialContentRequest, SocialContentResponse,
};

pub mod repl;
pub mod session;

pub use session::{Session, SessionRegistry};

#[derive(Error, Debug)]
pub enum ClientError {
    /// The service could not be reached or answered with something unreadable
    #[error("Could not reach the news service: {0}")]
    TransportFailure(String),

    /// The service answered `{success:false, error}`
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A local precondition failed; no request was sent
    #[error("{0}")]
    Precondition(String),
}

impl ClientError {
    fn transport(err: impl std::fmt::Display) -> Self {
        ClientError::TransportFailure(err.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Typed wrapper around the service's HTTP API
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::transport)?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self
            .http
            .get(self.endpoint("health")?)
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode(response).await
    }

    pub async fn generate_news(&self, query: &NewsQuery) -> ClientResult<NewsResponse> {
        let limit = query.limit.to_string();
        let response = self
            .http
            .get(self.endpoint("generate_news")?)
            .query(&[
                ("category", query.category.as_str()),
                ("country", query.country.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode(response).await
    }

    pub async fn create_social_content(
        &self,
        request: &SocialContentRequest,
    ) -> ClientResult<SocialContentResponse> {
        self.post("create_social_content", request).await
    }

    pub async fn create_content_series(
        &self,
        request: &ContentSeriesRequest,
    ) -> ClientResult<ContentSeriesResponse> {
        self.post("create_content_series", request).await
    }

    pub async fn analyze_news(&self, request: &AnalyzeRequest) -> ClientResult<AnalysisResponse> {
        self.post("analyze_news", request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self
            .http
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode(response).await
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path).map_err(ClientError::transport)
    }
}

/// Decode a service response: success bodies into `T`, failure bodies into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(ClientError::transport)?;
    debug!(status = status.as_u16(), bytes = body.len(), "service response received");

    if status == StatusCode::OK {
        return serde_json::from_str(&body).map_err(|e| {
            ClientError::TransportFailure(format!("unexpected response body: {}", e))
        });
    }

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => Err(ClientError::Api {
            status: status.as_u16(),
            message: err.error,
        }),
        Err(_) => Err(ClientError::TransportFailure(format!(
            "service answered {} with an unreadable body",
            status
        ))),
    }
}
