//! Remote data source for the character REST API.

use std::{future::Future, time::Duration};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::CharacterId,
    error::FetchError,
    protocol::{CharacterPayload, CharactersResponse},
};
use tracing::{debug, warn};

/// Transport-level parameters for one list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterPageQuery {
    pub page: u32,
    pub name: Option<String>,
    pub status: Option<&'static str>,
    pub species: Option<String>,
    pub kind: Option<String>,
    pub gender: Option<&'static str>,
}

impl CharacterPageQuery {
    /// Query pairs sent to the server; blank values are left out.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        let optional = [
            ("name", self.name.as_deref()),
            ("status", self.status),
            ("species", self.species.as_deref()),
            ("type", self.kind.as_deref()),
            ("gender", self.gender),
        ];
        for (key, value) in optional {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct CharactersApi {
    http: Client,
    base_url: String,
    request_timeout: Duration,
}

impl CharactersApi {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Bounds one whole call, connect through body decode.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_character_page(
        &self,
        query: &CharacterPageQuery,
    ) -> Result<CharactersResponse, FetchError> {
        let pairs = query.to_pairs();
        debug!(page = query.page, params = pairs.len(), "fetching character page");
        let request = self
            .http
            .get(format!("{}/character", self.base_url))
            .query(&pairs);
        self.bounded(async move {
            let response = request.send().await.map_err(classify_transport_error)?;
            decode(response).await
        })
        .await
    }

    pub async fn fetch_character(&self, id: CharacterId) -> Result<CharacterPayload, FetchError> {
        debug!(character_id = id.0, "fetching character");
        let request = self
            .http
            .get(format!("{}/character/{}", self.base_url, id.0));
        self.bounded(async move {
            let response = request.send().await.map_err(classify_transport_error)?;
            decode(response).await
        })
        .await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "character api call exceeded request timeout"
                );
                Err(FetchError::RequestTimeout)
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if let Some(err) = FetchError::from_status(status.as_u16()) {
        warn!(status = status.as_u16(), url = %response.url(), "character api rejected request");
        return Err(err);
    }
    response.json::<T>().await.map_err(classify_transport_error)
}

/// Sorts a `reqwest` failure into the fetch error taxonomy.
pub fn classify_transport_error(err: reqwest::Error) -> FetchError {
    // Connect and socket read timeouts both mean the server is unreachable;
    // the whole-call timeout is enforced by `CharactersApi` itself.
    if err.is_connect() || err.is_timeout() {
        return FetchError::Connectivity(err.to_string());
    }
    if let Some(status) = err.status() {
        if let Some(mapped) = FetchError::from_status(status.as_u16()) {
            return mapped;
        }
    }
    if err.is_decode() {
        return FetchError::Decode(format!("invalid response payload: {err}"));
    }
    if err.is_request() || err.is_body() {
        return FetchError::Connectivity(err.to_string());
    }
    FetchError::Unexpected(err.to_string())
}
