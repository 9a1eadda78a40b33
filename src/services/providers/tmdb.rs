//! TMDB (The Movie Database) metadata provider
//!
//! API Flow:
//! 1. Details: /3/movie/{id}?api_key=...&language=en-US → poster, overview, rating, genres
//!
//! Every outbound call waits a fixed delay first and is bounded by the client timeout.
//! Nothing is retried.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, TmdbMovie},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    request_delay: Duration,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        timeout: Duration,
        request_delay: Duration,
        cache: Option<Cache>,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            request_delay,
            cache,
        })
    }

    /// Calls `GET /3/movie/{id}`
    async fn call_api(&self, external_id: i64) -> AppResult<MovieDetails> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let url = format!("{}/3/movie/{}", self.api_url, external_id);

        tracing::debug!(external_id, "Fetching movie details from TMDB");

        // Errors are stripped of their URL so the API key never reaches the logs
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {} for movie {}",
                status, external_id
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        let movie: TmdbMovie = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(external_id, response = %body, "Unparseable TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let details = MovieDetails::from_tmdb(external_id, movie);

        tracing::info!(
            external_id,
            has_poster = details.poster_path.is_some(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, external_id: i64) -> AppResult<MovieDetails> {
        let key = CacheKey::MovieDetails(external_id);
        cached!(self.cache.as_ref(), key, DETAILS_CACHE_TTL, async move {
            self.call_api(external_id).await
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
