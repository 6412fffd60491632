//! `TmdbClient` - TMDB API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::MovieApi;
use super::types::{TmdbErrorResponse, TmdbMovie, TmdbMoviePage};
use super::urls::{TmdbUrls, redact_api_key};

/// TMDB API client.
///
/// Holds no credentials and no mutable state; the API key is passed to
/// each call.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Endpoint URL builder.
    urls: TmdbUrls,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    ///
    /// A trailing `/` is added when missing, so `http://host/3` and
    /// `http://host/3/` resolve endpoints the same way.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a total request timeout (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let urls = if let Some(url) = self.base_url {
            TmdbUrls::new(url)
        } else {
            TmdbUrls::themoviedb()?
        };

        let mut builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(TmdbClient { http_client, urls })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the URL builder this client requests against.
    #[must_use]
    pub const fn urls(&self) -> &TmdbUrls {
        &self.urls
    }

    /// Sends a GET request and decodes the JSON body.
    ///
    /// Transport failures and non-2xx statuses come back as the original
    /// `reqwest::Error` with no context attached.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(url = %redact_api_key(&url), "TMDB API request");

        let response = self.http_client.get(url).send().await?;

        let status_error = response.error_for_status_ref().err();
        if let Some(err) = status_error {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                tracing::warn!(
                    %status,
                    code = error_response.status_code,
                    message = %error_response.status_message,
                    "TMDB API error"
                );
            } else {
                tracing::warn!(%status, %body, "TMDB API error");
            }
            return Err(err.into());
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).context("failed to decode TMDB JSON response")?;
        Ok(parsed)
    }
}

/// Featured response body; records stay untyped until one is picked.
#[derive(Deserialize)]
struct FeaturedResults {
    results: Vec<Value>,
}

/// Picks the featured movie: the first entry of a results list.
///
/// Only the first record is decoded; later records are never inspected.
///
/// # Errors
///
/// Returns an error if `results` is empty or its first entry is not a JSON object.
fn first_result(results: Vec<Value>) -> Result<TmdbMovie> {
    let Some(record) = results.into_iter().next() else {
        tracing::error!("Error fetching featured movie: response contained no results");
        bail!("featured movie response contained no results");
    };
    let movie: TmdbMovie = serde_json::from_value(record)
        .inspect_err(|err| {
            tracing::error!(
                error = %err,
                "Error fetching featured movie: first result is not an object"
            );
        })
        .context("featured movie record is not a JSON object")?;
    tracing::debug!(id = movie.id, title = %movie.title, "Featured movie");
    Ok(movie)
}

impl MovieApi for TmdbClient {
    #[instrument(skip_all)]
    async fn fetch_featured_movie(&self, api_key: &str) -> Result<TmdbMovie> {
        let url = self.urls.featured_movie(api_key)?;
        let featured: FeaturedResults = self
            .get_json(url)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Error fetching featured movie"))?;
        first_result(featured.results)
    }

    #[instrument(skip_all)]
    async fn popular_movies(&self, api_key: &str, page: Option<u32>) -> Result<TmdbMoviePage> {
        let url = self.urls.popular_movies(api_key, page)?;
        self.get_json(url).await
    }

    #[instrument(skip_all)]
    async fn now_playing_movies(
        &self,
        api_key: &str,
        page: Option<u32>,
    ) -> Result<TmdbMoviePage> {
        let url = self.urls.now_playing_movies(api_key, page)?;
        self.get_json(url).await
    }

    #[instrument(skip_all)]
    async fn genre_movies(
        &self,
        api_key: &str,
        genre: &str,
        page: Option<u32>,
    ) -> Result<TmdbMoviePage> {
        let url = self.urls.genre_movies(api_key, genre, page)?;
        self.get_json(url).await
    }
}
