//! TMDB movie list URL builders.
//!
//! Query parameters go through the `url` crate's form serializer, so an
//! API key or genre containing `&`, `=` or spaces cannot break out of its
//! own parameter.

use anyhow::{Context, Result};
use url::Url;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Response language sent with every request.
pub const LANGUAGE: &str = "ko-KR";

/// Default page for `movie/popular`.
pub const DEFAULT_POPULAR_PAGE: u32 = 1;

/// Default page for `movie/now_playing`.
pub const DEFAULT_NOW_PLAYING_PAGE: u32 = 2;

/// Default page for `discover/movie`.
pub const DEFAULT_GENRE_PAGE: u32 = 1;

const POPULAR_PATH: &str = "movie/popular";
const NOW_PLAYING_PATH: &str = "movie/now_playing";
const DISCOVER_PATH: &str = "discover/movie";

/// Query parameter carrying the API key.
const API_KEY_PARAM: &str = "api_key";

/// Builds TMDB movie list URLs against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbUrls {
    /// Base URL, ending in `/`.
    base_url: Url,
}

impl TmdbUrls {
    /// Creates a builder for the given base URL (for wiremock in tests).
    ///
    /// A missing trailing `/` is appended so that `Url::join` keeps the
    /// last path segment (`.../3` becomes `.../3/`).
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { base_url }
    }

    /// Creates a builder for the public TMDB API v3.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL fails to parse.
    pub fn themoviedb() -> Result<Self> {
        let base_url = Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?;
        Ok(Self::new(base_url))
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `movie/popular?api_key={key}&language=ko-KR&page={page}`.
    ///
    /// `page` defaults to [`DEFAULT_POPULAR_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint path cannot be joined onto the base URL.
    pub fn popular_movies(&self, api_key: &str, page: Option<u32>) -> Result<Url> {
        let page = page.unwrap_or(DEFAULT_POPULAR_PAGE).to_string();
        self.endpoint(
            POPULAR_PATH,
            &[(API_KEY_PARAM, api_key), ("language", LANGUAGE), ("page", &page)],
        )
    }

    /// `movie/now_playing?api_key={key}&language=ko-KR&page={page}`.
    ///
    /// `page` defaults to [`DEFAULT_NOW_PLAYING_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint path cannot be joined onto the base URL.
    pub fn now_playing_movies(&self, api_key: &str, page: Option<u32>) -> Result<Url> {
        let page = page.unwrap_or(DEFAULT_NOW_PLAYING_PAGE).to_string();
        self.endpoint(
            NOW_PLAYING_PATH,
            &[(API_KEY_PARAM, api_key), ("language", LANGUAGE), ("page", &page)],
        )
    }

    /// `discover/movie?api_key={key}&with_genres={genre}&language=ko-KR&page={page}`.
    ///
    /// `genre` is passed through as-is; `page` defaults to [`DEFAULT_GENRE_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint path cannot be joined onto the base URL.
    pub fn genre_movies(&self, api_key: &str, genre: &str, page: Option<u32>) -> Result<Url> {
        let page = page.unwrap_or(DEFAULT_GENRE_PAGE).to_string();
        self.endpoint(
            DISCOVER_PATH,
            &[
                (API_KEY_PARAM, api_key),
                ("with_genres", genre),
                ("language", LANGUAGE),
                ("page", &page),
            ],
        )
    }

    /// `movie/popular?api_key={key}&language=ko-KR`, without a page parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint path cannot be joined onto the base URL.
    pub fn featured_movie(&self, api_key: &str) -> Result<Url> {
        self.endpoint(POPULAR_PATH, &[(API_KEY_PARAM, api_key), ("language", LANGUAGE)])
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }
}

/// Builds a `movie/popular` URL against the public TMDB API.
///
/// # Errors
///
/// See [`TmdbUrls::popular_movies`].
pub fn popular_movies_url(api_key: &str, page: Option<u32>) -> Result<Url> {
    TmdbUrls::themoviedb()?.popular_movies(api_key, page)
}

/// Builds a `movie/now_playing` URL against the public TMDB API.
///
/// # Errors
///
/// See [`TmdbUrls::now_playing_movies`].
pub fn now_playing_movies_url(api_key: &str, page: Option<u32>) -> Result<Url> {
    TmdbUrls::themoviedb()?.now_playing_movies(api_key, page)
}

/// Builds a `discover/movie` URL filtered by genre against the public TMDB API.
///
/// # Errors
///
/// See [`TmdbUrls::genre_movies`].
pub fn genre_movies_url(api_key: &str, genre: &str, page: Option<u32>) -> Result<Url> {
    TmdbUrls::themoviedb()?.genre_movies(api_key, genre, page)
}

/// Returns a copy of `url` with the `api_key` value masked, for logging.
pub(crate) fn redact_api_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    if url.query().is_none() {
        return redacted;
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == API_KEY_PARAM {
                String::from("***")
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_popular_movies_url_exact() {
        // Arrange & Act
        let url = popular_movies_url("KEY", Some(3)).unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/popular?api_key=KEY&language=ko-KR&page=3"
        );
    }

    #[test]
    fn test_popular_movies_url_carries_key_and_page() {
        for (key, page) in [("abc123", 1), ("0f9e8d7c6b5a", 42), ("k", 500)] {
            // Act
            let url = popular_movies_url(key, Some(page)).unwrap();
            let query = query_map(&url);

            // Assert
            assert_eq!(query.get("api_key").map(String::as_str), Some(key));
            assert_eq!(query.get("page"), Some(&page.to_string()));
            assert_eq!(query.get("language").map(String::as_str), Some("ko-KR"));
            assert_eq!(url.query_pairs().count(), 3);
        }
    }

    #[test]
    fn test_default_pages() {
        // Arrange & Act
        let popular = popular_movies_url("KEY", None).unwrap();
        let now_playing = now_playing_movies_url("KEY", None).unwrap();
        let genre = genre_movies_url("KEY", "28", None).unwrap();

        // Assert
        assert_eq!(query_map(&popular)["page"], "1");
        assert_eq!(query_map(&now_playing)["page"], "2");
        assert_eq!(query_map(&genre)["page"], "1");
    }

    #[test]
    fn test_now_playing_movies_url_exact() {
        // Arrange & Act
        let url = now_playing_movies_url("KEY", None).unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/now_playing?api_key=KEY&language=ko-KR&page=2"
        );
    }

    #[test]
    fn test_genre_movies_url_exact() {
        // Arrange & Act
        let url = genre_movies_url("KEY", "28", None).unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/discover/movie?api_key=KEY&with_genres=28&language=ko-KR&page=1"
        );
    }

    #[test]
    fn test_genre_is_escaped_not_rewritten() {
        // Arrange & Act
        let url = genre_movies_url("KEY", "28,12", Some(2)).unwrap();

        // Assert
        assert!(url.as_str().contains("with_genres=28%2C12"));
        assert_eq!(query_map(&url)["with_genres"], "28,12");
    }

    #[test]
    fn test_api_key_cannot_inject_parameters() {
        // Arrange & Act
        let url = popular_movies_url("a&page=9", None).unwrap();
        let query = query_map(&url);

        // Assert
        assert_eq!(query["api_key"], "a&page=9");
        assert_eq!(query["page"], "1");
        assert_eq!(url.query_pairs().count(), 3);
    }

    #[test]
    fn test_empty_api_key_is_not_validated() {
        // Arrange & Act
        let url = popular_movies_url("", None).unwrap();

        // Assert
        assert!(url.as_str().contains("?api_key=&language=ko-KR"));
    }

    #[test]
    fn test_featured_movie_url_has_no_page() {
        // Arrange
        let urls = TmdbUrls::themoviedb().unwrap();

        // Act
        let url = urls.featured_movie("KEY").unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/popular?api_key=KEY&language=ko-KR"
        );
    }

    #[test]
    fn test_custom_base_url() {
        // Arrange
        let urls = TmdbUrls::new(Url::parse("http://127.0.0.1:8080/3/").unwrap());

        // Act
        let url = urls.now_playing_movies("KEY", Some(5)).unwrap();

        // Assert
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/3/movie/now_playing");
        assert_eq!(query_map(&url)["page"], "5");
    }

    #[test]
    fn test_base_url_without_trailing_slash_keeps_version_segment() {
        // Arrange
        let urls = TmdbUrls::new(Url::parse("http://127.0.0.1:8080/3").unwrap());

        // Act
        let url = urls.popular_movies("KEY", None).unwrap();

        // Assert
        assert_eq!(urls.base_url().as_str(), "http://127.0.0.1:8080/3/");
        assert_eq!(url.path(), "/3/movie/popular");
    }

    #[test]
    fn test_redact_api_key() {
        // Arrange
        let url = popular_movies_url("secret", Some(2)).unwrap();

        // Act
        let redacted = redact_api_key(&url);

        // Assert
        assert!(!redacted.as_str().contains("secret"));
        assert_eq!(query_map(&redacted)["api_key"], "***");
        assert_eq!(query_map(&redacted)["page"], "2");
    }

    #[test]
    fn test_redact_api_key_without_query() {
        // Arrange
        let url = Url::parse("https://api.themoviedb.org/3/movie/popular").unwrap();

        // Act
        let redacted = redact_api_key(&url);

        // Assert
        assert_eq!(redacted, url);
    }
}
