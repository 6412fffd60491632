//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{TmdbMovie, TmdbMoviePage};

/// TMDB movie API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// The API key is an argument of every call; implementations do not keep one.
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Fetches `movie/popular` and returns its first result.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest::Error` on network failure or a
    /// non-2xx status. Also fails if the body cannot be decoded or the
    /// results list is empty.
    async fn fetch_featured_movie(&self, api_key: &str) -> Result<TmdbMovie>;

    /// Fetches a page of `movie/popular`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn popular_movies(&self, api_key: &str, page: Option<u32>) -> Result<TmdbMoviePage>;

    /// Fetches a page of `movie/now_playing`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn now_playing_movies(&self, api_key: &str, page: Option<u32>)
    -> Result<TmdbMoviePage>;

    /// Fetches a page of `discover/movie` filtered by genre.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genre_movies(
        &self,
        api_key: &str,
        genre: &str,
        page: Option<u32>,
    ) -> Result<TmdbMoviePage>;
}
