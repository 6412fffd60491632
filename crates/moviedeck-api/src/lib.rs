//! API client library for moviedeck.
//!
//! Builds TMDB movie list URLs and fetches the featured movie.

/// TMDB API URL builders and client.
pub mod tmdb;
