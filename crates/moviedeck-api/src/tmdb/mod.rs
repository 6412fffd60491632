//! TMDB API client module.
//!
//! Builds `movie/popular`, `movie/now_playing` and `discover/movie` URLs
//! (Korean locale) and fetches movie lists and the featured movie.

mod api;
mod client;
mod types;
mod urls;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{TmdbDateRange, TmdbErrorResponse, TmdbMovie, TmdbMoviePage};
pub use urls::{
    DEFAULT_GENRE_PAGE, DEFAULT_NOW_PLAYING_PAGE, DEFAULT_POPULAR_PAGE, LANGUAGE, TmdbUrls,
    genre_movies_url, now_playing_movies_url, popular_movies_url,
};
