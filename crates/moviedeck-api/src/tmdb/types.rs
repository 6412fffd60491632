//! TMDB API response types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Decodes a field, falling back to its default on `null` or a type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// --- Movie Lists ---

/// Response from the `movie/popular`, `movie/now_playing` and
/// `discover/movie` endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMoviePage {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<TmdbMovie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
    /// Release window (`movie/now_playing` only).
    #[serde(default)]
    pub dates: Option<TmdbDateRange>,
}

/// Release window reported by `movie/now_playing`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbDateRange {
    /// Latest release date (YYYY-MM-DD).
    pub maximum: String,
    /// Earliest release date (YYYY-MM-DD).
    pub minimum: String,
}

/// A single movie record from a results list.
///
/// The record shape is not enforced: a missing, `null` or mistyped field
/// decodes to its default (`0`, `""`, `None`, empty list, `false`).
/// Fields not listed here are kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID (`0` when absent).
    #[serde(default, deserialize_with = "lenient")]
    pub id: u64,
    /// Localized title (empty when absent).
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    /// Original title.
    #[serde(default, deserialize_with = "lenient")]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default, deserialize_with = "lenient")]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD or empty).
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default, deserialize_with = "lenient")]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<f64>,
    /// Vote average.
    #[serde(default, deserialize_with = "lenient")]
    pub vote_average: Option<f64>,
    /// Vote count.
    #[serde(default, deserialize_with = "lenient")]
    pub vote_count: Option<u32>,
    /// Genre IDs.
    #[serde(default, deserialize_with = "lenient")]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default, deserialize_with = "lenient")]
    pub adult: bool,
    /// Poster image path.
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_path: Option<String>,
    /// Remaining fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
