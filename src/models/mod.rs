use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod favorites;

pub use favorites::Favorites;

/// A single movie row from the catalog
///
/// Records are immutable after load and owned by the `Catalog`. The `id` is
/// the row position in the source file and stays stable for the process
/// lifetime; the similarity matrix is indexed by it on both axes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    /// Row position in the catalog, in [0, N)
    pub id: usize,
    /// Full title including the release year suffix, e.g. "Toy Story (1995)"
    pub title: String,
    /// Genre tags parsed from the `genres` column; empty when the cell was missing
    pub genre_tags: Vec<String>,
    /// All other catalog columns, passed through unmodified for detail display
    pub extras: BTreeMap<String, String>,
}

/// External metadata for a movie, fetched from the enrichment provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
    pub overview: String,
}

impl MovieMetadata {
    /// Fallback metadata used whenever enrichment fails or returns nothing
    pub fn placeholder() -> Self {
        Self {
            poster_url: None,
            rating: None,
            overview: "No overview available.".to_string(),
        }
    }
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// TMDb /search/movie response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    pub results: Vec<TmdbMovie>,
}

/// A single TMDb search result
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl From<TmdbMovie> for MovieMetadata {
    fn from(movie: TmdbMovie) -> Self {
        let poster_url = movie
            .poster_path
            .map(|path| format!("https://image.tmdb.org/t/p/w500{}", path));

        MovieMetadata {
            poster_url,
            rating: movie.vote_average,
            overview: movie
                .overview
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| "No overview available.".to_string()),
        }
    }
}
