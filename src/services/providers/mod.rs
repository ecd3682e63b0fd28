/// Metadata provider abstraction
///
/// This module provides a pluggable architecture for external movie metadata
/// sources (TMDb today, others later). Providers resolve a cleaned title
/// (year suffix stripped) to poster, rating, and overview data.
use crate::{error::AppResult, models::MovieMetadata};

pub mod tmdb;

/// Trait for movie metadata providers
///
/// Providers are best-effort collaborators: callers must treat any error as
/// recoverable and fall back to placeholder metadata. The recommendation
/// core never depends on a provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for a movie by cleaned title
    ///
    /// Returns an error when the provider is unreachable, responds with a
    /// non-success status, or has no result for the query.
    async fn fetch_metadata(&self, query: &str) -> AppResult<MovieMetadata>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
