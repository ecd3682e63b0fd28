use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::{models::MovieMetadata, services::providers::MetadataProvider};

const METADATA_CACHE_TTL_SECS: i64 = 3600; // 1 hour

/// A cached metadata entry with its fetch time
struct CacheEntry {
    metadata: MovieMetadata,
    cached_at: DateTime<Utc>,
}

/// Best-effort metadata enrichment with an in-memory TTL cache
///
/// Wraps the configured provider and guarantees that enrichment never fails
/// a request: any provider error is logged and degraded to placeholder
/// metadata. Successful lookups are cached per cleaned title so that a batch
/// of recommendations does not hammer the provider.
#[derive(Clone)]
pub struct MetadataService {
    provider: Arc<dyn MetadataProvider>,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MetadataService {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetches metadata for a catalog title, falling back to a placeholder
    ///
    /// The year suffix is stripped before querying the provider, so
    /// "Toy Story (1995)" is looked up as "Toy Story". Cache first, then
    /// provider; a provider failure degrades to `MovieMetadata::placeholder`.
    pub async fn fetch_or_placeholder(&self, title: &str) -> MovieMetadata {
        let query = clean_title(title);

        if let Some(cached) = self.get_cached(&query).await {
            tracing::debug!(title = %title, "Metadata cache hit");
            return cached;
        }

        match self.provider.fetch_metadata(&query).await {
            Ok(metadata) => {
                self.store(&query, &metadata).await;
                metadata
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    title = %title,
                    provider = self.provider.name(),
                    "Metadata fetch failed, using placeholder"
                );
                MovieMetadata::placeholder()
            }
        }
    }

    async fn get_cached(&self, query: &str) -> Option<MovieMetadata> {
        let cache = self.cache.read().await;
        let entry = cache.get(query)?;
        if Utc::now() - entry.cached_at > Duration::seconds(METADATA_CACHE_TTL_SECS) {
            return None;
        }
        Some(entry.metadata.clone())
    }

    async fn store(&self, query: &str, metadata: &MovieMetadata) {
        let mut cache = self.cache.write().await;
        cache.insert(
            query.to_string(),
            CacheEntry {
                metadata: metadata.clone(),
                cached_at: Utc::now(),
            },
        );
    }
}

/// Strips a trailing " (YYYY)" release-year suffix from a catalog title
///
/// Titles without the suffix are returned unchanged.
pub fn clean_title(title: &str) -> String {
    let trimmed = title.trim_end();
    if let Some(open) = trimmed.rfind(" (") {
        let suffix = &trimmed[open + 2..];
        if suffix.len() == 5
            && suffix.ends_with(')')
            && suffix.chars().take(4).all(|c| c.is_ascii_digit())
        {
            return trimmed[..open].to_string();
        }
    }
    trimmed.to_string()
}
