/// TMDb API provider
///
/// Resolves a movie title to poster, rating, and overview data via TMDb's
/// search endpoint. The first search result wins, matching how a user would
/// pick the top hit for an exact title query.
///
/// API Flow: /search/movie?query=<title> → first result → poster path is
/// expanded to a full https://image.tmdb.org URL.
use crate::{
    error::{AppError, AppResult},
    models::{MovieMetadata, TmdbSearchResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a new TMDb provider
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_metadata(&self, query: &str) -> AppResult<MovieMetadata> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Metadata query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let search_response: TmdbSearchResponse = response.json().await?;

        let metadata = search_response
            .results
            .into_iter()
            .next()
            .map(MovieMetadata::from)
            .ok_or_else(|| {
                AppError::ExternalApi(format!("No TMDb results for '{}'", query))
            })?;

        tracing::debug!(
            query = %query,
            has_poster = metadata.poster_url.is_some(),
            provider = "tmdb",
            "Metadata fetched"
        );

        Ok(metadata)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> TmdbProvider {
        TmdbProvider::new("test_key".to_string(), "http://test.local".to_string())
    }

    #[test]
    fn test_provider_name() {
        let provider = create_test_provider();
        assert_eq!(provider.name(), "tmdb");
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let provider = create_test_provider();
        let err = provider.fetch_metadata("  ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_search_response_maps_to_metadata() {
        let json = r#"{
            "results": [
                {
                    "poster_path": "/rhIRbceoE9lR4veEXuwCC2wARtG.jpg",
                    "vote_average": 7.97,
                    "overview": "Led by Woody, Andy's toys live happily in his room."
                }
            ]
        }"#;

        let response: TmdbSearchResponse = serde_json::from_str(json).unwrap();
        let metadata: MovieMetadata = response.results.into_iter().next().unwrap().into();

        assert_eq!(
            metadata.poster_url,
            Some("https://image.tmdb.org/t/p/w500/rhIRbceoE9lR4veEXuwCC2wARtG.jpg".to_string())
        );
        assert_eq!(metadata.rating, Some(7.97));
        assert!(metadata.overview.starts_with("Led by Woody"));
    }

    #[test]
    fn test_empty_results_deserialize() {
        let response: TmdbSearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(response.results.is_empty());
    }
}
