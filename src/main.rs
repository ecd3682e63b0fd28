use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinematch_api::api::{create_router, AppState};
use cinematch_api::catalog::Catalog;
use cinematch_api::config::Config;
use cinematch_api::services::providers::tmdb::TmdbProvider;
use cinematch_api::services::{MetadataService, SimilarityIndex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Load the catalog and build the similarity index once; both are
    // immutable for the rest of the process lifetime.
    let catalog = Catalog::load(&config.dataset_path)?;
    tracing::info!(
        movies = catalog.len(),
        path = %config.dataset_path,
        "Catalog loaded"
    );

    let index = SimilarityIndex::build(catalog.records());

    let provider = TmdbProvider::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone());
    let metadata = MetadataService::new(Arc::new(provider));

    let state = AppState::new(catalog, index, metadata);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
