use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::SessionId;
use crate::models::{Favorites, MovieMetadata};

use super::AppState;

const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    #[serde(flatten)]
    pub metadata: MovieMetadata,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    pub title: String,
    pub genres: Vec<String>,
    pub extras: std::collections::BTreeMap<String, String>,
    #[serde(flatten)]
    pub metadata: MovieMetadata,
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists all catalog titles, sorted, for the selection UI
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.titles())
}

/// Returns the catalog record for one title plus best-effort metadata
pub async fn get_movie(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<Json<MovieDetailResponse>> {
    let record = state
        .catalog
        .lookup(&title)
        .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found in catalog", title)))?;

    let metadata = state.metadata.fetch_or_placeholder(&record.title).await;

    Ok(Json(MovieDetailResponse {
        title: record.title.clone(),
        genres: record.genre_tags.clone(),
        extras: record.extras.clone(),
        metadata,
    }))
}

/// Returns the top-N movies most similar to the query title
///
/// Each recommendation is enriched with poster, rating, and overview data;
/// enrichment failures degrade to placeholders and never fail the request.
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
    if limit == 0 {
        return Err(AppError::InvalidInput(
            "limit must be at least 1".to_string(),
        ));
    }

    let titles = state.index.recommend(&params.title, limit)?;

    tracing::info!(
        title = %params.title,
        results = titles.len(),
        "Recommendations computed"
    );

    let mut recommendations = Vec::with_capacity(titles.len());
    for title in titles {
        let metadata = state.metadata.fetch_or_placeholder(&title).await;
        recommendations.push(RecommendationResponse { title, metadata });
    }

    Ok(Json(recommendations))
}

/// Returns the favorites list for the current session
pub async fn get_favorites(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<Vec<String>> {
    let sessions = state.sessions.read().await;
    let titles = sessions
        .get(&session_id.0)
        .map(|favorites| favorites.titles.clone())
        .unwrap_or_default();
    Json(titles)
}

/// Adds a catalog title to the current session's favorites
///
/// Duplicates are suppressed; the title must exist in the catalog.
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<StatusCode> {
    if state.catalog.lookup(&request.title).is_none() {
        return Err(AppError::NotFound(format!(
            "Movie '{}' not found in catalog",
            request.title
        )));
    }

    let mut sessions = state.sessions.write().await;
    let favorites = sessions.entry(session_id.0).or_insert_with(Favorites::new);
    let added = favorites.add(&request.title);

    tracing::debug!(
        session_id = %session_id,
        title = %request.title,
        added = added,
        "Favorite saved"
    );

    Ok(if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}
