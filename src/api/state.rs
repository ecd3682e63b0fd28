use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::models::Favorites;
use crate::services::{MetadataService, SimilarityIndex};

/// Shared application state
///
/// The catalog and similarity index are built once at startup and published
/// read-only behind `Arc`s; handlers never lock to read them. Only the
/// per-session favorites are mutable.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub index: Arc<SimilarityIndex>,
    pub metadata: MetadataService,
    pub sessions: Arc<RwLock<HashMap<Uuid, Favorites>>>,
}

impl AppState {
    /// Creates the application state from the loaded catalog and built index
    pub fn new(catalog: Catalog, index: SimilarityIndex, metadata: MetadataService) -> Self {
        Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            metadata,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
