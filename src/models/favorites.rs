use serde::{Deserialize, Serialize};

/// Ordered list of favorite titles for one interactive session
///
/// Append-only with duplicate suppression. Scoped to the session that owns
/// it and never persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorites {
    /// Titles in the order they were saved
    pub titles: Vec<String>,
}

impl Default for Favorites {
    fn default() -> Self {
        Self::new()
    }
}

impl Favorites {
    /// Creates an empty favorites list
    pub fn new() -> Self {
        Self { titles: Vec::new() }
    }

    /// Adds a title, ignoring duplicates
    ///
    /// Returns true if the title was newly added.
    pub fn add(&mut self, title: &str) -> bool {
        if self.titles.iter().any(|t| t == title) {
            return false;
        }
        self.titles.push(title.to_string());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
