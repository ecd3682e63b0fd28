use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::MovieRecord;

/// In-memory movie catalog loaded from a CSV source
///
/// Rows are read in source order and assigned `id = row position`. The
/// catalog is immutable after load; the similarity engine consumes its
/// records once at startup to build the index.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    /// Title → record id; duplicate titles resolve last-write-wins
    by_title: HashMap<String, usize>,
}

/// Splits a raw genre cell into tags
///
/// Tags are exact-match tokens split on `|` or `,` with surrounding
/// whitespace trimmed; multi-word tags such as "Film-Noir" stay intact.
/// A missing or empty cell yields an empty tag set.
pub fn split_genre_tags(raw: &str) -> Vec<String> {
    raw.split(['|', ','])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl Catalog {
    /// Loads the catalog from a CSV file
    ///
    /// The file must have `title` and `genres` columns (in any order); all
    /// other columns are passed through into `MovieRecord::extras`. Fails
    /// with a `DataSource` error if the file is unreadable or a required
    /// column is missing. The load is all-or-nothing.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::DataSource(format!("Cannot open catalog {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Loads the catalog from any CSV reader
    pub fn from_reader(reader: impl Read) -> AppResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let title_col = headers
            .iter()
            .position(|h| h == "title")
            .ok_or_else(|| AppError::DataSource("Missing required column 'title'".to_string()))?;
        let genres_col = headers
            .iter()
            .position(|h| h == "genres")
            .ok_or_else(|| AppError::DataSource("Missing required column 'genres'".to_string()))?;

        let mut records = Vec::new();
        for (id, row) in csv_reader.records().enumerate() {
            let row = row?;

            let title = row
                .get(title_col)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    AppError::DataSource(format!("Row {} has no title", id + 1))
                })?
                .to_string();

            // Missing genre cells normalize to an empty tag set
            let genre_tags = split_genre_tags(row.get(genres_col).unwrap_or(""));

            let extras = headers
                .iter()
                .enumerate()
                .filter(|(col, _)| *col != title_col && *col != genres_col)
                .filter_map(|(col, name)| {
                    row.get(col).map(|value| (name.to_string(), value.to_string()))
                })
                .collect();

            records.push(MovieRecord {
                id,
                title,
                genre_tags,
                extras,
            });
        }

        Ok(Self::from_records(records))
    }

    /// Builds a catalog from already-constructed records
    ///
    /// Record ids are reassigned to match their position.
    pub fn from_records(mut records: Vec<MovieRecord>) -> Self {
        let mut by_title = HashMap::new();
        for (id, record) in records.iter_mut().enumerate() {
            record.id = id;
            // Later rows win for duplicate titles
            by_title.insert(record.title.clone(), id);
        }

        Self { records, by_title }
    }

    /// Looks up a record by exact title (case-sensitive, year suffix included)
    pub fn lookup(&self, title: &str) -> Option<&MovieRecord> {
        self.by_title.get(title).map(|&id| &self.records[id])
    }

    /// All records in catalog order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Sorted, deduplicated title list for selection UIs
    pub fn titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.by_title.keys().cloned().collect();
        titles.sort();
        titles
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
