use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

use crate::error::{AppError, AppResult};
use crate::models::MovieRecord;

/// Immutable genre-similarity index over the movie catalog
///
/// Built once at startup from the loaded records and shared read-only for
/// the process lifetime. Bundles the TF-IDF genre vectors, the full pairwise
/// cosine similarity matrix, and the title → row lookup.
///
/// Weighting is tf × smoothed idf, idf = ln((1 + N) / (1 + df)) + 1, with
/// each vector L2-normalized so that the matrix entries are cosine scores
/// in [0, 1]. Tags are exact-match tokens as produced by the catalog loader;
/// no word-splitting or stopword removal is applied.
pub struct SimilarityIndex {
    /// Sparse normalized TF-IDF vector per movie, entries sorted by token id
    vectors: Vec<Vec<(usize, f64)>>,
    /// N×N symmetric cosine matrix, diagonal fixed at 1.0
    matrix: Vec<Vec<f64>>,
    /// Title → row id; duplicate titles resolve last-write-wins
    title_index: HashMap<String, usize>,
    /// Row id → title, in catalog order
    titles: Vec<String>,
}

impl SimilarityIndex {
    /// Builds the index from the catalog records
    ///
    /// Runs once, single-threaded; the full O(N²) matrix is materialized
    /// up front so queries are pure reads. Acceptable for catalogs up to
    /// tens of thousands of titles.
    pub fn build(records: &[MovieRecord]) -> Self {
        let start = Instant::now();
        let n = records.len();

        // 1. Vocabulary and document frequency per tag
        let mut vocab: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        for record in records {
            let mut seen = std::collections::HashSet::new();
            for tag in &record.genre_tags {
                let token = *vocab.entry(tag.clone()).or_insert_with(|| {
                    doc_freq.push(0);
                    doc_freq.len() - 1
                });
                if seen.insert(token) {
                    doc_freq[token] += 1;
                }
            }
        }

        // 2. Smoothed IDF per token
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        // 3. L2-normalized TF-IDF vector per movie
        let vectors: Vec<Vec<(usize, f64)>> = records
            .iter()
            .map(|record| {
                let mut term_freq: HashMap<usize, f64> = HashMap::new();
                for tag in &record.genre_tags {
                    *term_freq.entry(vocab[tag]).or_insert(0.0) += 1.0;
                }

                let mut vector: Vec<(usize, f64)> = term_freq
                    .into_iter()
                    .map(|(token, tf)| (token, tf * idf[token]))
                    .collect();
                vector.sort_by_key(|&(token, _)| token);

                let norm = vector
                    .iter()
                    .map(|(_, w)| w * w)
                    .sum::<f64>()
                    .sqrt();
                if norm > 0.0 {
                    for (_, weight) in &mut vector {
                        *weight /= norm;
                    }
                }
                vector
            })
            .collect();

        // 4. Full pairwise cosine matrix
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            // Empty tag sets have zero norm; the diagonal is still 1.0
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let score = sparse_dot(&vectors[i], &vectors[j]);
                matrix[i][j] = score;
                matrix[j][i] = score;
            }
        }

        // 5. Title → row lookup (later rows win for duplicate titles)
        let mut title_index = HashMap::new();
        let mut titles = Vec::with_capacity(n);
        for (id, record) in records.iter().enumerate() {
            title_index.insert(record.title.clone(), id);
            titles.push(record.title.clone());
        }

        tracing::info!(
            movies = n,
            vocabulary = vocab.len(),
            build_time_ms = start.elapsed().as_millis(),
            "Similarity index built"
        );

        Self {
            vectors,
            matrix,
            title_index,
            titles,
        }
    }

    /// Returns the titles of the top `n` movies most similar to `title`
    ///
    /// The query title must match a catalog title exactly (case-sensitive,
    /// year suffix included); otherwise a `NotFound` error is returned for
    /// the caller to surface verbatim. The query movie itself is excluded.
    /// Ties break by ascending catalog position, so repeated calls are
    /// deterministic. If fewer than `n` other movies exist, all of them are
    /// returned.
    pub fn recommend(&self, title: &str, n: usize) -> AppResult<Vec<String>> {
        let &idx = self.title_index.get(title).ok_or_else(|| {
            AppError::NotFound(format!("Movie '{}' not found in catalog", title))
        })?;

        let row = &self.matrix[idx];
        let mut scored: Vec<(usize, f64)> = (0..self.titles.len())
            .filter(|&j| j != idx)
            .map(|j| (j, row[j]))
            .collect();

        // Stable sort keeps catalog order for equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(n)
            .map(|(j, _)| self.titles[j].clone())
            .collect())
    }

    /// Cosine similarity between two movies by row id
    pub fn similarity(&self, i: usize, j: usize) -> f64 {
        self.matrix[i][j]
    }

    /// Normalized genre vector for a movie by row id
    pub fn vector(&self, id: usize) -> &[(usize, f64)] {
        &self.vectors[id]
    }

    /// Number of indexed movies
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Dot product of two sparse vectors with entries sorted by token id
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const TOLERANCE: f64 = 1e-9;

    fn sample_catalog() -> Catalog {
        let csv = "\
title,genres
Toy Story (1995),Animation|Comedy
Jumanji (1995),Adventure|Fantasy
Grumpier Old Men (1995),Comedy
Heat (1995),Action|Crime
";
        Catalog::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_recommend_ranks_shared_genre_first() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        let recommendations = index.recommend("Toy Story (1995)", 1).unwrap();
        assert_eq!(recommendations, vec!["Grumpier Old Men (1995)"]);
    }

    #[test]
    fn test_recommend_excludes_query_title() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        for record in catalog.records() {
            let recommendations = index.recommend(&record.title, 10).unwrap();
            assert!(!recommendations.contains(&record.title));
        }
    }

    #[test]
    fn test_recommend_result_length() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        for n in 1..=3 {
            let recommendations = index.recommend("Heat (1995)", n).unwrap();
            assert_eq!(recommendations.len(), n);
        }

        // More than N-1 requested returns all other movies
        let recommendations = index.recommend("Heat (1995)", 50).unwrap();
        assert_eq!(recommendations.len(), 3);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        let first = index.recommend("Jumanji (1995)", 3).unwrap();
        for _ in 0..10 {
            assert_eq!(index.recommend("Jumanji (1995)", 3).unwrap(), first);
        }
    }

    #[test]
    fn test_ties_break_by_catalog_order() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        // Jumanji and Heat share no genre with Toy Story; both score zero
        // and must come back in catalog order after the Comedy match.
        let recommendations = index.recommend("Toy Story (1995)", 3).unwrap();
        assert_eq!(
            recommendations,
            vec!["Grumpier Old Men (1995)", "Jumanji (1995)", "Heat (1995)"]
        );
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        for i in 0..index.len() {
            for j in 0..index.len() {
                assert!((index.similarity(i, j) - index.similarity(j, i)).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        for i in 0..index.len() {
            assert!((index.similarity(i, i) - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_scores_are_within_unit_interval() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        for i in 0..index.len() {
            for j in 0..index.len() {
                let score = index.similarity(i, j);
                assert!((-TOLERANCE..=1.0 + TOLERANCE).contains(&score));
            }
        }
    }

    #[test]
    fn test_unknown_title_returns_not_found() {
        let catalog = sample_catalog();
        let index = SimilarityIndex::build(catalog.records());

        let err = index.recommend("not-a-real-title", 5).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("not-a-real-title"));
    }

    #[test]
    fn test_single_movie_catalog_returns_empty() {
        let csv = "title,genres\nHeat (1995),Action|Crime\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        let index = SimilarityIndex::build(catalog.records());

        let recommendations = index.recommend("Heat (1995)", 5).unwrap();
        assert!(recommendations.is_empty());
    }

    #[test]
    fn test_empty_tag_set_has_unit_diagonal_and_zero_overlap() {
        let csv = "\
title,genres
Known (2001),Drama
Mystery (2002),
";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        let index = SimilarityIndex::build(catalog.records());

        assert!((index.similarity(1, 1) - 1.0).abs() < TOLERANCE);
        assert!(index.similarity(0, 1).abs() < TOLERANCE);
        assert!(index.vector(1).is_empty());
    }

    #[test]
    fn test_rarer_tags_weigh_more() {
        // Comedy appears in three movies, Film-Noir in one; the Film-Noir
        // match must outrank the Comedy match for the query movie.
        let csv = "\
title,genres
Query (2000),Comedy|Film-Noir
Common Match (2001),Comedy
Rare Match (2002),Film-Noir
Filler (2003),Comedy
";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        let index = SimilarityIndex::build(catalog.records());

        let recommendations = index.recommend("Query (2000)", 2).unwrap();
        assert_eq!(recommendations[0], "Rare Match (2002)");
    }

    #[test]
    fn test_duplicate_title_resolves_to_last_row() {
        let csv = "\
title,genres
Heat (1995),Action
Heat (1995),Comedy
Funny (1996),Comedy
Loud (1997),Action
";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        let index = SimilarityIndex::build(catalog.records());

        // The lookup resolves to row 1 (Comedy), so the Comedy movie wins.
        let recommendations = index.recommend("Heat (1995)", 1).unwrap();
        assert_eq!(recommendations, vec!["Funny (1996)"]);
    }
}
