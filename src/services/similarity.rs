//! Precomputed item-similarity index
//!
//! Holds the movie catalog and the dense N×N similarity matrix produced offline.
//! Row `i`, column `j` is the similarity between catalog entries `i` and `j`.
//! The index is immutable once built and shared across requests behind an `Arc`.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, Recommendation},
};

#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    catalog: Vec<CatalogEntry>,
    /// Row-major, `catalog.len() * catalog.len()` scores
    scores: Vec<f64>,
}

impl SimilarityIndex {
    /// Builds an index from a catalog and matrix rows, validating their shape
    ///
    /// Fails with `DataLoad` when the catalog is empty, two entries share an external
    /// id, the matrix is not square, its size does not match the catalog, or any
    /// score is not finite.
    pub fn from_parts(catalog: Vec<CatalogEntry>, rows: Vec<Vec<f64>>) -> AppResult<Self> {
        let n = catalog.len();

        if n == 0 {
            return Err(AppError::DataLoad("Catalog is empty".to_string()));
        }

        let mut seen_ids = HashSet::with_capacity(n);
        if let Some(dup) = catalog.iter().find(|e| !seen_ids.insert(e.external_id)) {
            return Err(AppError::DataLoad(format!(
                "Catalog lists external id {} more than once",
                dup.external_id
            )));
        }

        if rows.len() != n {
            return Err(AppError::DataLoad(format!(
                "Similarity matrix has {} rows but catalog has {} entries",
                rows.len(),
                n
            )));
        }

        let mut scores = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(AppError::DataLoad(format!(
                    "Similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some(j) = row.iter().position(|s| !s.is_finite()) {
                return Err(AppError::DataLoad(format!(
                    "Similarity matrix has a non-finite score at ({}, {})",
                    i, j
                )));
            }
            scores.extend(row);
        }

        Ok(Self { catalog, scores })
    }

    /// Number of movies in the catalog
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn entry(&self, position: usize) -> Option<&CatalogEntry> {
        self.catalog.get(position)
    }

    /// Similarity row for the entry at `position`
    pub fn row(&self, position: usize) -> Option<&[f64]> {
        let n = self.len();
        (position < n).then(|| &self.scores[position * n..(position + 1) * n])
    }

    pub fn score(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|row| row.get(j).copied())
    }

    /// All catalog positions whose title matches exactly
    pub fn positions_of(&self, title: &str) -> Vec<usize> {
        self.catalog
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.title == title)
            .map(|(i, _)| i)
            .collect()
    }

    /// Catalog position carrying the given external id
    pub fn position_of_external_id(&self, external_id: i64) -> Option<usize> {
        self.catalog
            .iter()
            .position(|entry| entry.external_id == external_id)
    }

    /// Resolves a title to exactly one catalog position
    pub fn resolve_title(&self, title: &str) -> AppResult<usize> {
        match self.positions_of(title).as_slice() {
            [] => Err(AppError::NotFound(format!(
                "Movie '{}' not found in catalog",
                title
            ))),
            [position] => Ok(*position),
            positions => Err(AppError::AmbiguousTitle {
                title: title.to_string(),
                candidates: positions
                    .iter()
                    .map(|&p| self.catalog[p].external_id)
                    .collect(),
            }),
        }
    }

    /// The `k` movies most similar to `title`, most similar first
    pub fn recommend(&self, title: &str, k: i64) -> AppResult<Vec<Recommendation>> {
        let position = self.resolve_title(title)?;
        self.recommend_for_position(position, k)
    }

    /// Same as [`recommend`](Self::recommend), keyed by external id
    pub fn recommend_for_external_id(
        &self,
        external_id: i64,
        k: i64,
    ) -> AppResult<Vec<Recommendation>> {
        let position = self.position_of_external_id(external_id).ok_or_else(|| {
            AppError::NotFound(format!("Movie with id {} not found in catalog", external_id))
        })?;
        self.recommend_for_position(position, k)
    }

    /// Ranks every other entry by its score in row `position`
    ///
    /// Ties keep catalog order. The queried entry is dropped wherever it lands,
    /// since another entry may share its score.
    pub fn recommend_for_position(
        &self,
        position: usize,
        k: i64,
    ) -> AppResult<Vec<Recommendation>> {
        let row = self.row(position).ok_or_else(|| {
            AppError::NotFound(format!("Catalog position {} out of range", position))
        })?;

        if k <= 0 || self.len() < 2 {
            return Ok(Vec::new());
        }
        let k = usize::try_from(k).unwrap_or(usize::MAX);

        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let results = ranked
            .into_iter()
            .filter(|(i, _)| *i != position)
            .take(k)
            .map(|(i, score)| {
                let entry = &self.catalog[i];
                Recommendation {
                    title: entry.title.clone(),
                    external_id: entry.external_id,
                    similarity_score: score,
                }
            })
            .collect();

        Ok(results)
    }
}
