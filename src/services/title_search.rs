use crate::{
    db::MetadataTable,
    error::{AppError, AppResult},
    models::{CatalogEntry, MovieLookup},
    services::similarity::SimilarityIndex,
};

/// Catalog entries for the movie selector, in catalog order
///
/// `query` filters by case-insensitive substring; a blank query lists everything.
pub fn search_titles(
    index: &SimilarityIndex,
    query: Option<&str>,
    limit: Option<usize>,
) -> Vec<CatalogEntry> {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    index
        .entries()
        .iter()
        .filter(|entry| match &needle {
            Some(needle) => entry.title.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

/// Cross-references one catalog entry with the supplementary metadata table
pub fn lookup_movie(
    index: &SimilarityIndex,
    metadata: &MetadataTable,
    external_id: i64,
) -> AppResult<MovieLookup> {
    let position = index.position_of_external_id(external_id).ok_or_else(|| {
        AppError::NotFound(format!("Movie with id {} not found in catalog", external_id))
    })?;

    let entry = index
        .entry(position)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("Catalog position {} vanished", position)))?;

    Ok(MovieLookup {
        position,
        entry,
        metadata: metadata.get(external_id).cloned(),
    })
}
