use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
    services::similarity::SimilarityIndex,
};

/// On-disk layout of the precomputed similarity bundle
#[derive(Debug, Deserialize)]
struct SimilarityArtifact {
    movies: Vec<CatalogEntry>,
    similarity: Vec<Vec<f64>>,
}

/// Loads the catalog and similarity matrix from a JSON bundle
///
/// Any failure here is fatal for the process: a missing file, a body that does
/// not parse, or a matrix whose shape disagrees with the catalog.
pub fn load_similarity_index(path: impl AsRef<Path>) -> AppResult<SimilarityIndex> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        AppError::DataLoad(format!("Cannot open artifact {}: {}", path.display(), e))
    })?;

    let artifact: SimilarityArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| {
            AppError::DataLoad(format!("Corrupt artifact {}: {}", path.display(), e))
        })?;

    let index = SimilarityIndex::from_parts(artifact.movies, artifact.similarity)?;

    tracing::info!(
        path = %path.display(),
        movies = index.len(),
        "Loaded similarity index"
    );

    Ok(index)
}
