use serde::Deserialize;
use std::{collections::HashMap, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::CatalogMetadata,
};

/// Extended movie metadata keyed by external id
///
/// Read once from a TMDB-5000 style CSV. Only used for cross-reference; the
/// recommendation query never depends on it.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    records: HashMap<i64, CatalogMetadata>,
}

/// One CSV row. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct MetadataRecord {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    runtime: Option<f64>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<i64>,
    #[serde(default)]
    popularity: Option<f64>,
    /// JSON-encoded list, e.g. `[{"id": 28, "name": "Action"}]`
    #[serde(default)]
    genres: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenreName {
    name: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<MetadataRecord> for CatalogMetadata {
    fn from(record: MetadataRecord) -> Self {
        let genres = record
            .genres
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<GenreName>>(raw).ok())
            .map(|list| list.into_iter().map(|g| g.name).collect())
            .unwrap_or_default();

        CatalogMetadata {
            id: record.id,
            title: non_empty(record.title),
            overview: non_empty(record.overview),
            tagline: non_empty(record.tagline),
            release_date: non_empty(record.release_date),
            runtime: record.runtime,
            vote_average: record.vote_average,
            vote_count: record.vote_count,
            popularity: record.popularity,
            genres,
        }
    }
}

impl MetadataTable {
    /// Reads the metadata CSV at `path`
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();

        let reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::DataLoad(format!("Cannot open catalog {}: {}", path.display(), e))
        })?;

        let table = Self::from_reader(reader).map_err(|e| match e {
            AppError::DataLoad(msg) => {
                AppError::DataLoad(format!("{} in {}", msg, path.display()))
            }
            other => other,
        })?;

        tracing::info!(
            path = %path.display(),
            records = table.len(),
            "Loaded supplementary catalog"
        );

        Ok(table)
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> AppResult<Self> {
        let mut records = HashMap::new();

        for (line, result) in reader.deserialize::<MetadataRecord>().enumerate() {
            let record = result.map_err(|e| {
                AppError::DataLoad(format!("Malformed catalog record {}: {}", line + 1, e))
            })?;

            if records.contains_key(&record.id) {
                tracing::debug!(id = record.id, "Duplicate catalog id, keeping first");
                continue;
            }
            records.insert(record.id, CatalogMetadata::from(record));
        }

        Ok(Self { records })
    }

    pub fn get(&self, external_id: i64) -> Option<&CatalogMetadata> {
        self.records.get(&external_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
