use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod card;

pub use card::{RecommendationCard, RecommendationRequest, RecommendationResponse};

/// A movie in the similarity catalog, positionally aligned with the matrix
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    /// Identifier used against the external metadata API (TMDB)
    #[serde(alias = "movie_id")]
    pub external_id: i64,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, external_id: i64) -> Self {
        Self {
            title: title.into(),
            external_id,
        }
    }
}

/// A single ranked neighbor of the queried movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub external_id: i64,
    pub similarity_score: f64,
}

// ============================================================================
// Supplementary Catalog Types
// ============================================================================

/// Extended metadata for one movie, read from the supplementary CSV
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMetadata {
    pub id: i64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub genres: Vec<String>,
}

/// Catalog lookup response combining the index entry with any extended metadata
#[derive(Debug, Clone, Serialize)]
pub struct MovieLookup {
    pub position: usize,
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub metadata: Option<CatalogMetadata>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from TMDB `GET /3/movie/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<TmdbGenre>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

/// Movie details as consumed by the display layer and stored in the cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub external_id: i64,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl MovieDetails {
    pub fn from_tmdb(external_id: i64, movie: TmdbMovie) -> Self {
        Self {
            external_id,
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
            overview: movie.overview.filter(|o| !o.trim().is_empty()),
            vote_average: movie.vote_average,
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            genres: movie
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
            fetched_at: Utc::now(),
        }
    }

    /// Year component of `release_date`, when it parses as `YYYY-MM-DD`
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_accepts_movie_id_alias() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"title": "Avatar", "movie_id": 19995}"#).unwrap();
        assert_eq!(entry, CatalogEntry::new("Avatar", 19995));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["external_id"], 19995);
    }

    #[test]
    fn test_tmdb_movie_deserialization() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "overview": "Cobb, a skilled thief...",
            "vote_average": 8.369,
            "release_date": "2010-07-15",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let details = MovieDetails::from_tmdb(27205, movie);

        assert_eq!(
            details.poster_path.as_deref(),
            Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg")
        );
        assert_eq!(details.vote_average, Some(8.369));
        assert_eq!(details.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(details.release_year(), Some(2010));
    }

    #[test]
    fn test_tmdb_movie_missing_fields() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 1, "poster_path": null}"#).unwrap();
        let details = MovieDetails::from_tmdb(1, movie);

        assert!(details.poster_path.is_none());
        assert!(details.genres.is_empty());
        assert_eq!(details.release_year(), None);
    }

    #[test]
    fn test_tmdb_movie_null_genres_keeps_other_fields() {
        let movie: TmdbMovie = serde_json::from_str(
            r#"{"poster_path": "/x.jpg", "vote_average": 6.1, "genres": null}"#,
        )
        .unwrap();
        let details = MovieDetails::from_tmdb(7, movie);

        assert_eq!(details.poster_path.as_deref(), Some("/x.jpg"));
        assert_eq!(details.vote_average, Some(6.1));
        assert!(details.genres.is_empty());
    }

    #[test]
    fn test_release_year_ignores_unparseable_date() {
        let movie: TmdbMovie =
            serde_json::from_str(r#"{"release_date": "sometime in 2010"}"#).unwrap();
        assert_eq!(MovieDetails::from_tmdb(1, movie).release_year(), None);
    }
}
