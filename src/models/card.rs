use serde::{Deserialize, Serialize};

use super::{MovieDetails, Recommendation};

/// Request body for `POST /api/v1/recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    /// Picks one entry when the title is shared by several movies
    #[serde(default)]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default = "default_true")]
    pub show_details: bool,
    #[serde(default = "default_true")]
    pub show_score: bool,
}

fn default_true() -> bool {
    true
}

/// One rendered recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationCard {
    pub rank: usize,
    pub title: String,
    pub external_id: i64,
    pub similarity_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub details_available: bool,
}

impl RecommendationCard {
    /// Builds a card from a ranked neighbor and whatever details were fetched for it.
    ///
    /// `details == None` yields the placeholder form: no poster, info line or overview.
    pub fn build(
        rank: usize,
        recommendation: Recommendation,
        details: Option<&MovieDetails>,
        image_base_url: &str,
        show_score: bool,
    ) -> Self {
        let similarity_percent =
            show_score.then(|| format_percent(recommendation.similarity_score));

        let (poster_url, info_line, overview) = match details {
            Some(details) => (
                details
                    .poster_path
                    .as_deref()
                    .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path)),
                info_line(details),
                details.overview.clone(),
            ),
            None => (None, None, None),
        };

        Self {
            rank,
            title: recommendation.title,
            external_id: recommendation.external_id,
            similarity_score: recommendation.similarity_score,
            similarity_percent,
            poster_url,
            info_line,
            overview,
            details_available: details.is_some(),
        }
    }
}

/// Response body for `POST /api/v1/recommendations`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub query: String,
    pub results: Vec<RecommendationCard>,
    /// Set when the query was valid but produced nothing to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Similarity as a percentage with one decimal, e.g. `0.8734 -> "87.3%"`
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// `⭐ 7.8/10 | 2010 | Action, Science Fiction`, skipping absent parts
pub fn info_line(details: &MovieDetails) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(rating) = details.vote_average {
        parts.push(format!("⭐ {:.1}/10", rating));
    }
    if let Some(year) = details.release_year() {
        parts.push(year.to_string());
    }
    if !details.genres.is_empty() {
        parts.push(details.genres.join(", "));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}
