use crate::{
    error::{AppError, AppResult},
    models::{
        MovieDetails, Recommendation, RecommendationCard, RecommendationRequest,
        RecommendationResponse,
    },
    services::{providers::MetadataProvider, similarity::SimilarityIndex},
};

/// Knobs for shaping a recommendation response
#[derive(Debug, Clone)]
pub struct RecommendationSettings {
    pub default_count: i64,
    pub max_count: i64,
    pub image_base_url: String,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_count: 5,
            max_count: 10,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        }
    }
}

impl RecommendationSettings {
    /// Requested count, falling back to the default and capped at `max_count`
    ///
    /// Non-positive values pass through; the index answers them with no results.
    pub fn effective_count(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.default_count).min(self.max_count)
    }
}

/// Runs one recommendation interaction: query the index, then decorate each result
///
/// Lookup errors (unknown or ambiguous title) abort with no partial output. Detail
/// fetches run one at a time and a failure only downgrades that one card to the
/// placeholder form.
pub async fn get_recommendations(
    index: &SimilarityIndex,
    provider: Option<&dyn MetadataProvider>,
    settings: &RecommendationSettings,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let position = resolve_position(index, &request)?;
    let query = index
        .entry(position)
        .map(|entry| entry.title.clone())
        .unwrap_or_default();

    let count = settings.effective_count(request.count);
    let recommendations = index.recommend_for_position(position, count)?;

    tracing::info!(
        query = %query,
        requested = ?request.count,
        count,
        found = recommendations.len(),
        "Recommendations computed"
    );

    let provider = provider.filter(|_| request.show_details);

    let mut results = Vec::with_capacity(recommendations.len());
    for (i, recommendation) in recommendations.into_iter().enumerate() {
        let details = match provider {
            Some(provider) => fetch_or_placeholder(provider, &recommendation).await,
            None => None,
        };

        results.push(RecommendationCard::build(
            i + 1,
            recommendation,
            details.as_ref(),
            &settings.image_base_url,
            request.show_score,
        ));
    }

    let warning = results
        .is_empty()
        .then(|| format!("No recommendations found for '{}'", query));

    Ok(RecommendationResponse {
        query,
        results,
        warning,
    })
}

/// Picks the catalog row for a request
///
/// An explicit `external_id` wins, and must agree with `title` when both are given.
/// Titles are matched exactly, surrounding whitespace included.
fn resolve_position(index: &SimilarityIndex, request: &RecommendationRequest) -> AppResult<usize> {
    let title = request.title.as_str();
    let blank = title.trim().is_empty();

    match request.external_id {
        Some(external_id) => {
            let position = index.position_of_external_id(external_id).ok_or_else(|| {
                AppError::NotFound(format!("Movie with id {} not found in catalog", external_id))
            })?;

            if !blank && index.entry(position).map(|e| e.title.as_str()) != Some(title) {
                return Err(AppError::InvalidInput(format!(
                    "Movie id {} is not titled '{}'",
                    external_id, title
                )));
            }

            Ok(position)
        }
        None if blank => Err(AppError::InvalidInput(
            "A movie title is required".to_string(),
        )),
        None => index.resolve_title(title),
    }
}

async fn fetch_or_placeholder(
    provider: &dyn MetadataProvider,
    recommendation: &Recommendation,
) -> Option<MovieDetails> {
    match provider.fetch_details(recommendation.external_id).await {
        Ok(details) => Some(details),
        Err(e) => {
            tracing::warn!(
                error = %e,
                external_id = recommendation.external_id,
                title = %recommendation.title,
                provider = provider.name(),
                "Movie details unavailable, showing placeholder"
            );
            None
        }
    }
}
