use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use reelrank::{
    db::{load_similarity_index, MetadataTable},
    error::{AppError, AppResult},
    models::{CatalogEntry, MovieDetails},
    routes::{create_router, AppState},
    services::{providers::MetadataProvider, RecommendationSettings, SimilarityIndex},
};

/// Serves canned details, failing for one id the way a timed-out request would
struct StubProvider {
    failing_id: i64,
}

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn fetch_details(&self, external_id: i64) -> AppResult<MovieDetails> {
        if external_id == self.failing_id {
            return Err(AppError::ExternalApi("request timed out".to_string()));
        }
        Ok(MovieDetails {
            external_id,
            poster_path: Some(format!("/{}.jpg", external_id)),
            overview: Some(format!("Overview of {}", external_id)),
            vote_average: Some(6.5),
            release_date: Some("2004-05-14".to_string()),
            genres: vec!["Adventure".to_string()],
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn abc_index() -> SimilarityIndex {
    SimilarityIndex::from_parts(
        vec![
            CatalogEntry::new("A", 1),
            CatalogEntry::new("B", 2),
            CatalogEntry::new("C", 3),
            CatalogEntry::new("Twin", 4),
            CatalogEntry::new("Twin", 5),
        ],
        vec![
            vec![1.0, 0.9, 0.3, 0.1, 0.1],
            vec![0.9, 1.0, 0.5, 0.2, 0.2],
            vec![0.3, 0.5, 1.0, 0.0, 0.0],
            vec![0.1, 0.2, 0.0, 1.0, 0.8],
            vec![0.1, 0.2, 0.0, 0.8, 1.0],
        ],
    )
    .unwrap()
}

fn create_test_server(provider: Option<Arc<dyn MetadataProvider>>) -> TestServer {
    let state = Arc::new(AppState {
        index: Arc::new(abc_index()),
        metadata: Arc::new(MetadataTable::default()),
        provider,
        settings: RecommendationSettings {
            default_count: 2,
            max_count: 10,
            image_base_url: "https://img.test/w500".to_string(),
        },
    });
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(None);
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies"], 5);
    assert_eq!(body["details_enabled"], false);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = create_test_server(None);
    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_index_page_served() {
    let server = create_test_server(None);
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Movie Recommendation System"));
}

#[tokio::test]
async fn test_list_movies() {
    let server = create_test_server(None);

    let all: Vec<Value> = server.get("/api/v1/movies").await.json();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0]["title"], "A");
    assert_eq!(all[0]["external_id"], 1);

    let twins: Vec<Value> = server
        .get("/api/v1/movies")
        .add_query_param("q", "twin")
        .await
        .json();
    assert_eq!(twins.len(), 2);
}

#[tokio::test]
async fn test_get_movie() {
    let server = create_test_server(None);

    let response = server.get("/api/v1/movies/3").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "C");
    assert_eq!(body["position"], 2);
    assert!(body["metadata"].is_null());

    server
        .get("/api/v1/movies/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommend_scenario() {
    let server = create_test_server(None);

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "A", "count": 2 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "A");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "B");
    assert_eq!(results[0]["external_id"], 2);
    assert_eq!(results[0]["similarity_score"], 0.9);
    assert_eq!(results[0]["similarity_percent"], "90.0%");
    assert_eq!(results[1]["title"], "C");
    assert_eq!(results[1]["similarity_score"], 0.3);
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_recommend_uses_default_count() {
    let server = create_test_server(None);
    let body: Value = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "B" }))
        .await
        .json();
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recommend_clamps_to_catalog() {
    let server = create_test_server(None);
    let body: Value = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "C", "count": 10 }))
        .await
        .json();

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["title"] != "C"));
}

#[tokio::test]
async fn test_recommend_zero_count_warns() {
    let server = create_test_server(None);
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "A", "count": 0 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["results"].as_array().unwrap().is_empty());
    assert_eq!(body["warning"], "No recommendations found for 'A'");
}

#[tokio::test]
async fn test_recommend_unknown_title() {
    let server = create_test_server(None);
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Zardoz" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Zardoz"));
}

#[tokio::test]
async fn test_recommend_ambiguous_title() {
    let server = create_test_server(None);
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Twin" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["candidates"], json!([4, 5]));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Twin", "external_id": 5, "count": 1 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"][0]["external_id"], 4);
}

#[tokio::test]
async fn test_recommend_title_with_trailing_space_from_selector() {
    let index = SimilarityIndex::from_parts(
        vec![CatalogEntry::new("Heat ", 1), CatalogEntry::new("Ronin", 2)],
        vec![vec![1.0, 0.7], vec![0.7, 1.0]],
    )
    .unwrap();
    let state = Arc::new(AppState {
        index: Arc::new(index),
        metadata: Arc::new(MetadataTable::default()),
        provider: None,
        settings: RecommendationSettings::default(),
    });
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "Heat ", "external_id": 1 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "Heat ");
    assert_eq!(body["results"][0]["title"], "Ronin");
}

#[tokio::test]
async fn test_recommend_with_details_degrades_per_item() {
    let server = create_test_server(Some(Arc::new(StubProvider { failing_id: 2 })));

    let body: Value = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "C", "count": 2 }))
        .await
        .json();

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    // B (id 2) failed: placeholder only
    assert_eq!(results[0]["title"], "B");
    assert_eq!(results[0]["details_available"], false);
    assert!(results[0].get("poster_url").is_none());
    assert!(results[0].get("info_line").is_none());
    assert!(results[0].get("overview").is_none());

    // A (id 1) unaffected
    assert_eq!(results[1]["title"], "A");
    assert_eq!(results[1]["details_available"], true);
    assert_eq!(results[1]["poster_url"], "https://img.test/w500/1.jpg");
    assert_eq!(results[1]["info_line"], "⭐ 6.5/10 | 2004 | Adventure");
    assert_eq!(results[1]["overview"], "Overview of 1");
}

#[tokio::test]
async fn test_recommend_hides_score_when_asked() {
    let server = create_test_server(None);
    let body: Value = server
        .post("/api/v1/recommendations")
        .json(&json!({ "title": "A", "show_score": false }))
        .await
        .json();

    assert!(body["results"][0].get("similarity_percent").is_none());
    assert_eq!(body["results"][0]["similarity_score"], 0.9);
}

#[test]
fn test_bundled_demo_artifact_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/movie_data.json");
    let index = load_similarity_index(path).unwrap();

    let n = index.len() as i64;
    let avatar = index.recommend("Avatar", n).unwrap();
    assert_eq!(avatar.len() as i64, n - 1);
    assert!(avatar.iter().all(|r| r.title != "Avatar"));
}
