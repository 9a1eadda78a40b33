use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Single-page UI: movie selector, count and display toggles, result cards
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
