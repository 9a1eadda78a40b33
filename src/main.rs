use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use reelrank::{
    config::Config,
    db::{create_redis_client, load_similarity_index, Cache, MetadataTable},
    routes::{create_router, AppState},
    services::{
        providers::{MetadataProvider, TmdbProvider},
        RecommendationSettings,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelrank=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let index = load_similarity_index(&config.artifact_path)
        .inspect_err(|e| tracing::error!(error = %e, "Cannot start without similarity data"))
        .context("Failed to load similarity artifact")?;

    let metadata = match &config.catalog_csv_path {
        Some(path) => MetadataTable::load(path).context("Failed to load supplementary catalog")?,
        None => {
            tracing::info!("No CATALOG_CSV_PATH set, supplementary metadata disabled");
            MetadataTable::default()
        }
    };

    let (cache, cache_handle) = match config.cache_url() {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let provider: Option<Arc<dyn MetadataProvider>> = match config.tmdb_api_key.clone() {
        Some(api_key) => Some(Arc::new(TmdbProvider::new(
            api_key,
            config.tmdb_api_url.clone(),
            config.request_timeout(),
            config.request_delay(),
            cache,
        )?)),
        None => {
            tracing::warn!("No TMDB_API_KEY set, recommendations will show without movie details");
            None
        }
    };

    let state = Arc::new(AppState {
        index: Arc::new(index),
        metadata: Arc::new(metadata),
        provider,
        settings: RecommendationSettings {
            default_count: config.default_count,
            max_count: config.max_count,
            image_base_url: config.tmdb_image_url.clone(),
        },
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
