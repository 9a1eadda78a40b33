//! Movie metadata provider abstraction
//!
//! The recommendation flow only needs "details for this external id". Keeping that
//! behind a trait lets the TMDB client be swapped for a stub in tests, or for
//! another metadata source later.

use crate::{error::AppResult, models::MovieDetails};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch poster, overview, rating, release date and genres for one movie
    async fn fetch_details(&self, external_id: i64) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
