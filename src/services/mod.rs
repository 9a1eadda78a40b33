pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod title_search;

pub use recommendations::RecommendationSettings;
pub use similarity::SimilarityIndex;
