pub mod catalog;
pub mod platform;
pub mod recommendation;

// Re-export public types
pub use catalog::CatalogStore;
pub use platform::PlatformClient;
pub use recommendation::{cosine_similarity, RecommendationEngine};
