use crate::error::Result;
use crate::models::{profile, Category, Recommendation, UserProfile};
use crate::services::{CatalogStore, PlatformClient};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cosine similarity between two vectors, in [-1, 1]. Defined as 0.0 when
/// either vector has zero norm, never an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Group scored rows by category and keep the `top_n` best of each, ordered
/// by descending similarity. The sort is stable: ties keep table order.
fn rank_by_category(scored: &[(usize, Category, f32)], top_n: usize) -> Recommendation {
    let mut recommendation = Recommendation::new();

    for category in Category::ALL {
        let mut rows: Vec<(usize, f32)> = scored
            .iter()
            .filter(|(_, c, _)| *c == category)
            .map(|(index, _, similarity)| (*index, *similarity))
            .collect();
        rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        rows.truncate(top_n);
        recommendation.insert(category, rows.into_iter().map(|(index, _)| index).collect());
    }
    recommendation
}

/// Ranks catalog items for a profile: asks the chat model for a preference
/// description, embeds it, and sorts the cached caption embeddings by cosine
/// similarity within each category.
pub struct RecommendationEngine {
    platform: PlatformClient,
    store: Arc<CatalogStore>,
}

impl RecommendationEngine {
    pub fn new(platform: PlatformClient, store: Arc<CatalogStore>) -> Self {
        Self { platform, store }
    }

    /// Natural-language guess at what clothing the profile's owner would
    /// like, produced by the chat model. Empty when the client is disabled.
    pub async fn preference_description(&self, profile: &UserProfile) -> Result<String> {
        let query = serde_json::to_string_pretty(profile)?;
        self.platform
            .chat_completion(&stylist_system_prompt(), &query)
            .await
    }

    /// Top-`top_n` catalog row indices per category for `profile`, best
    /// match first. Empty map when the catalog or caption cache is missing;
    /// callers must treat that as "no recommendation available".
    pub async fn recommend(&self, profile: &UserProfile, top_n: usize) -> Result<Recommendation> {
        if !self.store.is_ready() {
            warn!(
                "Catalog or caption cache unavailable; no recommendation for {}",
                profile.name
            );
            return Ok(Recommendation::new());
        }

        let description = self.preference_description(profile).await?;
        debug!("Preference description for {}: {description}", profile.name);
        let preference_embedding = self.platform.embed_text(&description).await?;

        let scored: Vec<(usize, Category, f32)> = self
            .store
            .eligible()
            .map(|(index, record, caption)| {
                let similarity = cosine_similarity(&preference_embedding, &caption.embedding);
                (index, record.category, similarity)
            })
            .collect();

        Ok(rank_by_category(&scored, top_n))
    }
}

fn stylist_system_prompt() -> String {
    let example_profile =
        serde_json::to_string_pretty(profile::by_name("Leo Nguyen").expect("demo profile"))
            .expect("demo profile serializes");

    format!(
        "You're a fashion stylist who's a master at picking out the types of clothes \
someone might like.\n\
\n\
Taking as input JSON data of a user's online clothes shopping profile, give a brief \
suggestion of what clothing the user may like.\n\
\n\
Example:\n\
    USER INPUT:\n\
{example_profile}\n\
\n\
    RESPONSE:\n\
    Leo Nguyen is looking for an outfit with a smart casual aesthetic, appropriate \
for the work environment. He has a preference for slim-fitting navy whites, though \
other colors are likely to match his style too, such as light gray and beige.\n\
\n\
Context:\n\
\n\
The profile fields you will take as input: name, age, gender, aesthetic, size, \
budget, event_type, browsing_data, purchase_history (item and price), preferences."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{CaptionRecord, CatalogRecord};

    fn record(product_id: u32, category: Category) -> CatalogRecord {
        CatalogRecord {
            product_id,
            image_link: format!("https://shop.example/{product_id}.jpg"),
            model_image_link: format!("https://shop.example/{product_id}-model.jpg"),
            product_link: format!("https://shop.example/products/{product_id}"),
            category,
        }
    }

    fn caption(product_id: u32, embedding: Vec<f32>) -> CaptionRecord {
        CaptionRecord {
            product_id,
            caption: format!("Item {product_id}."),
            embedding,
        }
    }

    fn engine_with(store: CatalogStore) -> RecommendationEngine {
        let platform = PlatformClient::new(&Config::for_tests());
        RecommendationEngine::new(platform, Arc::new(store))
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let a = [1.0, 2.0, -3.0];
        let b = [0.5, -1.0, 2.0];
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        assert_eq!(ab, ba);
        assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let a = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let a = [1.0, 2.0];
        let b = [-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero_not_an_error() {
        assert_eq!(cosine_similarity(&[], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn ranking_orders_by_descending_similarity() {
        // Three tops with similarities [0.9, 0.2, 0.5] must rank [0, 2, 1].
        let scored = [
            (0, Category::Tops, 0.9),
            (1, Category::Tops, 0.2),
            (2, Category::Tops, 0.5),
        ];
        let recommendation = rank_by_category(&scored, 5);
        assert_eq!(recommendation[&Category::Tops], vec![0, 2, 1]);
        assert!(recommendation[&Category::Bottoms].is_empty());
        assert!(recommendation[&Category::Outerwear].is_empty());
    }

    #[test]
    fn ranking_truncates_to_top_n_per_category() {
        let scored = [
            (0, Category::Bottoms, 0.1),
            (1, Category::Bottoms, 0.4),
            (2, Category::Bottoms, 0.3),
            (3, Category::Bottoms, 0.2),
        ];
        let recommendation = rank_by_category(&scored, 2);
        assert_eq!(recommendation[&Category::Bottoms], vec![1, 2]);
    }

    #[test]
    fn ranking_breaks_ties_by_table_order() {
        let scored = [
            (0, Category::Tops, 0.5),
            (1, Category::Tops, 0.5),
            (2, Category::Tops, 0.5),
        ];
        let recommendation = rank_by_category(&scored, 3);
        assert_eq!(recommendation[&Category::Tops], vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn recommend_returns_empty_map_when_store_unready() {
        let engine = engine_with(CatalogStore::default());
        let recommendation = engine
            .recommend(profile::default_profile(), 5)
            .await
            .unwrap();
        assert!(recommendation.is_empty());
    }

    #[tokio::test]
    async fn recommend_only_references_captioned_rows() {
        let records = vec![
            record(10, Category::Tops),
            record(11, Category::Tops),
            record(12, Category::Bottoms),
        ];
        // Row 1 (product 11) has no cache entry, so it must never appear.
        let captions = vec![caption(10, vec![0.1, 0.2]), caption(12, vec![0.3, 0.1])];
        let store = CatalogStore::from_parts(records, captions);
        let engine = engine_with(store);

        let recommendation = engine
            .recommend(profile::default_profile(), 5)
            .await
            .unwrap();

        assert_eq!(recommendation[&Category::Tops], vec![0]);
        assert_eq!(recommendation[&Category::Bottoms], vec![2]);
        for indices in recommendation.values() {
            assert!(indices.len() <= 5);
        }
    }

    #[tokio::test]
    async fn disabled_client_degrades_to_table_order() {
        // With no API key the preference embedding is empty, every similarity
        // is 0.0, and the stable sort preserves table order.
        let records = vec![
            record(20, Category::Tops),
            record(21, Category::Tops),
            record(22, Category::Tops),
        ];
        let captions = vec![
            caption(20, vec![0.9, 0.1]),
            caption(21, vec![0.1, 0.9]),
            caption(22, vec![0.5, 0.5]),
        ];
        let engine = engine_with(CatalogStore::from_parts(records, captions));

        let recommendation = engine
            .recommend(profile::default_profile(), 2)
            .await
            .unwrap();
        assert_eq!(recommendation[&Category::Tops], vec![0, 1]);
    }
}
