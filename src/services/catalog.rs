use crate::config::Config;
use crate::error::Result;
use crate::models::{CaptionRecord, CatalogRecord};
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Read-only, load-once view over the downloaded catalog table and the
/// caption/embedding cache produced by the offline batch jobs.
///
/// Items are addressed by row index in the downloaded table. When either
/// file is absent the store loads empty and `is_ready` reports false; the
/// recommendation engine then degrades to "no results" instead of failing.
#[derive(Debug, Default)]
pub struct CatalogStore {
    records: Vec<CatalogRecord>,
    captions: HashMap<u32, CaptionRecord>,
}

impl CatalogStore {
    pub fn load(config: &Config) -> Self {
        let records = match read_records(&config.downloaded_path()) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "No downloaded catalog at {} ({err}); run `ingest-catalog` first",
                    config.downloaded_path().display()
                );
                Vec::new()
            }
        };

        let captions = match read_captions(&config.captions_path()) {
            Ok(captions) => captions,
            Err(err) => {
                warn!(
                    "No caption cache at {} ({err}); run `enrich-captions` first",
                    config.captions_path().display()
                );
                Vec::new()
            }
        };

        let store = Self::from_parts(records, captions);
        info!(
            "Catalog store loaded: {} rows, {} with caption and embedding",
            store.records.len(),
            store.eligible().count()
        );
        store
    }

    /// Build a store from in-memory tables (tests, tools).
    pub fn from_parts(records: Vec<CatalogRecord>, captions: Vec<CaptionRecord>) -> Self {
        let captions = captions
            .into_iter()
            .map(|caption| (caption.product_id, caption))
            .collect();
        Self { records, captions }
    }

    pub fn is_ready(&self) -> bool {
        !self.records.is_empty() && !self.captions.is_empty()
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn caption_for(&self, product_id: u32) -> Option<&CaptionRecord> {
        self.captions.get(&product_id)
    }

    /// Rows eligible for recommendation: those with a non-empty caption and
    /// embedding in the cache, paired with their table row index.
    pub fn eligible(&self) -> impl Iterator<Item = (usize, &CatalogRecord, &CaptionRecord)> {
        self.records.iter().enumerate().filter_map(|(index, record)| {
            self.captions
                .get(&record.product_id)
                .filter(|caption| !caption.caption.is_empty() && !caption.embedding.is_empty())
                .map(|caption| (index, record, caption))
        })
    }
}

fn read_records(path: &Path) -> Result<Vec<CatalogRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

fn read_captions(path: &Path) -> Result<Vec<CaptionRecord>> {
    let file = File::open(path)?;
    let captions: Vec<CaptionRecord> = serde_json::from_reader(file)?;
    Ok(captions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn record(product_id: u32, category: Category) -> CatalogRecord {
        CatalogRecord {
            product_id,
            image_link: format!("https://shop.example/{product_id}.jpg"),
            model_image_link: format!("https://shop.example/{product_id}-model.jpg"),
            product_link: format!("https://shop.example/products/{product_id}"),
            category,
        }
    }

    fn caption(product_id: u32) -> CaptionRecord {
        CaptionRecord {
            product_id,
            caption: "A white cotton shirt.".to_string(),
            embedding: vec![0.1, 0.2, 0.3],
        }
    }

    #[test]
    fn missing_files_load_as_an_empty_store() {
        let mut config = Config::for_tests();
        config.data_dir = std::path::PathBuf::from("no-such-directory");
        let store = CatalogStore::load(&config);
        assert!(!store.is_ready());
        assert_eq!(store.eligible().count(), 0);
    }

    #[test]
    fn eligible_requires_caption_and_embedding() {
        let records = vec![
            record(1, Category::Tops),
            record(2, Category::Tops),
            record(3, Category::Bottoms),
        ];
        let captions = vec![
            caption(1),
            // Row 2 has no cache entry at all; row 3's entry has no embedding.
            CaptionRecord {
                product_id: 3,
                caption: "Black denim jeans.".to_string(),
                embedding: vec![],
            },
        ];

        let store = CatalogStore::from_parts(records, captions);
        let eligible: Vec<usize> = store.eligible().map(|(index, _, _)| index).collect();
        assert_eq!(eligible, vec![0]);
    }

    #[test]
    fn lookups_by_index_and_product_id() {
        let store = CatalogStore::from_parts(vec![record(7, Category::Outerwear)], vec![caption(7)]);
        assert!(store.is_ready());
        assert_eq!(store.record(0).unwrap().product_id, 7);
        assert!(store.record(1).is_none());
        assert_eq!(store.caption_for(7).unwrap().product_id, 7);
        assert!(store.caption_for(8).is_none());
    }
}
