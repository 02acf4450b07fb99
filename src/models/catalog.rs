use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of clothing categories partitioning the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Tops, Category::Bottoms, Category::Outerwear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Outerwear => "outerwear",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tops" => Ok(Category::Tops),
            "bottoms" => Ok(Category::Bottoms),
            "outerwear" => Ok(Category::Outerwear),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// One row of the clothing catalog table.
///
/// Field names match the CSV header of the source table:
/// `product_id,image_link,model_image_link,product_link,category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub product_id: u32,
    pub image_link: String,
    pub model_image_link: String,
    pub product_link: String,
    pub category: Category,
}

impl CatalogRecord {
    /// Local filename both downloaded images are stored under.
    pub fn image_filename(&self) -> String {
        format!("{}.jpg", self.product_id)
    }
}

/// Enrichment output for one catalog item: the caption produced by the vision
/// service and the embedding of that caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionRecord {
    pub product_id: u32,
    pub caption: String,
    pub embedding: Vec<f32>,
}

/// Per-category ordered lists of catalog row indices, best match first.
/// An empty map means "no recommendation available".
pub type Recommendation = BTreeMap<Category, Vec<usize>>;
