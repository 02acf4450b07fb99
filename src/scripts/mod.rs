//! Offline batch jobs: catalog image ingestion and caption/embedding
//! enrichment. Each has a thin binary wrapper under `src/bin/`.

pub mod build_captions;
pub mod download_catalog;

use crate::models::CatalogRecord;
use anyhow::{Context, Result};
use std::path::Path;

pub(crate) fn read_rows(path: &Path) -> Result<Vec<CatalogRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open catalog table at {}", path.display()))?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.context("Malformed catalog row")?);
    }
    Ok(rows)
}
