//! Catalog ingestion: fetch every item's clothing and model photos, drop
//! rows with a failed fetch, and persist the surviving rows as the
//! "downloaded" table the web app serves from.

use super::read_rows;
use crate::config::Config;
use crate::models::CatalogRecord;
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use reqwest::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT_SECONDS: u64 = 30;

type FetchedRow = (CatalogRecord, Option<Vec<u8>>, Option<Vec<u8>>);

pub async fn run(config: &Config) -> Result<()> {
    info!("🧺 Reading catalog at {}", config.catalog_path().display());

    fs::create_dir_all(config.clothes_dir())?;
    fs::create_dir_all(config.models_dir())?;

    let rows = read_rows(&config.catalog_path())?;
    info!("📖 {} catalog rows to fetch", rows.len());

    let client = Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
        .build()?;

    let bar = ProgressBar::new(rows.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}"));

    let mut fetched: Vec<FetchedRow> = Vec::new();
    for row in rows {
        bar.set_message(format!("product {}", row.product_id));
        let clothing = fetch_image(&client, &row.image_link).await;
        let model = fetch_image(&client, &row.model_image_link).await;
        fetched.push((row, clothing, model));
        bar.inc(1);
    }
    bar.finish_and_clear();

    let complete = filter_complete(fetched);
    for (row, clothing, model) in &complete {
        fs::write(config.clothes_dir().join(row.image_filename()), clothing)?;
        fs::write(config.models_dir().join(row.image_filename()), model)?;
    }

    let kept: Vec<CatalogRecord> = complete.into_iter().map(|(row, _, _)| row).collect();
    write_downloaded(&config.downloaded_path(), &kept)?;

    println!(
        "{} {} rows kept, table written to {}",
        style("✔").green(),
        kept.len(),
        config.downloaded_path().display()
    );
    Ok(())
}

/// Best-effort single GET, no retry. `None` on any failure.
async fn fetch_image(client: &Client, url: &str) -> Option<Vec<u8>> {
    match client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
    {
        Ok(response) => match response.bytes().await {
            Ok(bytes) => {
                debug!("Found image at: {url}");
                Some(bytes.to_vec())
            }
            Err(err) => {
                warn!("Error reading image body from {url}: {err}");
                None
            }
        },
        Err(err) => {
            warn!("Error fetching image from {url}: {err}");
            None
        }
    }
}

/// Keep only rows where both images arrived; a row with any failed fetch is
/// discarded entirely, leaving no partial state behind.
fn filter_complete(rows: Vec<FetchedRow>) -> Vec<(CatalogRecord, Vec<u8>, Vec<u8>)> {
    rows.into_iter()
        .filter_map(|(row, clothing, model)| match (clothing, model) {
            (Some(clothing), Some(model)) => Some((row, clothing, model)),
            _ => {
                warn!("Skipping product {}: image fetch failed", row.product_id);
                None
            }
        })
        .collect()
}

fn write_downloaded(path: &Path, rows: &[CatalogRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn record(product_id: u32) -> CatalogRecord {
        CatalogRecord {
            product_id,
            image_link: format!("https://shop.example/{product_id}.jpg"),
            model_image_link: format!("https://shop.example/{product_id}-model.jpg"),
            product_link: format!("https://shop.example/products/{product_id}"),
            category: Category::Tops,
        }
    }

    #[test]
    fn rows_with_any_failed_fetch_are_dropped() {
        // Product 1's clothing image failed, product 2 fetched fully.
        let fetched = vec![
            (record(1), None, Some(vec![2u8])),
            (record(2), Some(vec![3u8]), Some(vec![4u8])),
        ];

        let kept = filter_complete(fetched);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0.product_id, 2);
    }

    #[test]
    fn downloaded_table_round_trips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("downloaded.csv");
        let rows = vec![record(11), record(12)];

        write_downloaded(&path, &rows).unwrap();
        let back = read_rows(&path).unwrap();
        assert_eq!(back, rows);
    }
}
