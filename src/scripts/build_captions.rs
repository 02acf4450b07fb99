//! Caption/embedding enrichment: caption every downloaded clothing image via
//! the platform's vision service, embed each caption, and persist the result
//! as the cache the recommendation engine reads at request time.

use super::read_rows;
use crate::config::Config;
use crate::models::CaptionRecord;
use crate::services::PlatformClient;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fs::{self, File};

pub async fn run(config: &Config) -> Result<()> {
    let platform = PlatformClient::new(config);
    if !platform.is_enabled() {
        warn!("API_KEY missing; the caption cache cannot be built");
        return Ok(());
    }

    let rows = read_rows(&config.downloaded_path())
        .context("No downloaded catalog; run ingest-catalog first")?;
    info!("🖼️  Captioning {} clothing images", rows.len());

    let bar = ProgressBar::new(rows.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {msg}"));

    let mut cache: Vec<CaptionRecord> = Vec::new();
    for row in rows {
        bar.set_message(format!("product {}", row.product_id));
        bar.inc(1);

        let image_path = config.clothes_dir().join(row.image_filename());
        let image = match fs::read(&image_path) {
            Ok(image) => image,
            Err(err) => {
                warn!("Skipping product {}: cannot read {} ({err})", row.product_id, image_path.display());
                continue;
            }
        };

        let caption = match platform.caption_image(&image).await {
            Ok(Some(caption)) => caption,
            Ok(None) => {
                warn!("Skipping product {}: captioner returned nothing", row.product_id);
                continue;
            }
            Err(err) => {
                warn!("Skipping product {}: caption request failed ({err})", row.product_id);
                continue;
            }
        };

        let embedding = match platform.embed_text(&caption).await {
            Ok(embedding) if !embedding.is_empty() => embedding,
            Ok(_) => {
                warn!("Skipping product {}: embedding was empty", row.product_id);
                continue;
            }
            Err(err) => {
                warn!("Skipping product {}: embedding request failed ({err})", row.product_id);
                continue;
            }
        };

        cache.push(CaptionRecord {
            product_id: row.product_id,
            caption,
            embedding,
        });
    }
    bar.finish_and_clear();

    let file = File::create(config.captions_path())?;
    serde_json::to_writer_pretty(file, &cache)?;

    println!(
        "{} {} captions cached at {}",
        style("✔").green(),
        cache.len(),
        config.captions_path().display()
    );
    Ok(())
}
