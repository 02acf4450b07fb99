use crate::error::{AppError, Result};
use log::warn;
use std::env;
use std::path::PathBuf;

/// Chat model used to turn a shopping profile into a preference description.
pub const DEFAULT_CHAT_MODEL: &str = "meta-llama/Llama-3.3-70b-Instruct";

/// Model used for semantic embeddings of captions and preference text.
pub const DEFAULT_EMBEDDING_MODEL: &str = "intfloat/e5-mistral-7b-instruct";

const DEFAULT_PLATFORM_BASE_URL: &str = "https://api.airefinery.accenture.com/v1";

/// Runtime configuration, read once from the environment at startup.
///
/// `api_key` is optional on purpose: without it the app still serves pages,
/// with every platform-backed feature degraded to an empty result.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub platform_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub data_dir: PathBuf,
    pub top_n: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_key = env::var("API_KEY").ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("API_KEY not set; platform calls are disabled and recommendations will be degraded");
        }

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?;

        let top_n = env::var("TOP_N")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(5);
        if top_n == 0 {
            return Err(AppError::Config("TOP_N must be at least 1".to_string()));
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            api_key,
            platform_base_url: env::var("PLATFORM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PLATFORM_BASE_URL.to_string()),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            top_n,
        })
    }

    /// Source catalog table, as scraped: one row per product with image URLs.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("catalog.csv")
    }

    /// Catalog rows whose images were fetched successfully by `ingest_catalog`.
    pub fn downloaded_path(&self) -> PathBuf {
        self.data_dir.join("catalog_downloaded.csv")
    }

    /// Caption + embedding cache written by `enrich_captions`.
    pub fn captions_path(&self) -> PathBuf {
        self.data_dir.join("captions.json")
    }

    pub fn clothes_dir(&self) -> PathBuf {
        self.data_dir.join("images").join("clothes")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.data_dir.join("images").join("models")
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_key: None,
            platform_base_url: "http://localhost:0".to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            data_dir: PathBuf::from("data"),
            top_n: 5,
        }
    }
}
