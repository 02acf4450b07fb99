use crate::config::Config;
use crate::services::CatalogStore;
use actix_web::{get, web, HttpResponse};

#[get("/health")]
pub async fn health_check(store: web::Data<CatalogStore>, config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "catalog_ready": store.is_ready(),
        "platform_enabled": config.api_key.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
