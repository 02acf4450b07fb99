use crate::handlers::{health_check, landing, landing_submit, suggestion, suggestion_submit};
use actix_web::web;

/// Configure the two page routes plus the health endpoint. Static image
/// mounts live in `app.rs` because they depend on configured paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(landing))
            .route(web::post().to(landing_submit)),
    )
    .service(
        web::resource("/suggestion")
            .route(web::get().to(suggestion))
            .route(web::post().to(suggestion_submit)),
    )
    .service(health_check);
}
