use crate::config::Config;
use crate::error::AppError;
use crate::models::{Category, SessionState};
use crate::services::{CatalogStore, RecommendationEngine};
use crate::templates::{self, OutfitSlot};
use actix_session::Session;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SuggestionForm {
    pub new_outfit: Option<String>,
    pub swap: Option<String>,
}

/// GET `/suggestion`: show the outfit for the active profile. The
/// recommendation is computed once per session visit and cached in session
/// state; swaps only move the per-category cursors over it.
pub async fn suggestion(
    session: Session,
    engine: web::Data<RecommendationEngine>,
    store: web::Data<CatalogStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let mut state = SessionState::load(&session);
    let profile = state.profile();

    if state.recommendation.is_none() {
        let recommendation = engine.recommend(profile, config.top_n).await?;
        state.recommendation = Some(recommendation);
        state.save(&session)?;
    }

    let slots = outfit_slots(&state, &store);
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(templates::suggestion_page(profile, &slots)))
}

/// POST `/suggestion`: "swap <category>" advances that category's cursor,
/// "new outfit" advances tops and bottoms together. Both redirect back to
/// the GET view, which renders at the updated cursors.
pub async fn suggestion_submit(
    session: Session,
    form: web::Form<SuggestionForm>,
) -> Result<HttpResponse, AppError> {
    let mut state = SessionState::load(&session);

    if let Some(category) = form.swap.as_deref().and_then(|s| s.parse::<Category>().ok()) {
        state.advance_cursor(category);
    }

    if form.new_outfit.as_deref() == Some("yes") {
        state.advance_cursor(Category::Tops);
        state.advance_cursor(Category::Bottoms);
    }

    state.save(&session)?;
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/suggestion"))
        .finish())
}

/// Resolve the session's current cursor positions into renderable slots.
/// Categories with nothing to show are simply left out.
fn outfit_slots(state: &SessionState, store: &CatalogStore) -> Vec<OutfitSlot> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let index = state.current_index(category)?;
            let record = store.record(index)?;
            let caption = store
                .caption_for(record.product_id)
                .map(|caption| caption.caption.clone())
                .unwrap_or_default();
            Some(OutfitSlot {
                category,
                product_id: record.product_id,
                caption,
                product_link: record.product_link.clone(),
            })
        })
        .collect()
}
