use crate::error::AppError;
use crate::models::SessionState;
use crate::templates;
use actix_session::Session;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;

/// Buttons on the landing form. Every field is optional because each button
/// submits only its own name/value pair.
#[derive(Debug, Deserialize)]
pub struct LandingForm {
    pub gave_feedback: Option<String>,
    pub do_profile_switch: Option<String>,
    pub feedback_text: Option<String>,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// GET `/`: the welcome page. Entering the landing state always resets the
/// feedback flag, the cached recommendation and the swap cursors; the
/// selected profile (defaulting to Ava) is kept.
pub async fn landing(session: Session) -> Result<HttpResponse, AppError> {
    let mut state = SessionState::load(&session);
    state.reset();
    state.save(&session)?;

    Ok(html(templates::landing_page(state.profile(), false)))
}

/// POST `/`: feedback prompt, profile switch, or the move to `/suggestion`.
pub async fn landing_submit(
    session: Session,
    form: web::Form<LandingForm>,
) -> Result<HttpResponse, AppError> {
    let mut state = SessionState::load(&session);

    state.gave_feedback = matches!(form.gave_feedback.as_deref(), Some("yes") | Some("submit"));

    // "Give feedback" re-renders the landing page with the feedback box open.
    if form.gave_feedback.as_deref() == Some("yes") {
        state.save(&session)?;
        return Ok(html(templates::landing_page(state.profile(), true)));
    }

    // Sent feedback is only acknowledged in the demo, not stored anywhere.
    if form.gave_feedback.as_deref() == Some("submit") {
        let text = form.feedback_text.as_deref().unwrap_or_default();
        info!("Feedback from {}: {text}", state.profile().name);
    }

    if form.do_profile_switch.as_deref() == Some("yes") {
        state.switch_profile();
        state.save(&session)?;
        return Ok(html(templates::landing_page(state.profile(), false)));
    }

    // Any other submission moves on to the suggestion page.
    state.save(&session)?;
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/suggestion"))
        .finish())
}
