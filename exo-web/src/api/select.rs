//! Decision submission

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use tracing::info;

use super::{archive_name, ui, PairResponse};
use crate::error::Result;
use crate::session::Decision;
use crate::AppState;

/// The pair that was shown and the image picked from it
#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    pub image_a: String,
    pub image_b: String,
    pub chosen: String,
}

async fn record(state: &AppState, form: &SelectionForm) -> Result<Decision> {
    let mut session = state.session.lock().await;
    session.record(&state.store, &form.image_a, &form.image_b, &form.chosen)
}

/// POST /select
///
/// Form post from the comparison page. Redirects back to `/` while pairs
/// remain; renders the completion page once the round is over.
pub async fn submit_selection(
    State(state): State<AppState>,
    Form(form): Form<SelectionForm>,
) -> Result<Response> {
    match record(&state, &form).await? {
        Decision::Next(_) => Ok(Redirect::to("/").into_response()),
        Decision::Done { archived } => {
            info!("Round complete, archive {}", archive_name(&archived));
            Ok(Html(ui::render_finished(&archived)).into_response())
        }
    }
}

/// POST /api/select
///
/// JSON variant: answers with the next pair or a `done` status.
pub async fn submit_selection_json(
    State(state): State<AppState>,
    Json(form): Json<SelectionForm>,
) -> Result<Json<PairResponse>> {
    let response = match record(&state, &form).await? {
        Decision::Next(pair) => PairResponse::pair(&pair, None),
        Decision::Done { archived } => PairResponse::done(&archived),
    };
    Ok(Json(response))
}
