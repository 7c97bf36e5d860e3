//! Comparison view
//!
//! `GET /` renders the HTML page, `GET /api/pair` returns the same pair as JSON.

use axum::{extract::State, response::Html, Json};

use super::{ui, PairResponse};
use crate::error::Result;
use crate::AppState;

/// GET /
///
/// Page showing an unseen pair side by side. If the previous round was
/// complete the log is archived first and the page says so.
pub async fn serve_compare(State(state): State<AppState>) -> Result<Html<String>> {
    let shown = {
        let mut session = state.session.lock().await;
        session.present(&state.store)?
    };

    Ok(Html(ui::render_compare(
        &shown.pair,
        shown.archived.as_deref(),
    )))
}

/// GET /api/pair
pub async fn get_pair(State(state): State<AppState>) -> Result<Json<PairResponse>> {
    let shown = {
        let mut session = state.session.lock().await;
        session.present(&state.store)?
    };

    Ok(Json(PairResponse::pair(&shown.pair, shown.archived.as_deref())))
}
