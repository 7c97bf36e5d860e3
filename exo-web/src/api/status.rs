//! Session progress endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::session::SessionStatus;
use crate::AppState;

/// GET /api/status
///
/// Image count, pair totals and number of decisions in the current log.
pub async fn get_status(State(state): State<AppState>) -> Result<Json<SessionStatus>> {
    let session = state.session.lock().await;
    Ok(Json(session.status(&state.store)?))
}
