//! Image bytes endpoint

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{Error, Result};
use crate::AppState;

/// GET /image/:id
///
/// Browser-displayable bytes for one listed image. TIFF conversion runs on
/// the blocking pool and does not hold the session lock.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let store = state.store.clone();
    let image = tokio::task::spawn_blocking(move || store.render_for_display(&id))
        .await
        .map_err(|e| Error::Internal(format!("Image task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        image.bytes,
    )
        .into_response())
}
