//! exo-web library - ExO (Expert Opinion) pairwise image comparison
//!
//! Serves random pairs of images, records which one the evaluator picks
//! and rotates the selection log once every pair has been judged.

use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod images;
pub mod pairs;
pub mod selections;
pub mod session;

pub use error::{Error, Result};

use images::ImageStore;
use session::Session;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Source image directory (read-only)
    pub store: ImageStore,
    /// Seen pairs and selection log, one writer at a time
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(store: ImageStore, session: Session) -> Self {
        Self {
            store,
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    // Browser pages and form posts
    let pages = Router::new()
        .route("/", get(api::serve_compare))
        .route("/select", post(api::submit_selection))
        .route("/image/:id", get(api::serve_image))
        .route("/static/exo.css", get(api::serve_exo_css))
        .route("/static/exo.js", get(api::serve_exo_js));

    // JSON API
    let json = Router::new()
        .route("/api/pair", get(api::get_pair))
        .route("/api/select", post(api::submit_selection_json))
        .route("/api/status", get(api::get_status));

    Router::new()
        .merge(pages)
        .merge(json)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
