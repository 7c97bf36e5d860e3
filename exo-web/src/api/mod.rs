//! HTTP API handlers for exo-web

pub mod compare;
pub mod health;
pub mod images;
pub mod select;
pub mod status;
pub mod ui;

pub use compare::{get_pair, serve_compare};
pub use health::health_routes;
pub use images::serve_image;
pub use select::{submit_selection, submit_selection_json};
pub use status::get_status;
pub use ui::{serve_exo_css, serve_exo_js};

use serde::Serialize;
use std::path::Path;

use crate::pairs::Pair;

/// JSON body for the pair-producing endpoints
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairResponse {
    /// Show this pair next
    Pair {
        image_a: String,
        image_b: String,
        /// Archive file written just before this pair, if a round ended
        #[serde(skip_serializing_if = "Option::is_none")]
        archived: Option<String>,
    },
    /// Round complete; the log was archived under this name
    Done { archived: String },
}

impl PairResponse {
    pub fn pair(pair: &Pair, archived: Option<&Path>) -> Self {
        PairResponse::Pair {
            image_a: pair.image_a().to_string(),
            image_b: pair.image_b().to_string(),
            archived: archived.map(archive_name),
        }
    }

    pub fn done(archived: &Path) -> Self {
        PairResponse::Done {
            archived: archive_name(archived),
        }
    }
}

/// File name of an archive, as shown to clients
pub fn archive_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
