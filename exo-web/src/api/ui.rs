//! UI serving routes
//!
//! Page templates, stylesheet and script are embedded at compile time.
//! Templates use `{{NAME}}` placeholders filled by plain substitution.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::Path;

use super::archive_name;
use crate::pairs::Pair;

const COMPARE_HTML: &str = include_str!("../../ui/compare.html");
const FINISHED_HTML: &str = include_str!("../../ui/finished.html");
const EXO_CSS: &str = include_str!("../../ui/exo.css");
const EXO_JS: &str = include_str!("../../ui/exo.js");

/// Fill the comparison page for `pair`
pub fn render_compare(pair: &Pair, archived: Option<&Path>) -> String {
    let notice = match archived {
        Some(path) => format!(
            r#"<p class="notice">Previous round complete. Selections archived as <code>{}</code>.</p>"#,
            escape_html(&archive_name(path))
        ),
        None => String::new(),
    };

    fill(
        COMPARE_HTML,
        &[
            ("NOTICE", notice.as_str()),
            ("IMAGE_A_URL", image_url(pair.image_a()).as_str()),
            ("IMAGE_B_URL", image_url(pair.image_b()).as_str()),
            ("IMAGE_A", escape_html(pair.image_a()).as_str()),
            ("IMAGE_B", escape_html(pair.image_b()).as_str()),
        ],
    )
}

/// Fill the end-of-round page
pub fn render_finished(archived: &Path) -> String {
    fill(
        FINISHED_HTML,
        &[("ARCHIVE", escape_html(&archive_name(archived)).as_str())],
    )
}

/// Substitute `{{NAME}}` placeholders in one pass over the template.
/// Inserted values are never scanned again; unknown names are left as-is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let known = after.find("}}").and_then(|end| {
            values
                .iter()
                .find(|(name, _)| *name == &after[..end])
                .map(|(_, value)| (end, *value))
        });
        match known {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// GET /static/exo.css
pub async fn serve_exo_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css")], EXO_CSS).into_response()
}

/// GET /static/exo.js
pub async fn serve_exo_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        EXO_JS,
    )
        .into_response()
}

fn image_url(id: &str) -> String {
    format!("/image/{}", escape_html(&encode_path_segment(id)))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode everything outside the RFC 3986 unreserved set
fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}
