//! axum response wrapper for rendered reports.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use reportkit::report::{JSON_CONTENT_TYPE, JsonServerReport};
use tracing::error;

/// A [`JsonServerReport`] returned from a handler.
///
/// The HTTP status comes from the report's own status; the body is the
/// rendered report. An encoding failure becomes a `500` with a plain-text
/// message.
pub struct ReportJson(pub JsonServerReport);

impl IntoResponse for ReportJson {
    fn into_response(self) -> Response {
        match self.0.to_json_string() {
            Ok(body) => {
                let status = StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::OK);
                (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
            }
            Err(e) => {
                error!("failed to render report: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}
