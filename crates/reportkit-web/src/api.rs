//! REST endpoint handlers.
//!
//! `GET /api/report` renders the server's configured page fragment into a
//! report; `POST /api/report` builds a report from a list of instructions
//! sent by the caller.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use reportkit::ReportError;
use reportkit::html::{ContentOptions, HtmlServerReport, InsertMethod};
use reportkit::markup::parse_document;
use reportkit::report::{CONTENT_HTML, JsonServerReport};
use serde::Deserialize;
use tracing::warn;

use crate::FragmentSource;
use crate::response::ReportJson;

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub source: Option<Arc<FragmentSource>>,
}

/// GET /api/report — Report built from the configured fragment.
///
/// Returns an empty report when no fragment is configured, 404 when the
/// configured selector matches nothing.
pub async fn get_report(State(app): State<AppState>) -> Result<ReportJson, StatusCode> {
    let report = match app.source.as_deref() {
        Some(source) => render_source(source)?,
        None => JsonServerReport::new(),
    };
    Ok(ReportJson(report))
}

// The parsed DOM is not `Send`, so it never lives inside the handler future.
fn render_source(source: &FragmentSource) -> Result<JsonServerReport, StatusCode> {
    let doc = parse_document(&source.html);
    let Some(node) = doc.select_first(&source.select) else {
        warn!(select = %source.select, "configured fragment has no matching element");
        return Err(StatusCode::NOT_FOUND);
    };

    let options = ContentOptions::new()
        .with_holder(source.holder.clone())
        .with_method(source.method.clone());
    let mut report: HtmlServerReport = HtmlServerReport::default();
    report
        .add_report_content(Some(node.into()), &options)
        .map_err(|e| {
            warn!("failed to add configured fragment: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    Ok(report.into_inner())
}

/// Request body for POST /api/report.
#[derive(Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub contents: Vec<ContentInstruction>,
    #[serde(default)]
    pub actions: Vec<ActionInstruction>,
}

/// One piece of content to add. Omitted fields take the builder defaults.
#[derive(Deserialize)]
pub struct ContentInstruction {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "type", default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub holder: String,
    #[serde(default)]
    pub method: InsertMethod,
    #[serde(default)]
    pub key: Option<String>,
}

fn default_content_type() -> String {
    CONTENT_HTML.to_string()
}

/// A client action to add after the contents.
#[derive(Deserialize)]
pub struct ActionInstruction {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub key: Option<String>,
}

/// POST /api/report — Build a report from caller instructions.
///
/// Contents are added in order, then actions. Contents arrive as raw
/// strings, so the only way adding fails is an unkeyed item after the
/// largest numeric key has been taken; that answers 422.
pub async fn post_report(Json(body): Json<ReportRequest>) -> Result<ReportJson, StatusCode> {
    let mut report: HtmlServerReport = HtmlServerReport::default();

    for item in body.contents {
        let mut options = ContentOptions::new()
            .with_type(item.content_type)
            .with_holder(item.holder)
            .with_method(item.method);
        options.key = item.key;

        report
            .add_report_content(item.content.map(Into::into), &options)
            .map_err(reject)?;
    }

    let sink = report.sink_mut();
    for action in body.actions {
        sink.add_report_action(&action.name, action.value, action.key.as_deref())
            .map_err(reject)?;
    }

    Ok(ReportJson(report.into_inner()))
}

fn reject(e: ReportError) -> StatusCode {
    warn!("rejected report instruction: {e}");
    StatusCode::UNPROCESSABLE_ENTITY
}
