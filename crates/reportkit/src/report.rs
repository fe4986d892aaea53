//! The base report: a [`ReportSink`] seam and its JSON implementation.
//!
//! Builders such as [`HtmlServerReport`](crate::html::HtmlServerReport) never
//! touch the stack directly. They produce a JSON payload and hand it, together
//! with an optional key and a content-type tag, to a [`ReportSink`].
//! [`JsonServerReport`] is the sink used in practice: it owns the
//! [`ReportStack`] and renders the final response body.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::trace;

use crate::error::ReportError;
use crate::stack::{ReportEntry, ReportKey, ReportStack};

// ── Content types ──────────────────────────────────────────────────

/// Arbitrary structured data.
pub const CONTENT_DATA: &str = "data";
/// Markup destined for a holder in the page.
pub const CONTENT_HTML: &str = "html";
/// A client-side action (`{name, value}`).
pub const CONTENT_ACTION: &str = "action";
/// Pre-encoded JSON content.
pub const CONTENT_JSON: &str = "json";

/// MIME type of every rendered report.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Anything that can accept report content.
///
/// `key` of `None` (or an empty string) appends under the next numeric
/// index; any other key stores the payload there, replacing what was
/// present. No validation is performed on `content_type`. Appending fails
/// only when no numeric index is left.
pub trait ReportSink {
    fn add_report_content(
        &mut self,
        payload: Value,
        key: Option<&str>,
        content_type: &str,
    ) -> Result<&mut Self, ReportError>;
}

/// Response headers embedded in the report body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders {
    pub status: u16,
    pub content_type: &'static str,
}

/// Serializable view of a report: headers plus the content stack.
#[derive(Debug, Serialize)]
pub struct ReportResponse<'a> {
    pub headers: ResponseHeaders,
    pub content: &'a ReportStack,
}

/// A server report rendered as JSON.
#[derive(Debug, Clone)]
pub struct JsonServerReport {
    stack: ReportStack,
    status: u16,
}

impl Default for JsonServerReport {
    fn default() -> Self {
        Self {
            stack: ReportStack::new(),
            status: 200,
        }
    }
}

impl JsonServerReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP status reported in the headers. Default: `200`.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn stack(&self) -> &ReportStack {
        &self.stack
    }

    /// Add a client action. Stored as `{"name": .., "value": ..}` with type
    /// [`CONTENT_ACTION`].
    pub fn add_report_action(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        key: Option<&str>,
    ) -> Result<&mut Self, ReportError> {
        let value: Value = value.into();
        let payload = json!({ "name": name, "value": value });
        self.add_report_content(payload, key, CONTENT_ACTION)
    }

    /// Add arbitrary data with type [`CONTENT_DATA`].
    pub fn add_report_data(
        &mut self,
        value: impl Into<Value>,
        key: Option<&str>,
    ) -> Result<&mut Self, ReportError> {
        self.add_report_content(value.into(), key, CONTENT_DATA)
    }

    /// Remove all content. The status is kept.
    pub fn clear(&mut self) -> &mut Self {
        self.stack.clear();
        self
    }

    pub fn response(&self) -> ReportResponse<'_> {
        ReportResponse {
            headers: ResponseHeaders {
                status: self.status,
                content_type: JSON_CONTENT_TYPE,
            },
            content: &self.stack,
        }
    }

    /// Render the response body.
    pub fn to_json_string(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(&self.response())?)
    }
}

impl ReportSink for JsonServerReport {
    fn add_report_content(
        &mut self,
        payload: Value,
        key: Option<&str>,
        content_type: &str,
    ) -> Result<&mut Self, ReportError> {
        let key = key.and_then(ReportKey::parse);
        let used = self.stack.insert(
            key,
            ReportEntry {
                content_type: content_type.to_string(),
                payload,
            },
        )?;
        trace!(key = %used, content_type, "report content stored");
        Ok(self)
    }
}
