//! HTTP endpoints that answer with reportkit server reports.
//!
//! `reportkit-web` provides an axum server whose responses are rendered
//! [`JsonServerReport`](reportkit::report::JsonServerReport) bodies, plus the
//! [`ReportJson`] wrapper for using reports from your own handlers.
//!
//! # Quick start
//!
//! ```ignore
//! use reportkit_web::{FragmentSource, WebConfig, spawn_web};
//!
//! let source = FragmentSource {
//!     html: std::fs::read_to_string("page.html")?,
//!     select: "main".into(),
//!     holder: "#content".into(),
//!     method: "replace".into(),
//! };
//! let addr = spawn_web(Some(source), WebConfig::default()).await?;
//! println!("Reports: http://{addr}/api/report");
//! ```
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/report  ─▶ configured fragment as html content
//! POST /api/report  ─▶ {"contents": [...], "actions": [...]} as a report
//! ```

mod api;
pub mod response;
mod server;

pub use api::{ActionInstruction, ContentInstruction, ReportRequest};
pub use response::ReportJson;
pub use server::build_router;

use std::net::SocketAddr;

use axum::http::HeaderValue;
use reportkit::html::InsertMethod;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3002`.
    pub bind_addr: SocketAddr,
    /// Origin allowed to read responses cross-site.
    ///
    /// If `None`, any origin is allowed but credentials are not.
    pub allow_origin: Option<HeaderValue>,
    /// Allow cookies and auth headers from `allow_origin`. Default: `false`.
    /// Ignored when no origin is set.
    pub allow_credentials: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3002)),
            allow_origin: None,
            allow_credentials: false,
        }
    }
}

/// Page markup served by `GET /api/report`.
#[derive(Debug, Clone)]
pub struct FragmentSource {
    /// Full HTML document text.
    pub html: String,
    /// Tag name of the element to send.
    pub select: String,
    /// CSS selector the client applies the element to.
    pub holder: String,
    pub method: InsertMethod,
}

/// Spawn the web server on a Tokio task.
///
/// Returns the bound address. The server runs until the Tokio runtime
/// shuts down.
pub async fn spawn_web(
    source: Option<FragmentSource>,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let router = build_router(source, &config);
    server::start_server(router, config.bind_addr).await
}
