//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api::{self, AppState};
use crate::{FragmentSource, WebConfig};

/// Build the full axum router.
///
/// The router serves `GET` and `POST` on `/api/report`.
pub fn build_router(source: Option<FragmentSource>, config: &WebConfig) -> Router {
    let app_state = AppState {
        source: source.map(Arc::new),
    };

    Router::new()
        .route("/api/report", get(api::get_report).post(api::post_report))
        .with_state(app_state)
        .layer(cors_layer(config))
}

/// CORS policy for report requests.
///
/// With an explicit origin the browser may also send credentials; without
/// one any origin is allowed and credentials are never allowed.
fn cors_layer(config: &WebConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match &config.allow_origin {
        Some(origin) => cors
            .allow_origin(origin.clone())
            .allow_credentials(config.allow_credentials),
        None => cors.allow_origin(Any),
    }
}

/// Bind the listener and serve `router` on a Tokio task.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "report server listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("report server stopped: {e}");
        }
    });

    Ok(addr)
}
