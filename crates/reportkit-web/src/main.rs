//! Serve a page fragment as an asynchronous report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p reportkit-web -- --fragment page.html --select main --holder "#content"
//! cargo run -p reportkit-web -- --port 8080 --allow-origin http://localhost:3000 --allow-credentials
//! ```
//!
//! `GET /api/report` returns the selected element as html content.
//! `POST /api/report` builds a report from a JSON body:
//!
//! ```json
//! {"contents": [{"content": "<b>hi</b>", "holder": "#main", "method": "append"}],
//!  "actions": [{"name": "reload"}]}
//! ```

use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;
use reportkit_web::{FragmentSource, WebConfig, spawn_web};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Serve a page fragment as an asynchronous report.
#[derive(Parser)]
#[command(name = "reportkit-web")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 3002)]
    port: u16,

    /// HTML document to serve from GET /api/report.
    #[arg(long)]
    fragment: Option<PathBuf>,

    /// Tag name of the element to send from the document.
    #[arg(long, default_value = "body")]
    select: String,

    /// CSS selector of the target node on the client.
    #[arg(long, default_value = "")]
    holder: String,

    /// How the client applies the content (replace or append).
    #[arg(long, default_value = "replace")]
    method: String,

    /// Origin allowed to read responses cross-site.
    #[arg(long)]
    allow_origin: Option<String>,

    /// Allow credentials from the configured origin.
    #[arg(long)]
    allow_credentials: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let source = match &args.fragment {
        Some(path) => {
            let html = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            Some(FragmentSource {
                html,
                select: args.select.clone(),
                holder: args.holder.clone(),
                method: args.method.as_str().into(),
            })
        }
        None => None,
    };

    let allow_origin = args
        .allow_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .map_err(|e| format!("invalid --allow-origin: {e}"))?;

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        allow_origin,
        allow_credentials: args.allow_credentials,
    };

    let addr = spawn_web(source, config)
        .await
        .map_err(|e| format!("failed to start server: {e}"))?;
    println!("Reports: http://{addr}/api/report");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to wait for ctrl-c: {e}"))?;
    Ok(())
}
