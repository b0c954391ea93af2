// src/utils/common.rs

use crate::error::Result;
use axum::{http::StatusCode, routing::get, serve, Router};
use prometheus::{gather, Encoder, TextEncoder};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Resolves a dot-delimited field path against a document's field map.
/// Intermediate segments must be objects; anything else resolves to `None`.
pub fn value_at<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// True if `ancestor` is a strict dot-segment prefix of `descendant`,
/// e.g. `text` is a prefix of `text.body` but not of `textual`.
pub fn is_dot_prefix(ancestor: &str, descendant: &str) -> bool {
    descendant.len() > ancestor.len()
        && descendant.starts_with(ancestor)
        && descendant.as_bytes()[ancestor.len()] == b'.'
}

/// Splits a full document path into `(collection_path, doc_id)` on the last
/// `/`. A path without a separator is treated as a bare document id.
pub fn split_doc_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

// Axum handler for /metrics.
async fn metrics_handler() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&gather(), &mut buffer) {
        error!("Could not encode prometheus metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Could not encode prometheus metrics: {}", e),
        );
    }
    match String::from_utf8(buffer) {
        Ok(s) => (StatusCode::OK, s),
        Err(e) => {
            error!("Prometheus metrics UTF-8 error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Prometheus metrics UTF-8 error: {}", e),
            )
        }
    }
}

/// Starts the Prometheus metrics endpoint when a port is configured.
pub async fn setup_prometheus_metrics(metrics_port: Option<u16>) -> Result<()> {
    if let Some(port) = metrics_port {
        let app = Router::new().route("/metrics", get(metrics_handler));
        let listener_addr = format!("0.0.0.0:{}", port);
        info!(
            "Metrics endpoint will be available at http://{}/metrics",
            listener_addr
        );

        tokio::spawn(async move {
            match TcpListener::bind(&listener_addr).await {
                Ok(listener) => {
                    if let Err(e) = serve(listener, app).await {
                        error!("Metrics server error: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to bind metrics server to {}: {}", listener_addr, e);
                }
            }
        });
        Ok(())
    } else {
        info!("Prometheus metrics endpoint not configured (no port specified).");
        Ok(())
    }
}
