use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::data_model::ChangeEvent;
use crate::error::Result;
use crate::handler::AnnotationHandler;

// The application state, shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<AnnotationHandler>,
}

async fn event_handler(
    State(state): State<AppState>,
    Json(event): Json<ChangeEvent>,
) -> impl IntoResponse {
    let event_id = Uuid::new_v4();
    let span = info_span!("change_event", %event_id, path = %event.after.path);

    match state.handler.handle_change(event).instrument(span).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            error!(%event_id, error = %e, "Event handling failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Runs the trigger-delivery HTTP endpoint: one POSTed change event per
/// document write.
pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/events", post(event_handler))
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
