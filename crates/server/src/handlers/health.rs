//! Health endpoint.

use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Per-dependency health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub metadata: &'static str,
    pub storage: &'static str,
}

fn label(ok: bool) -> &'static str {
    if ok { "ok" } else { "error" }
}

/// GET {prefix}/health - Check the metadata store and object store.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let metadata_ok = match state.metadata.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Metadata health check failed");
            false
        }
    };
    let storage_ok = match state.storage.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                backend = state.storage.backend_name(),
                error = %e,
                "Storage health check failed"
            );
            false
        }
    };

    let body = HealthResponse {
        metadata: label(metadata_ok),
        storage: label(storage_ok),
    };
    if metadata_ok && storage_ok {
        ApiResponse::ok(body).into_response()
    } else {
        ApiResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, body, "unhealthy")
            .into_response()
    }
}
