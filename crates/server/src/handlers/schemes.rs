//! Scheme configuration endpoints.

use super::common::{DeletedResponse, not_found, require_name};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use scheme_core::DEFAULT_SIDE;
use scheme_metadata::models::SchemeRow;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use time::OffsetDateTime;

/// Scheme as returned by the API.
#[derive(Debug, Serialize)]
pub struct SchemeResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub side: String,
    /// Per-agent sub-configurations, in submission order.
    pub agent_schemes: Vec<Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<SchemeRow> for SchemeResponse {
    fn from(row: SchemeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            side: row.side,
            agent_schemes: row.agent_schemes.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create scheme request.
#[derive(Debug, Deserialize)]
pub struct CreateSchemeRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub side: Option<String>,
    pub agent_schemes: Vec<Map<String, Value>>,
}

/// GET {prefix}/scheme/all - List schemes.
pub async fn list_schemes(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<SchemeResponse>>> {
    let schemes = state.metadata.list_schemes().await?;
    Ok(ApiResponse::ok(schemes.into_iter().map(Into::into).collect()))
}

/// GET {prefix}/scheme/{id} - Get a scheme.
pub async fn get_scheme(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<SchemeResponse>> {
    let scheme = state
        .metadata
        .get_scheme(id)
        .await?
        .ok_or_else(|| not_found("scheme", id))?;
    Ok(ApiResponse::ok(scheme.into()))
}

/// GET {prefix}/scheme/by-name/{name} - Get a scheme by name.
pub async fn get_scheme_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<ApiResponse<SchemeResponse>> {
    let scheme = state
        .metadata
        .get_scheme_by_name(&name)
        .await?
        .ok_or_else(|| not_found("scheme", format!("'{name}'")))?;
    Ok(ApiResponse::ok(scheme.into()))
}

/// POST {prefix}/scheme/create - Create a scheme.
pub async fn create_scheme(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateSchemeRequest>,
) -> ApiResult<ApiResponse<SchemeResponse>> {
    require_name("scheme", &body.name)?;

    let now = OffsetDateTime::now_utc();
    let row = SchemeRow {
        id: state.next_id(),
        name: body.name,
        description: body.description,
        side: body.side.unwrap_or_else(|| DEFAULT_SIDE.to_string()),
        agent_schemes: Json(
            body.agent_schemes
                .into_iter()
                .map(Value::Object)
                .collect(),
        ),
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_scheme(&row).await?;

    tracing::info!(scheme_id = row.id, name = %row.name, "Scheme created");
    Ok(ApiResponse::ok(row.into()))
}

/// DELETE {prefix}/scheme/{id} - Delete a scheme.
pub async fn delete_scheme(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    state.metadata.delete_scheme(id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id }, "deleted"))
}
