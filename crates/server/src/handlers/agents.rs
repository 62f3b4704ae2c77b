//! Agent artifact endpoints.

use super::common::{DeletedResponse, not_found};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::response::ApiResponse;
use crate::saga::{self, AgentUpload, UploadRequest};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use scheme_core::ARCHIVE_CONTENT_TYPE;
use scheme_metadata::models::AgentRow;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

/// Multipart field carrying the archive bytes.
pub const FILE_FIELD: &str = "file";
/// Multipart field carrying the JSON-encoded [`AgentUpload`].
pub const METADATA_FIELD: &str = "metadata";

/// Agent record as returned by the API.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub id: i64,
    pub name: String,
    pub load: String,
    pub side: String,
    pub description: String,
    pub param_schema: Value,
    pub supported_env_templates: Vec<i64>,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<AgentRow> for AgentResponse {
    fn from(row: AgentRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            load: row.load,
            side: row.side,
            description: row.description,
            param_schema: row.param_schema.0,
            supported_env_templates: row.supported_env_templates.0,
            url: row.url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadAgentResponse {
    pub agent_id: i64,
    pub agent_name: String,
    pub agent_load: String,
    pub agent_url: String,
}

// =============================================================================
// Queries
// =============================================================================

/// GET {prefix}/agent_meta/all - List every agent.
pub async fn list_agents(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<AgentResponse>>> {
    let agents = state.metadata.list_agents().await?;
    Ok(ApiResponse::ok(
        agents.into_iter().map(AgentResponse::from).collect(),
    ))
}

/// GET {prefix}/agent_meta/{id} - Get an agent by id.
pub async fn get_agent(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<AgentResponse>> {
    let agent = state
        .metadata
        .get_agent(id)
        .await?
        .ok_or_else(|| not_found("agent", id))?;
    Ok(ApiResponse::ok(agent.into()))
}

/// GET {prefix}/agent_meta/by-name/{name} - Get an agent by display name.
pub async fn get_agent_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<ApiResponse<AgentResponse>> {
    let agent = state
        .metadata
        .get_agent_by_name(&name)
        .await?
        .ok_or_else(|| not_found("agent", format!("'{name}'")))?;
    Ok(ApiResponse::ok(agent.into()))
}

/// GET {prefix}/agent_meta/by-load/{load} - Get an agent by load name.
pub async fn get_agent_by_load(
    State(state): State<AppState>,
    ApiPath(load): ApiPath<String>,
) -> ApiResult<ApiResponse<AgentResponse>> {
    let agent = state
        .metadata
        .get_agent_by_load(&load)
        .await?
        .ok_or_else(|| not_found("agent with load", format!("'{load}'")))?;
    Ok(ApiResponse::ok(agent.into()))
}

/// GET {prefix}/agent_meta/{id}/download - Stream the stored archive.
pub async fn download_agent(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Response> {
    let agent = state
        .metadata
        .get_agent(id)
        .await?
        .ok_or_else(|| not_found("agent", id))?;

    let key = state.storage.key_from_location(&agent.url).ok_or_else(|| {
        ApiError::Internal(format!(
            "agent {id} location '{}' is outside bucket '{}'",
            agent.url,
            state.storage.bucket()
        ))
    })?;
    let data = state.storage.get(key).await?;

    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}.zip\"", agent.load))
            .map_err(|e| ApiError::Internal(format!("invalid content disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(ARCHIVE_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(data),
    )
        .into_response())
}

// =============================================================================
// Upload / Delete
// =============================================================================

/// POST {prefix}/agent_meta/upload - Upload an archive and register the agent.
///
/// Expects multipart fields `file` (the `.zip`) and `metadata` (JSON).
pub async fn upload_agent(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<UploadAgentResponse>> {
    let multipart =
        multipart.map_err(|e| ApiError::BadRequest(format!("expected multipart body: {e}")))?;
    let request = read_upload(multipart, state.config.server.max_unpacked_bytes).await?;

    let row = saga::upload(
        state.storage.as_ref(),
        state.metadata.as_ref(),
        &state.ids,
        request,
    )
    .await?;

    Ok(ApiResponse::ok(UploadAgentResponse {
        agent_id: row.id,
        agent_name: row.name,
        agent_load: row.load,
        agent_url: row.url,
    }))
}

/// POST {prefix}/agent_meta/create - Same as upload.
pub async fn create_agent(
    state: State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<UploadAgentResponse>> {
    upload_agent(state, multipart).await
}

/// DELETE {prefix}/agent_meta/{id} - Delete the agent and its archive.
pub async fn delete_agent(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    saga::delete_artifact(state.storage.as_ref(), state.metadata.as_ref(), id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id }, "deleted"))
}

/// Collect the archive and metadata fields from a multipart body.
async fn read_upload(
    mut multipart: Multipart,
    max_unpacked_bytes: u64,
) -> ApiResult<UploadRequest> {
    let mut file: Option<(String, Bytes)> = None;
    let mut metadata: Option<AgentUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart field: {e}")))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match name.as_str() {
            FILE_FIELD => {
                let filename = field.file_name().map(|s| s.to_string()).ok_or_else(|| {
                    ApiError::BadRequest(format!("field '{FILE_FIELD}' has no filename"))
                })?;
                let data = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read field '{FILE_FIELD}': {e}"))
                })?;
                file = Some((filename, data));
            }
            METADATA_FIELD => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read field '{METADATA_FIELD}': {e}"))
                })?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| ApiError::BadRequest(format!("invalid agent metadata: {e}")))?;
                metadata = Some(parsed);
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest(format!("missing field '{FILE_FIELD}'")))?;
    let metadata = metadata
        .ok_or_else(|| ApiError::BadRequest(format!("missing field '{METADATA_FIELD}'")))?;

    Ok(UploadRequest {
        filename,
        data,
        metadata,
        max_unpacked_bytes,
    })
}
