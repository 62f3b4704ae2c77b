//! Environment template and instance endpoints.

use super::common::{DeletedCountResponse, DeletedResponse, not_found, require_name};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use scheme_metadata::models::{EnvInstanceRow, EnvTemplateRow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use time::OffsetDateTime;

/// Environment template as returned by the API.
#[derive(Debug, Serialize)]
pub struct EnvTemplateResponse {
    pub id: i64,
    pub name: String,
    pub param_schema: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<EnvTemplateRow> for EnvTemplateResponse {
    fn from(row: EnvTemplateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            param_schema: row.param_schema.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create template request.
#[derive(Debug, Deserialize)]
pub struct CreateEnvTemplateRequest {
    pub name: String,
    pub param_schema: Map<String, Value>,
}

/// Environment instance as returned by the API.
#[derive(Debug, Serialize)]
pub struct EnvInstanceResponse {
    pub id: i64,
    pub name: String,
    pub template_id: i64,
    pub params: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<EnvInstanceRow> for EnvInstanceResponse {
    fn from(row: EnvInstanceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            template_id: row.template_id,
            params: row.params.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create instance request.
#[derive(Debug, Deserialize)]
pub struct CreateEnvInstanceRequest {
    pub name: String,
    pub template_id: i64,
    pub params: Map<String, Value>,
}

/// Replace an existing instance.
#[derive(Debug, Deserialize)]
pub struct UpdateEnvInstanceRequest {
    pub id: i64,
    pub name: String,
    pub template_id: i64,
    pub params: Map<String, Value>,
}

async fn require_template(state: &AppState, template_id: i64) -> ApiResult<()> {
    state
        .metadata
        .get_env_template(template_id)
        .await?
        .ok_or_else(|| not_found("env template", template_id))?;
    Ok(())
}

// =============================================================================
// Template Handlers
// =============================================================================

/// GET {prefix}/env/template/all - List templates.
pub async fn list_env_templates(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<EnvTemplateResponse>>> {
    let templates = state.metadata.list_env_templates().await?;
    Ok(ApiResponse::ok(
        templates.into_iter().map(Into::into).collect(),
    ))
}

/// GET {prefix}/env/template/{id} - Get a template.
pub async fn get_env_template(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<EnvTemplateResponse>> {
    let template = state
        .metadata
        .get_env_template(id)
        .await?
        .ok_or_else(|| not_found("env template", id))?;
    Ok(ApiResponse::ok(template.into()))
}

/// GET {prefix}/env/template/by-name/{name} - Get a template by name.
pub async fn get_env_template_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<ApiResponse<EnvTemplateResponse>> {
    let template = state
        .metadata
        .get_env_template_by_name(&name)
        .await?
        .ok_or_else(|| not_found("env template", format!("'{name}'")))?;
    Ok(ApiResponse::ok(template.into()))
}

/// POST {prefix}/env/template/create - Create a template.
pub async fn create_env_template(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEnvTemplateRequest>,
) -> ApiResult<ApiResponse<EnvTemplateResponse>> {
    require_name("env template", &body.name)?;

    let now = OffsetDateTime::now_utc();
    let row = EnvTemplateRow {
        id: state.next_id(),
        name: body.name,
        param_schema: Json(Value::Object(body.param_schema)),
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_env_template(&row).await?;

    tracing::info!(template_id = row.id, name = %row.name, "Env template created");
    Ok(ApiResponse::ok(row.into()))
}

/// DELETE {prefix}/env/template/{id} - Delete a template.
pub async fn delete_env_template(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    state.metadata.delete_env_template(id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id }, "deleted"))
}

/// DELETE {prefix}/env/template/all - Delete every template.
///
/// Instances keep their `template_id`; later updates to them fail until a
/// matching template exists again.
pub async fn delete_all_env_templates(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<DeletedCountResponse>> {
    let deleted = state.metadata.delete_all_env_templates().await?;
    tracing::info!(deleted, "All env templates deleted");
    Ok(ApiResponse::with_msg(
        DeletedCountResponse { deleted },
        "deleted",
    ))
}

// =============================================================================
// Instance Handlers
// =============================================================================

/// GET {prefix}/env/instance/all - List instances.
pub async fn list_env_instances(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<EnvInstanceResponse>>> {
    let instances = state.metadata.list_env_instances().await?;
    Ok(ApiResponse::ok(
        instances.into_iter().map(Into::into).collect(),
    ))
}

/// GET {prefix}/env/instance/{id} - Get an instance.
pub async fn get_env_instance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<EnvInstanceResponse>> {
    let instance = state
        .metadata
        .get_env_instance(id)
        .await?
        .ok_or_else(|| not_found("env instance", id))?;
    Ok(ApiResponse::ok(instance.into()))
}

/// GET {prefix}/env/instance/by-name/{name} - Get an instance by name.
pub async fn get_env_instance_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<ApiResponse<EnvInstanceResponse>> {
    let instance = state
        .metadata
        .get_env_instance_by_name(&name)
        .await?
        .ok_or_else(|| not_found("env instance", format!("'{name}'")))?;
    Ok(ApiResponse::ok(instance.into()))
}

/// GET {prefix}/env/instance/by-template-id/{template_id} - Instances of a template.
pub async fn list_env_instances_by_template(
    State(state): State<AppState>,
    ApiPath(template_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Vec<EnvInstanceResponse>>> {
    let instances = state
        .metadata
        .list_env_instances_by_template(template_id)
        .await?;
    Ok(ApiResponse::ok(
        instances.into_iter().map(Into::into).collect(),
    ))
}

/// POST {prefix}/env/instance/create - Create an instance of an existing template.
pub async fn create_env_instance(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateEnvInstanceRequest>,
) -> ApiResult<ApiResponse<EnvInstanceResponse>> {
    require_name("env instance", &body.name)?;
    require_template(&state, body.template_id).await?;

    let now = OffsetDateTime::now_utc();
    let row = EnvInstanceRow {
        id: state.next_id(),
        name: body.name,
        template_id: body.template_id,
        params: Json(Value::Object(body.params)),
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_env_instance(&row).await?;

    tracing::info!(
        instance_id = row.id,
        template_id = row.template_id,
        name = %row.name,
        "Env instance created"
    );
    Ok(ApiResponse::ok(row.into()))
}

/// POST {prefix}/env/instance/update - Replace an instance.
pub async fn update_env_instance(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateEnvInstanceRequest>,
) -> ApiResult<ApiResponse<EnvInstanceResponse>> {
    require_name("env instance", &body.name)?;

    let existing = state
        .metadata
        .get_env_instance(body.id)
        .await?
        .ok_or_else(|| not_found("env instance", body.id))?;
    require_template(&state, body.template_id).await?;

    let row = EnvInstanceRow {
        id: existing.id,
        name: body.name,
        template_id: body.template_id,
        params: Json(Value::Object(body.params)),
        created_at: existing.created_at,
        updated_at: OffsetDateTime::now_utc(),
    };
    state.metadata.update_env_instance(&row).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// DELETE {prefix}/env/instance/{id} - Delete an instance.
pub async fn delete_env_instance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    state.metadata.delete_env_instance(id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id }, "deleted"))
}

/// DELETE {prefix}/env/instance/all - Delete every instance.
pub async fn delete_all_env_instances(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<DeletedCountResponse>> {
    let deleted = state.metadata.delete_all_env_instances().await?;
    tracing::info!(deleted, "All env instances deleted");
    Ok(ApiResponse::with_msg(
        DeletedCountResponse { deleted },
        "deleted",
    ))
}
