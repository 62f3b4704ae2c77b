//! Deduction plan, task log and task status endpoints.

use super::common::{DeletedResponse, not_found, require_name};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use scheme_core::{DeductionStatus, MAX_TASK_LOG_CONTENT, TaskLogKind, TaskLogLevel, TaskState};
use scheme_metadata::models::{DeductionPlanRow, TaskLogRow, TaskStatusRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use time::OffsetDateTime;

// =============================================================================
// Plans
// =============================================================================

/// Deduction plan as returned by the API.
#[derive(Debug, Serialize)]
pub struct DeductionPlanResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub plan_config: Value,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<DeductionPlanRow> for DeductionPlanResponse {
    fn from(row: DeductionPlanRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            status: row.status,
            plan_config: row.plan_config.0,
            start_time: row.start_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create plan request. New plans start `inactive` unless told otherwise.
#[derive(Debug, Deserialize)]
pub struct CreateDeductionPlanRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DeductionStatus,
    #[serde(default)]
    pub plan_config: Value,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
}

/// Replace an existing plan. An omitted status keeps the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateDeductionPlanRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<DeductionStatus>,
    #[serde(default)]
    pub plan_config: Value,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
}

/// GET {prefix}/deduction/plan/all - List plans.
pub async fn list_deduction_plans(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<DeductionPlanResponse>>> {
    let plans = state.metadata.list_deduction_plans().await?;
    Ok(ApiResponse::ok(plans.into_iter().map(Into::into).collect()))
}

/// GET {prefix}/deduction/plan/{id} - Get a plan.
pub async fn get_deduction_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeductionPlanResponse>> {
    let plan = state
        .metadata
        .get_deduction_plan(id)
        .await?
        .ok_or_else(|| not_found("deduction plan", id))?;
    Ok(ApiResponse::ok(plan.into()))
}

/// GET {prefix}/deduction/plan/by-name/{name} - Get a plan by name.
pub async fn get_deduction_plan_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<ApiResponse<DeductionPlanResponse>> {
    let plan = state
        .metadata
        .get_deduction_plan_by_name(&name)
        .await?
        .ok_or_else(|| not_found("deduction plan", format!("'{name}'")))?;
    Ok(ApiResponse::ok(plan.into()))
}

/// POST {prefix}/deduction/plan/create - Create a plan.
pub async fn create_deduction_plan(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateDeductionPlanRequest>,
) -> ApiResult<ApiResponse<DeductionPlanResponse>> {
    require_name("deduction plan", &body.name)?;

    let now = OffsetDateTime::now_utc();
    let row = DeductionPlanRow {
        id: state.next_id(),
        name: body.name,
        description: body.description,
        status: body.status.as_str().to_string(),
        plan_config: Json(body.plan_config),
        start_time: body.start_time,
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_deduction_plan(&row).await?;

    tracing::info!(
        plan_id = row.id,
        name = %row.name,
        status = %row.status,
        "Deduction plan created"
    );
    Ok(ApiResponse::ok(row.into()))
}

/// POST {prefix}/deduction/plan/update - Replace a plan.
pub async fn update_deduction_plan(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateDeductionPlanRequest>,
) -> ApiResult<ApiResponse<DeductionPlanResponse>> {
    require_name("deduction plan", &body.name)?;

    let existing = state
        .metadata
        .get_deduction_plan(body.id)
        .await?
        .ok_or_else(|| not_found("deduction plan", body.id))?;

    let row = DeductionPlanRow {
        id: existing.id,
        name: body.name,
        description: body.description,
        status: body
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status),
        plan_config: Json(body.plan_config),
        start_time: body.start_time,
        created_at: existing.created_at,
        updated_at: OffsetDateTime::now_utc(),
    };
    state.metadata.update_deduction_plan(&row).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// DELETE {prefix}/deduction/plan/{id} - Delete a plan.
pub async fn delete_deduction_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    state.metadata.delete_deduction_plan(id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id }, "deleted"))
}

// =============================================================================
// Task Logs
// =============================================================================

/// Task log entry as returned by the API.
#[derive(Debug, Serialize)]
pub struct TaskLogResponse {
    pub id: i64,
    pub task_id: i64,
    pub suffix: i64,
    pub content: String,
    pub kind: String,
    pub level: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<TaskLogRow> for TaskLogResponse {
    fn from(row: TaskLogRow) -> Self {
        Self {
            id: row.id,
            task_id: row.task_id,
            suffix: row.suffix,
            content: row.content,
            kind: row.kind,
            level: row.level,
            created_at: row.created_at,
        }
    }
}

fn default_log_kind() -> TaskLogKind {
    TaskLogKind::Log
}

fn default_log_level() -> TaskLogLevel {
    TaskLogLevel::Info
}

/// Create task log request.
#[derive(Debug, Deserialize)]
pub struct CreateTaskLogRequest {
    pub task_id: i64,
    #[serde(default)]
    pub suffix: i64,
    pub content: String,
    #[serde(default = "default_log_kind")]
    pub kind: TaskLogKind,
    #[serde(default = "default_log_level")]
    pub level: TaskLogLevel,
}

/// GET {prefix}/deduction/task-log/all - List every log entry.
pub async fn list_task_logs(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<TaskLogResponse>>> {
    let logs = state.metadata.list_task_logs().await?;
    Ok(ApiResponse::ok(logs.into_iter().map(Into::into).collect()))
}

/// GET {prefix}/deduction/task-log/{id} - Get a log entry.
pub async fn get_task_log(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<TaskLogResponse>> {
    let log = state
        .metadata
        .get_task_log(id)
        .await?
        .ok_or_else(|| not_found("task log", id))?;
    Ok(ApiResponse::ok(log.into()))
}

/// GET {prefix}/deduction/task-log/by-task-id/{task_id} - Logs of one task, oldest first.
pub async fn list_task_logs_by_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Vec<TaskLogResponse>>> {
    let logs = state.metadata.list_task_logs_by_task(task_id).await?;
    Ok(ApiResponse::ok(logs.into_iter().map(Into::into).collect()))
}

/// POST {prefix}/deduction/task-log/create - Append a log entry.
pub async fn create_task_log(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateTaskLogRequest>,
) -> ApiResult<ApiResponse<TaskLogResponse>> {
    let length = body.content.chars().count();
    if length > MAX_TASK_LOG_CONTENT {
        return Err(ApiError::BadRequest(format!(
            "task log content is {length} characters, limit is {MAX_TASK_LOG_CONTENT}"
        )));
    }

    let row = TaskLogRow {
        id: state.next_id(),
        task_id: body.task_id,
        suffix: body.suffix,
        content: body.content,
        kind: body.kind.as_str().to_string(),
        level: body.level.as_str().to_string(),
        created_at: OffsetDateTime::now_utc(),
    };
    state.metadata.create_task_log(&row).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// DELETE {prefix}/deduction/task-log/{id} - Delete a log entry.
pub async fn delete_task_log(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    state.metadata.delete_task_log(id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id }, "deleted"))
}

// =============================================================================
// Task Status
// =============================================================================

/// Task status as returned by the API.
#[derive(Debug, Serialize)]
pub struct TaskStatusResponse {
    pub task_id: i64,
    pub suffix: i64,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<TaskStatusRow> for TaskStatusResponse {
    fn from(row: TaskStatusRow) -> Self {
        Self {
            task_id: row.task_id,
            suffix: row.suffix,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create or replace a task status.
#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub task_id: i64,
    #[serde(default)]
    pub suffix: i64,
    #[serde(default)]
    pub status: TaskState,
}

/// GET {prefix}/deduction/task-status/all - List task statuses.
pub async fn list_task_statuses(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<TaskStatusResponse>>> {
    let statuses = state.metadata.list_task_statuses().await?;
    Ok(ApiResponse::ok(
        statuses.into_iter().map(Into::into).collect(),
    ))
}

/// GET {prefix}/deduction/task-status/{task_id} - Get a task's status.
pub async fn get_task_status(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<TaskStatusResponse>> {
    let status = state
        .metadata
        .get_task_status(task_id)
        .await?
        .ok_or_else(|| not_found("status for task", task_id))?;
    Ok(ApiResponse::ok(status.into()))
}

/// POST {prefix}/deduction/task-status/create - Register a task's status.
pub async fn create_task_status(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TaskStatusRequest>,
) -> ApiResult<ApiResponse<TaskStatusResponse>> {
    let now = OffsetDateTime::now_utc();
    let row = TaskStatusRow {
        task_id: body.task_id,
        suffix: body.suffix,
        status: body.status.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_task_status(&row).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// POST {prefix}/deduction/task-status/update - Replace a task's suffix and status.
pub async fn update_task_status(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TaskStatusRequest>,
) -> ApiResult<ApiResponse<TaskStatusResponse>> {
    let existing = state
        .metadata
        .get_task_status(body.task_id)
        .await?
        .ok_or_else(|| not_found("status for task", body.task_id))?;

    let row = TaskStatusRow {
        task_id: existing.task_id,
        suffix: body.suffix,
        status: body.status.as_str().to_string(),
        created_at: existing.created_at,
        updated_at: OffsetDateTime::now_utc(),
    };
    state.metadata.update_task_status(&row).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// DELETE {prefix}/deduction/task-status/{task_id} - Delete a task's status.
pub async fn delete_task_status(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<DeletedResponse>> {
    state.metadata.delete_task_status(task_id).await?;
    Ok(ApiResponse::with_msg(DeletedResponse { id: task_id }, "deleted"))
}
