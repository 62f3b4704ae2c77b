//! Database models mapping to the metadata schema.
//!
//! Every primary key is an application-generated snowflake id. JSON documents
//! are opaque to the store and kept as `sqlx::types::Json`.

use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use time::OffsetDateTime;

// =============================================================================
// Agents
// =============================================================================

/// Agent artifact record. `url` is the object store location of the archive.
#[derive(Debug, Clone, FromRow)]
pub struct AgentRow {
    pub id: i64,
    pub name: String,
    /// Load name, `{id}_{load}`; the archive key is this plus `.zip`.
    pub load: String,
    pub description: String,
    pub side: String,
    pub param_schema: Json<Value>,
    pub supported_env_templates: Json<Vec<i64>>,
    pub url: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Environments
// =============================================================================

/// Environment template record.
#[derive(Debug, Clone, FromRow)]
pub struct EnvTemplateRow {
    pub id: i64,
    pub name: String,
    pub param_schema: Json<Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Environment instance record. `template_id` is checked by callers, not by
/// a foreign key.
#[derive(Debug, Clone, FromRow)]
pub struct EnvInstanceRow {
    pub id: i64,
    pub name: String,
    pub template_id: i64,
    pub params: Json<Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Schemes
// =============================================================================

/// Scheme configuration record.
#[derive(Debug, Clone, FromRow)]
pub struct SchemeRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub side: String,
    /// Ordered per-agent sub-configurations.
    pub agent_schemes: Json<Vec<Value>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Deductions
// =============================================================================

/// Deduction plan record. `status` holds a lowercase `DeductionStatus`.
#[derive(Debug, Clone, FromRow)]
pub struct DeductionPlanRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub plan_config: Json<Value>,
    pub start_time: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Task log message.
#[derive(Debug, Clone, FromRow)]
pub struct TaskLogRow {
    pub id: i64,
    pub task_id: i64,
    pub suffix: i64,
    pub content: String,
    pub kind: String,
    pub level: String,
    pub created_at: OffsetDateTime,
}

/// Latest status of a running task, keyed by task id.
#[derive(Debug, Clone, FromRow)]
pub struct TaskStatusRow {
    pub task_id: i64,
    pub suffix: i64,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
