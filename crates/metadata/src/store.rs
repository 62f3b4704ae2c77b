//! Metadata store trait and implementations.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{
    AgentRepo, DeductionPlanRepo, EnvInstanceRepo, EnvTemplateRepo, SchemeRepo, TaskLogRepo,
    TaskStatusRepo,
};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore:
    AgentRepo
    + EnvTemplateRepo
    + EnvInstanceRepo
    + SchemeRepo
    + DeductionPlanRepo
    + TaskLogRepo
    + TaskStatusRepo
    + Send
    + Sync
{
    /// Create the schema if it does not exist.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    ///
    /// `query_timeout_secs` is applied as the busy timeout; SQLite has no
    /// statement cancellation.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                MetadataError::Config(format!(
                    "cannot create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(query_timeout_secs.unwrap_or(5)));

        let pool = SqlitePoolOptions::new()
            // One connection avoids "database is locked" under concurrent writers.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(path = %path.display(), "opened SQLite metadata store");
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn ensure_affected(rows: u64, what: impl FnOnce() -> String) -> MetadataResult<()> {
    if rows == 0 {
        Err(MetadataError::NotFound(what()))
    } else {
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;

    #[async_trait]
    impl AgentRepo for SqliteStore {
        async fn create_agent(&self, agent: &AgentRow) -> MetadataResult<()> {
            if self.get_agent_by_name(&agent.name).await?.is_some() {
                return Err(MetadataError::AlreadyExists(format!(
                    "agent name '{}' already exists",
                    agent.name
                )));
            }

            sqlx::query(
                r#"
                INSERT INTO agents (id, name, load, description, side, param_schema,
                                    supported_env_templates, url, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(agent.id)
            .bind(&agent.name)
            .bind(&agent.load)
            .bind(&agent.description)
            .bind(&agent.side)
            .bind(&agent.param_schema)
            .bind(&agent.supported_env_templates)
            .bind(&agent.url)
            .bind(agent.created_at)
            .bind(agent.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("agent '{}' / load '{}' already exists", agent.name, agent.load)
                })
            })?;
            Ok(())
        }

        async fn get_agent(&self, id: i64) -> MetadataResult<Option<AgentRow>> {
            let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_agent_by_name(&self, name: &str) -> MetadataResult<Option<AgentRow>> {
            let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_agent_by_load(&self, load: &str) -> MetadataResult<Option<AgentRow>> {
            let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE load = ?")
                .bind(load)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_agents(&self) -> MetadataResult<Vec<AgentRow>> {
            let rows = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn delete_agent(&self, id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM agents WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || format!("agent {id} not found"))
        }
    }

    #[async_trait]
    impl EnvTemplateRepo for SqliteStore {
        async fn create_env_template(&self, template: &EnvTemplateRow) -> MetadataResult<()> {
            if self
                .get_env_template_by_name(&template.name)
                .await?
                .is_some()
            {
                return Err(MetadataError::AlreadyExists(format!(
                    "env template name '{}' already exists",
                    template.name
                )));
            }

            sqlx::query(
                "INSERT INTO env_templates (id, name, param_schema, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(template.id)
            .bind(&template.name)
            .bind(&template.param_schema)
            .bind(template.created_at)
            .bind(template.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("env template name '{}' already exists", template.name)
                })
            })?;
            Ok(())
        }

        async fn get_env_template(&self, id: i64) -> MetadataResult<Option<EnvTemplateRow>> {
            let row =
                sqlx::query_as::<_, EnvTemplateRow>("SELECT * FROM env_templates WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn get_env_template_by_name(
            &self,
            name: &str,
        ) -> MetadataResult<Option<EnvTemplateRow>> {
            let row =
                sqlx::query_as::<_, EnvTemplateRow>("SELECT * FROM env_templates WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn list_env_templates(&self) -> MetadataResult<Vec<EnvTemplateRow>> {
            let rows =
                sqlx::query_as::<_, EnvTemplateRow>("SELECT * FROM env_templates ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn delete_env_template(&self, id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM env_templates WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || {
                format!("env template {id} not found")
            })
        }

        async fn delete_all_env_templates(&self) -> MetadataResult<u64> {
            let result = sqlx::query("DELETE FROM env_templates")
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        }
    }

    #[async_trait]
    impl EnvInstanceRepo for SqliteStore {
        async fn create_env_instance(&self, instance: &EnvInstanceRow) -> MetadataResult<()> {
            if self
                .get_env_instance_by_name(&instance.name)
                .await?
                .is_some()
            {
                return Err(MetadataError::AlreadyExists(format!(
                    "env instance name '{}' already exists",
                    instance.name
                )));
            }

            sqlx::query(
                "INSERT INTO env_instances (id, name, template_id, params, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(instance.id)
            .bind(&instance.name)
            .bind(instance.template_id)
            .bind(&instance.params)
            .bind(instance.created_at)
            .bind(instance.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("env instance name '{}' already exists", instance.name)
                })
            })?;
            Ok(())
        }

        async fn get_env_instance(&self, id: i64) -> MetadataResult<Option<EnvInstanceRow>> {
            let row =
                sqlx::query_as::<_, EnvInstanceRow>("SELECT * FROM env_instances WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn get_env_instance_by_name(
            &self,
            name: &str,
        ) -> MetadataResult<Option<EnvInstanceRow>> {
            let row =
                sqlx::query_as::<_, EnvInstanceRow>("SELECT * FROM env_instances WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn list_env_instances(&self) -> MetadataResult<Vec<EnvInstanceRow>> {
            let rows =
                sqlx::query_as::<_, EnvInstanceRow>("SELECT * FROM env_instances ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn list_env_instances_by_template(
            &self,
            template_id: i64,
        ) -> MetadataResult<Vec<EnvInstanceRow>> {
            let rows = sqlx::query_as::<_, EnvInstanceRow>(
                "SELECT * FROM env_instances WHERE template_id = ? ORDER BY id",
            )
            .bind(template_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn update_env_instance(&self, instance: &EnvInstanceRow) -> MetadataResult<()> {
            if let Some(existing) = self.get_env_instance_by_name(&instance.name).await?
                && existing.id != instance.id
            {
                return Err(MetadataError::AlreadyExists(format!(
                    "env instance name '{}' already exists",
                    instance.name
                )));
            }

            let result = sqlx::query(
                "UPDATE env_instances SET name = ?, template_id = ?, params = ?, updated_at = ? WHERE id = ?",
            )
            .bind(&instance.name)
            .bind(instance.template_id)
            .bind(&instance.params)
            .bind(instance.updated_at)
            .bind(instance.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("env instance name '{}' already exists", instance.name)
                })
            })?;
            ensure_affected(result.rows_affected(), || {
                format!("env instance {} not found", instance.id)
            })
        }

        async fn delete_env_instance(&self, id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM env_instances WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || {
                format!("env instance {id} not found")
            })
        }

        async fn delete_all_env_instances(&self) -> MetadataResult<u64> {
            let result = sqlx::query("DELETE FROM env_instances")
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        }
    }

    #[async_trait]
    impl SchemeRepo for SqliteStore {
        async fn create_scheme(&self, scheme: &SchemeRow) -> MetadataResult<()> {
            if self.get_scheme_by_name(&scheme.name).await?.is_some() {
                return Err(MetadataError::AlreadyExists(format!(
                    "scheme name '{}' already exists",
                    scheme.name
                )));
            }

            sqlx::query(
                "INSERT INTO schemes (id, name, description, side, agent_schemes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(scheme.id)
            .bind(&scheme.name)
            .bind(&scheme.description)
            .bind(&scheme.side)
            .bind(&scheme.agent_schemes)
            .bind(scheme.created_at)
            .bind(scheme.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("scheme name '{}' already exists", scheme.name)
                })
            })?;
            Ok(())
        }

        async fn get_scheme(&self, id: i64) -> MetadataResult<Option<SchemeRow>> {
            let row = sqlx::query_as::<_, SchemeRow>("SELECT * FROM schemes WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_scheme_by_name(&self, name: &str) -> MetadataResult<Option<SchemeRow>> {
            let row = sqlx::query_as::<_, SchemeRow>("SELECT * FROM schemes WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_schemes(&self) -> MetadataResult<Vec<SchemeRow>> {
            let rows = sqlx::query_as::<_, SchemeRow>("SELECT * FROM schemes ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn delete_scheme(&self, id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM schemes WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || format!("scheme {id} not found"))
        }
    }

    #[async_trait]
    impl DeductionPlanRepo for SqliteStore {
        async fn create_deduction_plan(&self, plan: &DeductionPlanRow) -> MetadataResult<()> {
            if self.get_deduction_plan_by_name(&plan.name).await?.is_some() {
                return Err(MetadataError::AlreadyExists(format!(
                    "deduction plan name '{}' already exists",
                    plan.name
                )));
            }

            sqlx::query(
                r#"
                INSERT INTO deduction_plans (id, name, description, status, plan_config,
                                             start_time, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(plan.id)
            .bind(&plan.name)
            .bind(&plan.description)
            .bind(&plan.status)
            .bind(&plan.plan_config)
            .bind(plan.start_time)
            .bind(plan.created_at)
            .bind(plan.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("deduction plan name '{}' already exists", plan.name)
                })
            })?;
            Ok(())
        }

        async fn get_deduction_plan(&self, id: i64) -> MetadataResult<Option<DeductionPlanRow>> {
            let row = sqlx::query_as::<_, DeductionPlanRow>(
                "SELECT * FROM deduction_plans WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn get_deduction_plan_by_name(
            &self,
            name: &str,
        ) -> MetadataResult<Option<DeductionPlanRow>> {
            let row = sqlx::query_as::<_, DeductionPlanRow>(
                "SELECT * FROM deduction_plans WHERE name = ?",
            )
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn list_deduction_plans(&self) -> MetadataResult<Vec<DeductionPlanRow>> {
            let rows =
                sqlx::query_as::<_, DeductionPlanRow>("SELECT * FROM deduction_plans ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn update_deduction_plan(&self, plan: &DeductionPlanRow) -> MetadataResult<()> {
            if let Some(existing) = self.get_deduction_plan_by_name(&plan.name).await?
                && existing.id != plan.id
            {
                return Err(MetadataError::AlreadyExists(format!(
                    "deduction plan name '{}' already exists",
                    plan.name
                )));
            }

            let result = sqlx::query(
                r#"
                UPDATE deduction_plans
                SET name = ?, description = ?, status = ?, plan_config = ?, start_time = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(&plan.name)
            .bind(&plan.description)
            .bind(&plan.status)
            .bind(&plan.plan_config)
            .bind(plan.start_time)
            .bind(plan.updated_at)
            .bind(plan.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("deduction plan name '{}' already exists", plan.name)
                })
            })?;
            ensure_affected(result.rows_affected(), || {
                format!("deduction plan {} not found", plan.id)
            })
        }

        async fn delete_deduction_plan(&self, id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM deduction_plans WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || {
                format!("deduction plan {id} not found")
            })
        }
    }

    #[async_trait]
    impl TaskLogRepo for SqliteStore {
        async fn create_task_log(&self, log: &TaskLogRow) -> MetadataResult<()> {
            sqlx::query(
                "INSERT INTO task_logs (id, task_id, suffix, content, kind, level, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(log.id)
            .bind(log.task_id)
            .bind(log.suffix)
            .bind(&log.content)
            .bind(&log.kind)
            .bind(&log.level)
            .bind(log.created_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_task_log(&self, id: i64) -> MetadataResult<Option<TaskLogRow>> {
            let row = sqlx::query_as::<_, TaskLogRow>("SELECT * FROM task_logs WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_task_logs(&self) -> MetadataResult<Vec<TaskLogRow>> {
            let rows = sqlx::query_as::<_, TaskLogRow>("SELECT * FROM task_logs ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn list_task_logs_by_task(&self, task_id: i64) -> MetadataResult<Vec<TaskLogRow>> {
            let rows = sqlx::query_as::<_, TaskLogRow>(
                "SELECT * FROM task_logs WHERE task_id = ? ORDER BY created_at, id",
            )
            .bind(task_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn delete_task_log(&self, id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM task_logs WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || format!("task log {id} not found"))
        }
    }

    #[async_trait]
    impl TaskStatusRepo for SqliteStore {
        async fn create_task_status(&self, status: &TaskStatusRow) -> MetadataResult<()> {
            if self.get_task_status(status.task_id).await?.is_some() {
                return Err(MetadataError::AlreadyExists(format!(
                    "status for task {} already exists",
                    status.task_id
                )));
            }

            sqlx::query(
                "INSERT INTO task_status (task_id, suffix, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(status.task_id)
            .bind(status.suffix)
            .bind(&status.status)
            .bind(status.created_at)
            .bind(status.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                MetadataError::from_write(e, || {
                    format!("status for task {} already exists", status.task_id)
                })
            })?;
            Ok(())
        }

        async fn get_task_status(&self, task_id: i64) -> MetadataResult<Option<TaskStatusRow>> {
            let row =
                sqlx::query_as::<_, TaskStatusRow>("SELECT * FROM task_status WHERE task_id = ?")
                    .bind(task_id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn list_task_statuses(&self) -> MetadataResult<Vec<TaskStatusRow>> {
            let rows =
                sqlx::query_as::<_, TaskStatusRow>("SELECT * FROM task_status ORDER BY task_id")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn update_task_status(&self, status: &TaskStatusRow) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE task_status SET suffix = ?, status = ?, updated_at = ? WHERE task_id = ?",
            )
            .bind(status.suffix)
            .bind(&status.status)
            .bind(status.updated_at)
            .bind(status.task_id)
            .execute(&self.pool)
            .await?;
            ensure_affected(result.rows_affected(), || {
                format!("status for task {} not found", status.task_id)
            })
        }

        async fn delete_task_status(&self, task_id: i64) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM task_status WHERE task_id = ?")
                .bind(task_id)
                .execute(&self.pool)
                .await?;
            ensure_affected(result.rows_affected(), || {
                format!("status for task {task_id} not found")
            })
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Agent artifacts
CREATE TABLE IF NOT EXISTS agents (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    load TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    side TEXT NOT NULL,
    param_schema TEXT NOT NULL,
    supported_env_templates TEXT NOT NULL,
    url TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Environment templates and instances
CREATE TABLE IF NOT EXISTS env_templates (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    param_schema TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS env_instances (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    template_id INTEGER NOT NULL,
    params TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_env_instances_template ON env_instances(template_id);

-- Schemes
CREATE TABLE IF NOT EXISTS schemes (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    side TEXT NOT NULL,
    agent_schemes TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Deductions
CREATE TABLE IF NOT EXISTS deduction_plans (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'inactive',
    plan_config TEXT NOT NULL,
    start_time TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS task_logs (
    id INTEGER PRIMARY KEY,
    task_id INTEGER NOT NULL,
    suffix INTEGER NOT NULL,
    content TEXT NOT NULL CHECK (length(content) <= 512),
    kind TEXT NOT NULL,
    level TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_task_logs_task ON task_logs(task_id, created_at);

CREATE TABLE IF NOT EXISTS task_status (
    task_id INTEGER PRIMARY KEY,
    suffix INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'unknown',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
