//! PostgreSQL-based metadata store implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::*;
use crate::repos::{
    AgentRepo, DeductionPlanRepo, EnvInstanceRepo, EnvTemplateRepo, SchemeRepo, TaskLogRepo,
    TaskStatusRepo,
};
use crate::store::MetadataStore;
use async_trait::async_trait;
use scheme_core::config::PgSslMode;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .map(str::trim)
        .filter(|statement| {
            statement
                .lines()
                .map(str::trim)
                .any(|line| !line.is_empty() && !line.starts_with("--"))
        })
        .collect()
}

fn not_found_unless_affected(rows: u64, what: impl FnOnce() -> String) -> MetadataResult<()> {
    if rows == 0 {
        Err(MetadataError::NotFound(what()))
    } else {
        Ok(())
    }
}

/// PostgreSQL-based metadata store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Create a new PostgreSQL store from individual connection parameters.
    ///
    /// Lets the password come from the environment instead of a URL in the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }
        if let Some(pass) = password {
            opts = opts.password(pass);
        }
        if let Some(mode) = ssl_mode {
            opts = opts.ssl_mode(match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            });
        }

        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{timeout_ms}ms"))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        // Prepared statements take one command each.
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AgentRepo for PostgresStore {
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
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
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
        let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_agent_by_name(&self, name: &str) -> MetadataResult<Option<AgentRow>> {
        let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_agent_by_load(&self, load: &str) -> MetadataResult<Option<AgentRow>> {
        let row = sqlx::query_as::<_, AgentRow>("SELECT * FROM agents WHERE load = $1")
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
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || format!("agent {id} not found"))
    }
}

#[async_trait]
impl EnvTemplateRepo for PostgresStore {
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
            "INSERT INTO env_templates (id, name, param_schema, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
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
        let row = sqlx::query_as::<_, EnvTemplateRow>("SELECT * FROM env_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_env_template_by_name(&self, name: &str) -> MetadataResult<Option<EnvTemplateRow>> {
        let row =
            sqlx::query_as::<_, EnvTemplateRow>("SELECT * FROM env_templates WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn list_env_templates(&self) -> MetadataResult<Vec<EnvTemplateRow>> {
        let rows = sqlx::query_as::<_, EnvTemplateRow>("SELECT * FROM env_templates ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_env_template(&self, id: i64) -> MetadataResult<()> {
        let result = sqlx::query("DELETE FROM env_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || {
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
impl EnvInstanceRepo for PostgresStore {
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
            "INSERT INTO env_instances (id, name, template_id, params, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
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
        let row = sqlx::query_as::<_, EnvInstanceRow>("SELECT * FROM env_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_env_instance_by_name(&self, name: &str) -> MetadataResult<Option<EnvInstanceRow>> {
        let row =
            sqlx::query_as::<_, EnvInstanceRow>("SELECT * FROM env_instances WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn list_env_instances(&self) -> MetadataResult<Vec<EnvInstanceRow>> {
        let rows = sqlx::query_as::<_, EnvInstanceRow>("SELECT * FROM env_instances ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_env_instances_by_template(
        &self,
        template_id: i64,
    ) -> MetadataResult<Vec<EnvInstanceRow>> {
        let rows = sqlx::query_as::<_, EnvInstanceRow>(
            "SELECT * FROM env_instances WHERE template_id = $1 ORDER BY id",
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
            "UPDATE env_instances SET name = $1, template_id = $2, params = $3, updated_at = $4 WHERE id = $5",
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
        not_found_unless_affected(result.rows_affected(), || {
            format!("env instance {} not found", instance.id)
        })
    }

    async fn delete_env_instance(&self, id: i64) -> MetadataResult<()> {
        let result = sqlx::query("DELETE FROM env_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || {
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
impl SchemeRepo for PostgresStore {
    async fn create_scheme(&self, scheme: &SchemeRow) -> MetadataResult<()> {
        if self.get_scheme_by_name(&scheme.name).await?.is_some() {
            return Err(MetadataError::AlreadyExists(format!(
                "scheme name '{}' already exists",
                scheme.name
            )));
        }

        sqlx::query(
            "INSERT INTO schemes (id, name, description, side, agent_schemes, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
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
            MetadataError::from_write(e, || format!("scheme name '{}' already exists", scheme.name))
        })?;
        Ok(())
    }

    async fn get_scheme(&self, id: i64) -> MetadataResult<Option<SchemeRow>> {
        let row = sqlx::query_as::<_, SchemeRow>("SELECT * FROM schemes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_scheme_by_name(&self, name: &str) -> MetadataResult<Option<SchemeRow>> {
        let row = sqlx::query_as::<_, SchemeRow>("SELECT * FROM schemes WHERE name = $1")
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
        let result = sqlx::query("DELETE FROM schemes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || format!("scheme {id} not found"))
    }
}

#[async_trait]
impl DeductionPlanRepo for PostgresStore {
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
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
        let row =
            sqlx::query_as::<_, DeductionPlanRow>("SELECT * FROM deduction_plans WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn get_deduction_plan_by_name(
        &self,
        name: &str,
    ) -> MetadataResult<Option<DeductionPlanRow>> {
        let row =
            sqlx::query_as::<_, DeductionPlanRow>("SELECT * FROM deduction_plans WHERE name = $1")
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
            SET name = $1, description = $2, status = $3, plan_config = $4, start_time = $5, updated_at = $6
            WHERE id = $7
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
        not_found_unless_affected(result.rows_affected(), || {
            format!("deduction plan {} not found", plan.id)
        })
    }

    async fn delete_deduction_plan(&self, id: i64) -> MetadataResult<()> {
        let result = sqlx::query("DELETE FROM deduction_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || {
            format!("deduction plan {id} not found")
        })
    }
}

#[async_trait]
impl TaskLogRepo for PostgresStore {
    async fn create_task_log(&self, log: &TaskLogRow) -> MetadataResult<()> {
        sqlx::query(
            "INSERT INTO task_logs (id, task_id, suffix, content, kind, level, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
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
        let row = sqlx::query_as::<_, TaskLogRow>("SELECT * FROM task_logs WHERE id = $1")
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
            "SELECT * FROM task_logs WHERE task_id = $1 ORDER BY created_at, id",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_task_log(&self, id: i64) -> MetadataResult<()> {
        let result = sqlx::query("DELETE FROM task_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || format!("task log {id} not found"))
    }
}

#[async_trait]
impl TaskStatusRepo for PostgresStore {
    async fn create_task_status(&self, status: &TaskStatusRow) -> MetadataResult<()> {
        sqlx::query(
            "INSERT INTO task_status (task_id, suffix, status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
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
            sqlx::query_as::<_, TaskStatusRow>("SELECT * FROM task_status WHERE task_id = $1")
                .bind(task_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn list_task_statuses(&self) -> MetadataResult<Vec<TaskStatusRow>> {
        let rows = sqlx::query_as::<_, TaskStatusRow>("SELECT * FROM task_status ORDER BY task_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_task_status(&self, status: &TaskStatusRow) -> MetadataResult<()> {
        let result = sqlx::query(
            "UPDATE task_status SET suffix = $1, status = $2, updated_at = $3 WHERE task_id = $4",
        )
        .bind(status.suffix)
        .bind(&status.status)
        .bind(status.updated_at)
        .bind(status.task_id)
        .execute(&self.pool)
        .await?;
        not_found_unless_affected(result.rows_affected(), || {
            format!("status for task {} not found", status.task_id)
        })
    }

    async fn delete_task_status(&self, task_id: i64) -> MetadataResult<()> {
        let result = sqlx::query("DELETE FROM task_status WHERE task_id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        not_found_unless_affected(result.rows_affected(), || {
            format!("status for task {task_id} not found")
        })
    }
}
