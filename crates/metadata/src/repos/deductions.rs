//! Deduction plan, task log and task status repository traits.

use crate::error::MetadataResult;
use crate::models::{DeductionPlanRow, TaskLogRow, TaskStatusRow};
use async_trait::async_trait;

/// Repository for deduction plans.
#[async_trait]
pub trait DeductionPlanRepo: Send + Sync {
    /// Insert a new plan.
    async fn create_deduction_plan(&self, plan: &DeductionPlanRow) -> MetadataResult<()>;

    /// Get a plan by ID.
    async fn get_deduction_plan(&self, id: i64) -> MetadataResult<Option<DeductionPlanRow>>;

    /// Get a plan by name.
    async fn get_deduction_plan_by_name(
        &self,
        name: &str,
    ) -> MetadataResult<Option<DeductionPlanRow>>;

    /// List all plans.
    async fn list_deduction_plans(&self) -> MetadataResult<Vec<DeductionPlanRow>>;

    /// Replace every mutable field of an existing plan.
    async fn update_deduction_plan(&self, plan: &DeductionPlanRow) -> MetadataResult<()>;

    /// Delete a plan by ID.
    async fn delete_deduction_plan(&self, id: i64) -> MetadataResult<()>;
}

/// Repository for task log messages.
#[async_trait]
pub trait TaskLogRepo: Send + Sync {
    /// Append a log message.
    async fn create_task_log(&self, log: &TaskLogRow) -> MetadataResult<()>;

    /// Get a log message by ID.
    async fn get_task_log(&self, id: i64) -> MetadataResult<Option<TaskLogRow>>;

    /// List all log messages.
    async fn list_task_logs(&self) -> MetadataResult<Vec<TaskLogRow>>;

    /// List log messages of one task in creation order.
    async fn list_task_logs_by_task(&self, task_id: i64) -> MetadataResult<Vec<TaskLogRow>>;

    /// Delete a log message by ID.
    async fn delete_task_log(&self, id: i64) -> MetadataResult<()>;
}

/// Repository for task status, one row per task.
#[async_trait]
pub trait TaskStatusRepo: Send + Sync {
    /// Insert the status of a new task. Fails with `AlreadyExists` if the task has one.
    async fn create_task_status(&self, status: &TaskStatusRow) -> MetadataResult<()>;

    /// Get the status of a task.
    async fn get_task_status(&self, task_id: i64) -> MetadataResult<Option<TaskStatusRow>>;

    /// List the status of every task.
    async fn list_task_statuses(&self) -> MetadataResult<Vec<TaskStatusRow>>;

    /// Replace suffix and status of an existing task.
    async fn update_task_status(&self, status: &TaskStatusRow) -> MetadataResult<()>;

    /// Delete the status of a task.
    async fn delete_task_status(&self, task_id: i64) -> MetadataResult<()>;
}
