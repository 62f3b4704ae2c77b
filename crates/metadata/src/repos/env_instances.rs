//! Environment instance repository trait.

use crate::error::MetadataResult;
use crate::models::EnvInstanceRow;
use async_trait::async_trait;

/// Repository for environment instances.
#[async_trait]
pub trait EnvInstanceRepo: Send + Sync {
    /// Insert a new instance.
    async fn create_env_instance(&self, instance: &EnvInstanceRow) -> MetadataResult<()>;

    /// Get an instance by ID.
    async fn get_env_instance(&self, id: i64) -> MetadataResult<Option<EnvInstanceRow>>;

    /// Get an instance by name.
    async fn get_env_instance_by_name(&self, name: &str)
    -> MetadataResult<Option<EnvInstanceRow>>;

    /// List all instances.
    async fn list_env_instances(&self) -> MetadataResult<Vec<EnvInstanceRow>>;

    /// List instances created from a template.
    async fn list_env_instances_by_template(
        &self,
        template_id: i64,
    ) -> MetadataResult<Vec<EnvInstanceRow>>;

    /// Replace name, template and params of an existing instance.
    async fn update_env_instance(&self, instance: &EnvInstanceRow) -> MetadataResult<()>;

    /// Delete an instance by ID.
    async fn delete_env_instance(&self, id: i64) -> MetadataResult<()>;

    /// Delete every instance. Returns the number of rows removed.
    async fn delete_all_env_instances(&self) -> MetadataResult<u64>;
}
