//! Environment template repository trait.

use crate::error::MetadataResult;
use crate::models::EnvTemplateRow;
use async_trait::async_trait;

/// Repository for environment templates.
#[async_trait]
pub trait EnvTemplateRepo: Send + Sync {
    /// Insert a new template.
    async fn create_env_template(&self, template: &EnvTemplateRow) -> MetadataResult<()>;

    /// Get a template by ID.
    async fn get_env_template(&self, id: i64) -> MetadataResult<Option<EnvTemplateRow>>;

    /// Get a template by name.
    async fn get_env_template_by_name(&self, name: &str)
    -> MetadataResult<Option<EnvTemplateRow>>;

    /// List all templates.
    async fn list_env_templates(&self) -> MetadataResult<Vec<EnvTemplateRow>>;

    /// Delete a template by ID. Instances referencing it are left alone.
    async fn delete_env_template(&self, id: i64) -> MetadataResult<()>;

    /// Delete every template. Returns the number of rows removed.
    async fn delete_all_env_templates(&self) -> MetadataResult<u64>;
}
