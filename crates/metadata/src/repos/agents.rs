//! Agent repository trait.

use crate::error::MetadataResult;
use crate::models::AgentRow;
use async_trait::async_trait;

/// Repository for agent artifact records.
#[async_trait]
pub trait AgentRepo: Send + Sync {
    /// Insert a new agent. Fails with `AlreadyExists` on a duplicate name or load.
    async fn create_agent(&self, agent: &AgentRow) -> MetadataResult<()>;

    /// Get an agent by ID.
    async fn get_agent(&self, id: i64) -> MetadataResult<Option<AgentRow>>;

    /// Get an agent by display name.
    async fn get_agent_by_name(&self, name: &str) -> MetadataResult<Option<AgentRow>>;

    /// Get an agent by load name.
    async fn get_agent_by_load(&self, load: &str) -> MetadataResult<Option<AgentRow>>;

    /// List all agents in creation order.
    async fn list_agents(&self) -> MetadataResult<Vec<AgentRow>>;

    /// Delete an agent by ID.
    async fn delete_agent(&self, id: i64) -> MetadataResult<()>;
}
