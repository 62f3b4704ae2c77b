//! Scheme repository trait.

use crate::error::MetadataResult;
use crate::models::SchemeRow;
use async_trait::async_trait;

/// Repository for scheme configurations.
#[async_trait]
pub trait SchemeRepo: Send + Sync {
    /// Insert a new scheme.
    async fn create_scheme(&self, scheme: &SchemeRow) -> MetadataResult<()>;

    /// Get a scheme by ID.
    async fn get_scheme(&self, id: i64) -> MetadataResult<Option<SchemeRow>>;

    /// Get a scheme by name.
    async fn get_scheme_by_name(&self, name: &str) -> MetadataResult<Option<SchemeRow>>;

    /// List all schemes.
    async fn list_schemes(&self) -> MetadataResult<Vec<SchemeRow>>;

    /// Delete a scheme by ID.
    async fn delete_scheme(&self, id: i64) -> MetadataResult<()>;
}
