//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Object store abstraction for agent archives.
///
/// Every backend serves exactly one bucket. Keys are logical names inside
/// that bucket; a *location* is the `"{bucket}/{key}"` string recorded in
/// metadata rows.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get an object's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object atomically, replacing any previous content.
    ///
    /// Returns the location of the stored object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<String>;

    /// Delete an object.
    ///
    /// Returns [`StorageError::NotFound`](crate::StorageError::NotFound) when
    /// the key does not exist.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List object keys with a prefix.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Get the name of this storage backend.
    ///
    /// Returns a static string identifier for the backend type (e.g., "s3", "filesystem").
    fn backend_name(&self) -> &'static str;

    /// Bucket this store writes into.
    fn bucket(&self) -> &str;

    /// Location string for a key in this store's bucket.
    fn location(&self, key: &str) -> String {
        format!("{}/{}", self.bucket(), key)
    }

    /// Recover the key from a location produced by [`ObjectStore::location`].
    ///
    /// Returns `None` when the location belongs to another bucket.
    fn key_from_location<'a>(&self, location: &'a str) -> Option<&'a str> {
        location
            .strip_prefix(self.bucket())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
    }

    /// Verify storage backend connectivity.
    ///
    /// Called during server startup and by the health endpoint.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
