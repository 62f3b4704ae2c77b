//! Agent archive upload and removal.
//!
//! An upload writes the archive to the object store first and the agent row
//! second. The two writes are not transactional: if the row insert fails the
//! blob is deleted again on a best-effort basis and the insert error is
//! returned. Removal runs the other way round: row first, then blob.

use bytes::Bytes;
use scheme_core::archive::{self, ARCHIVE_CONTENT_TYPE};
use scheme_core::{DEFAULT_SIDE, IdGenerator};
use scheme_metadata::MetadataError;
use scheme_metadata::models::AgentRow;
use scheme_metadata::repos::AgentRepo;
use scheme_storage::{ObjectStore, StorageError};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::types::Json;
use time::OffsetDateTime;

/// Upload failures, in the order they can occur.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Declared filename or metadata is unusable. Nothing was written.
    #[error("{0}")]
    Format(String),

    /// Archive failed the integrity test. Nothing was written.
    #[error("{0}")]
    CorruptArchive(String),

    /// The archive check could not run to completion. Nothing was written.
    #[error("internal error: {0}")]
    Internal(String),

    /// Object store write failed. Nothing was written.
    #[error("object store error: {0}")]
    ObjectStore(#[from] StorageError),

    /// Row insert failed after the blob write; the blob was compensated.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl From<scheme_core::Error> for UploadError {
    fn from(err: scheme_core::Error) -> Self {
        match err {
            scheme_core::Error::CorruptArchive(msg) => Self::CorruptArchive(msg),
            other => Self::Format(other.to_string()),
        }
    }
}

/// Caller-supplied agent fields sent alongside the archive.
#[derive(Clone, Debug, Deserialize)]
pub struct AgentUpload {
    pub name: String,
    pub load: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    pub param_schema: Map<String, Value>,
    #[serde(default)]
    pub supported_env_templates: Vec<i64>,
    /// Member that must exist inside the archive.
    #[serde(default)]
    pub agent_file: Option<String>,
}

impl AgentUpload {
    fn validate(&self) -> Result<(), UploadError> {
        if self.name.trim().is_empty() {
            return Err(UploadError::Format("agent name must not be empty".into()));
        }
        if self.load.trim().is_empty() {
            return Err(UploadError::Format("agent load must not be empty".into()));
        }
        if self.load.contains(['/', '\\']) || self.load.contains("..") {
            return Err(UploadError::Format(format!(
                "agent load '{}' must not contain path separators",
                self.load
            )));
        }
        Ok(())
    }
}

/// One archive upload.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Filename declared by the client.
    pub filename: String,
    pub data: Bytes,
    pub metadata: AgentUpload,
    /// Cap on the total uncompressed size of the archive members.
    pub max_unpacked_bytes: u64,
}

/// Progress of an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SagaState {
    NotStarted,
    /// Blob stored under `key`, row not yet written.
    BlobWritten { key: String },
    MetadataWritten,
}

/// Tracks the object store side effect so it can be undone.
struct UploadSaga<'a> {
    store: &'a dyn ObjectStore,
    state: SagaState,
}

impl<'a> UploadSaga<'a> {
    fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            state: SagaState::NotStarted,
        }
    }

    async fn write_blob(&mut self, key: &str, data: Bytes) -> Result<String, UploadError> {
        let location = self.store.put(key, data, ARCHIVE_CONTENT_TYPE).await?;
        self.state = SagaState::BlobWritten {
            key: key.to_string(),
        };
        Ok(location)
    }

    fn commit(&mut self) {
        self.state = SagaState::MetadataWritten;
    }

    /// Undo the blob write. Only acts from `BlobWritten`; failures are logged.
    async fn compensate(&mut self) {
        let SagaState::BlobWritten { key } = &self.state else {
            return;
        };
        match self.store.delete(key).await {
            Ok(()) => tracing::info!(key = %key, "Removed blob after failed metadata write"),
            Err(e) => tracing::error!(
                key = %key,
                error = %e,
                "Failed to remove blob after failed metadata write; blob is orphaned"
            ),
        }
        self.state = SagaState::NotStarted;
    }
}

/// Validate, store and register an agent archive.
///
/// Validation failures return before any write. Exactly one object store
/// write and at most one row insert happen per call.
pub async fn upload<R>(
    store: &dyn ObjectStore,
    repo: &R,
    ids: &IdGenerator,
    request: UploadRequest,
) -> Result<AgentRow, UploadError>
where
    R: AgentRepo + ?Sized,
{
    let UploadRequest {
        filename,
        data,
        metadata,
        max_unpacked_bytes,
    } = request;

    archive::check_extension(&filename)?;
    metadata.validate()?;

    let archive_data = data.clone();
    let agent_file = metadata.agent_file.clone();
    let summary = tokio::task::spawn_blocking(move || {
        archive::verify_archive(&archive_data, agent_file.as_deref(), max_unpacked_bytes)
    })
    .await
    .map_err(|e| UploadError::Internal(format!("archive check task failed: {e}")))??;
    tracing::debug!(filename = %filename, members = summary.members.len(), "Archive verified");

    let id = ids.generate();
    let load = format!("{id}_{}", metadata.load);
    let key = format!("{load}{}", archive::ARCHIVE_EXTENSION);

    let mut saga = UploadSaga::new(store);
    let location = saga.write_blob(&key, data).await?;

    let now = OffsetDateTime::now_utc();
    let row = AgentRow {
        id,
        name: metadata.name,
        load,
        description: metadata.description.unwrap_or_default(),
        side: metadata.side.unwrap_or_else(|| DEFAULT_SIDE.to_string()),
        param_schema: Json(Value::Object(metadata.param_schema)),
        supported_env_templates: Json(metadata.supported_env_templates),
        url: location,
        created_at: now,
        updated_at: now,
    };

    match repo.create_agent(&row).await {
        Ok(()) => {
            saga.commit();
            tracing::info!(agent_id = id, load = %row.load, url = %row.url, "Agent uploaded");
            Ok(row)
        }
        Err(e) => {
            tracing::warn!(agent_id = id, error = %e, "Agent insert failed, compensating");
            saga.compensate().await;
            Err(UploadError::Metadata(e))
        }
    }
}

/// Delete an agent row, then its archive.
///
/// A failed blob delete after the row is gone is logged and tolerated.
pub async fn delete_artifact<R>(
    store: &dyn ObjectStore,
    repo: &R,
    id: i64,
) -> Result<AgentRow, MetadataError>
where
    R: AgentRepo + ?Sized,
{
    let agent = repo
        .get_agent(id)
        .await?
        .ok_or_else(|| MetadataError::NotFound(format!("agent {id} not found")))?;

    repo.delete_agent(id).await?;

    match store.key_from_location(&agent.url) {
        Some(key) => match store.delete(key).await {
            Ok(()) => tracing::info!(agent_id = id, key = %key, "Agent archive deleted"),
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(agent_id = id, key = %key, "Agent archive already missing")
            }
            Err(e) => tracing::error!(
                agent_id = id,
                key = %key,
                error = %e,
                "Failed to delete agent archive; blob is orphaned"
            ),
        },
        None => tracing::warn!(
            agent_id = id,
            url = %agent.url,
            "Agent location is outside this bucket, archive left in place"
        ),
    }

    Ok(agent)
}
