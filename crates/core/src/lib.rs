//! Core domain types and shared logic for the scheme backend.
//!
//! This crate defines what every other crate agrees on:
//! - Application configuration
//! - Time-ordered id generation
//! - Deduction status and task log tags
//! - Agent archive validation

pub mod archive;
pub mod config;
pub mod error;
pub mod id;
pub mod status;

pub use archive::{
    ARCHIVE_CONTENT_TYPE, ARCHIVE_EXTENSION, ArchiveSummary, DEFAULT_MAX_UNPACKED_BYTES,
};
pub use error::{Error, Result};
pub use id::IdGenerator;
pub use status::{DeductionStatus, TaskLogKind, TaskLogLevel, TaskState};

/// Default side tag for agents uploaded without one.
pub const DEFAULT_SIDE: &str = "unknown";

/// Maximum length of a task log message.
pub const MAX_TASK_LOG_CONTENT: usize = 512;
