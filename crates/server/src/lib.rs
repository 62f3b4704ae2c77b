//! HTTP API server for the scheme backend.
//!
//! This crate provides the HTTP surface:
//! - Agent archive upload, download and removal
//! - Environment template and instance CRUD
//! - Scheme configuration CRUD
//! - Deduction plans, task logs and task status

pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod saga;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use response::{ApiResponse, Envelope};
pub use routes::create_router;
pub use state::AppState;
