//! Repository traits for metadata operations.

pub mod agents;
pub mod deductions;
pub mod env_instances;
pub mod env_templates;
pub mod schemes;

pub use agents::AgentRepo;
pub use deductions::{DeductionPlanRepo, TaskLogRepo, TaskStatusRepo};
pub use env_instances::EnvInstanceRepo;
pub use env_templates::EnvTemplateRepo;
pub use schemes::SchemeRepo;
