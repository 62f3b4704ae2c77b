//! HTTP request handlers.

pub mod agents;
pub mod common;
pub mod deduction;
pub mod env;
pub mod health;
pub mod schemes;

pub use agents::*;
pub use common::*;
pub use deduction::*;
pub use env::*;
pub use health::*;
pub use schemes::*;
