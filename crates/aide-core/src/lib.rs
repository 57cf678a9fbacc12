//! Foundational logic for the aide agents hub: bounded conversation
//! history, session bookkeeping, request validation, streamed-response
//! aggregation and credential resolution.

pub mod assets;
pub mod credentials;
pub mod error;
pub mod history;
pub mod project;
pub mod provider;
pub mod session;
pub mod streaming;
pub mod validate;

pub use project::{initialize_project, verify_project_initialized};
