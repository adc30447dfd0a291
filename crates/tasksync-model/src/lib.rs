//! tasksync data model
//!
//! Shapes shared by the server store, the merge engine and the client cache.
//!
//! # Core Concepts
//!
//! - [`Project`] / [`Task`]: the two entity kinds, serialized as camelCase JSON
//! - [`StoreState`]: the whole-state document exchanged by `/db`
//! - [`Patch`]: a single field-level edit addressed to one task
//! - [`FixtureGenerator`]: deterministic seed data for an empty store
//! - [`PatchRejection`]: a patch skipped by the merge, reported back to the client
//! - [`api`]: bodies of the HTTP endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use tasksync_model::{FieldChange, Patch, TaskId, Timestamp};
//!
//! let patch = Patch::new(TaskId::from("t1"), FieldChange::IsDone(true), Timestamp::from_millis(200));
//! let json = serde_json::to_string(&patch)?;
//! // {"todoId":"t1","key":"isDone","value":true,"modifiedAt":200}
//! ```

#![warn(unreachable_pub)]

pub mod api;
mod error;
mod fixtures;
mod ids;
mod patch;
mod project;
mod rejection;
mod sort;
mod state;
mod task;
mod timestamp;

pub use error::ValidationError;
pub use fixtures::FixtureGenerator;
pub use ids::{ProjectId, TaskId};
pub use patch::{FieldChange, Patch, PatchKey};
pub use project::Project;
pub use rejection::{PatchRejection, RejectReason};
pub use sort::{sort_projects, sort_tasks, tasks_in_project};
pub use state::StoreState;
pub use task::Task;
pub use timestamp::Timestamp;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
