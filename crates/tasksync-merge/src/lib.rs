//! tasksync merge engine
//!
//! Applies ordered field-level patches to a task collection.
//!
//! # Core Concepts
//!
//! - [`PatchMerger`]: indexes the collection by id and folds patches over it
//! - [`MergePolicy`]: decides per patch whether it may overwrite the task
//! - [`LastWriteWins`]: unconditional overwrite (default)
//! - [`RejectStale`]: skips patches older than the task's `modifiedAt`
//! - [`PolicyKind`]: configuration-facing policy selector
//!
//! # Example
//!
//! ```rust,ignore
//! use tasksync_merge::{PatchMerger, PolicyKind};
//!
//! let merger = PatchMerger::from_kind(PolicyKind::LastWriteWins);
//! let outcome = merger.merge(state.todo_list, &patches);
//! for rejection in &outcome.report.rejected {
//!     tracing::warn!(%rejection, "patch skipped");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod last_write_wins;
mod merger;
mod policy;
mod registry;
mod reject_stale;

pub use last_write_wins::LastWriteWins;
pub use merger::{MergeOutcome, MergeReport, PatchMerger};
pub use policy::{Admission, MergePolicy};
pub use registry::{PolicyKind, UnknownPolicy};
pub use reject_stale::RejectStale;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
