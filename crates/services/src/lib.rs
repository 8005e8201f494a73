//! Narrow seams over the long-lived collaborators the gateway fronts:
//! database connection, cache connection, execution manager, and the
//! per-user prompt override store.
//!
//! The gateway shell owns none of their logic. It initializes them in a
//! fixed order at startup, hands them to route groups, and tears them
//! down at shutdown. Each seam is either a thin concrete handle (the
//! database) or a trait object so the backend can be swapped without
//! touching the shell.

pub mod cache;
pub mod db;
pub mod execution;
pub mod prompt;

pub use cache::{Cache, NoopCache};
pub use db::Database;
pub use execution::ExecutionManager;
pub use prompt::{MemoryPromptStore, PromptStore, SqlitePromptStore, StoreError};
