//! Gateway shell: process lifecycle, CORS policy, request logging,
//! route-group mounting, and the prompt override CRUD surface.
//!
//! Lifecycle:
//! 1. Establish the database connection (fatal on failure)
//! 2. Construct the execution manager bound to it
//! 3. Initialize the agent and sandbox route groups with shared resources
//! 4. Initialize the cache connection (best-effort, degrades to none)
//! 5. Serve; on shutdown reverse the order, tolerating cache failures
//!
//! All domain logic (agent orchestration, sandbox control, billing) lives
//! behind the route groups mounted in `server.rs`; this crate is pure
//! composition over the seams in `portico-services`.

pub mod auth;
pub mod groups;
pub mod lifecycle;
pub mod logging;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod state;
