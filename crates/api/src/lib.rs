//! Artists lab API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! workflows) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod probe;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod workflow;
