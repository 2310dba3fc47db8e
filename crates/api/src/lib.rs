//! Releasegate API server library.
//!
//! Exposes config, state, error handling, request parsing and routes so
//! integration tests and the binary entrypoint share the same router.

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
