//! Cedar Server library.
//!
//! This crate provides the HTTP trigger surface as a library, allowing it
//! to be tested and reused.
//!
//! The server is a thin wrapper: every endpoint authenticates the caller
//! with a shared-secret bearer token, resolves the target integrations,
//! and hands off to the `cedar-sync` engine. All sync semantics live in
//! the engine; an external scheduler (cron, CI, a dashboard button) decides
//! when the endpoints are hit.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::AppError;
pub use state::AppState;
