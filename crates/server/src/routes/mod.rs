//! HTTP route handlers for the sync trigger surface.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (database ping)
//!
//! # Sync triggers (Authorization: Bearer <SYNC_SECRET>)
//! POST /api/sync/all                 - Run every auto-sync integration
//! POST /api/sync/{integration_id}    - Run one integration
//! ```

pub mod sync;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Assemble the application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sync/all", post(sync::sync_all))
        .route("/api/sync/{integration_id}", post(sync::sync_one))
}
