//! Sync trigger handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use tracing::{info, instrument};

use cedar_core::IntegrationId;
use cedar_sync::stats::{SyncReport, SyncStats};
use cedar_sync::store::OrderStore;

use crate::error::AppError;
use crate::middleware::require_sync_token;
use crate::state::AppState;

/// Run one sync pass for a single integration.
///
/// # Errors
///
/// Returns `Unauthorized` without the shared secret, `NotFound` for an
/// unknown integration, and the mapped sync error if the pass aborts.
#[instrument(skip(state, headers))]
pub async fn sync_one(
    State(state): State<AppState>,
    Path(integration_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<SyncStats>, AppError> {
    require_sync_token(&headers, &state.config().sync_secret)?;

    let integration_id = IntegrationId::new(integration_id);
    let integration = state
        .service()
        .store()
        .get_integration(integration_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("integration {integration_id}")))?;

    info!(%integration_id, "Manual sync triggered");

    let stats = state.service().run_sync(&integration).await?;
    Ok(Json(stats))
}

/// Run a pass for every integration flagged for automatic sync.
///
/// Per-integration failures are recorded inside the report; only
/// authentication and the integration listing itself can fail the request.
///
/// # Errors
///
/// Returns `Unauthorized` without the shared secret, or a database error if
/// the integration listing fails.
#[instrument(skip(state, headers))]
pub async fn sync_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SyncReport>, AppError> {
    require_sync_token(&headers, &state.config().sync_secret)?;

    let integrations = state
        .service()
        .store()
        .list_auto_sync_integrations()
        .await?;

    info!(integrations = integrations.len(), "Batch sync triggered");

    let report = state.service().run_all(&integrations).await;
    Ok(Json(report))
}
