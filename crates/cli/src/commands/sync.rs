//! Manual sync commands.
//!
//! # Usage
//!
//! ```bash
//! cedar-cli sync --integration 3
//! cedar-cli sync-all
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - Engine knobs (`SYNC_COUNTRY_CODE`, `SYNC_DUPLICATE_WINDOW_DAYS`,
//!   `SHEETS_BASE_URL`, `SHEETS_TIMEOUT_SECS`) - see `cedar-sync`

use secrecy::SecretString;
use thiserror::Error;

use cedar_core::IntegrationId;
use cedar_sync::db::{self, PgOrderStore, RepositoryError};
use cedar_sync::sheets::SheetsClient;
use cedar_sync::store::OrderStore;
use cedar_sync::{SyncConfig, SyncError, SyncService};

/// Errors that can occur while running a manual sync.
#[derive(Debug, Error)]
pub enum CliSyncError {
    /// A required environment variable is unset.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Engine configuration is invalid.
    #[error(transparent)]
    Config(#[from] cedar_sync::config::ConfigError),

    /// Connecting to the database failed.
    #[error("database error: {0}")]
    Connect(#[from] sqlx::Error),

    /// A store lookup failed.
    #[error(transparent)]
    Store(#[from] RepositoryError),

    /// No integration with the given id.
    #[error("integration {0} not found")]
    UnknownIntegration(IntegrationId),

    /// The sync pass aborted.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The result could not be rendered.
    #[error("could not render report: {0}")]
    Render(#[from] serde_json::Error),
}

/// Run one sync pass and log the resulting stats as JSON.
///
/// # Errors
///
/// Returns [`CliSyncError`] for configuration, connection, lookup, or
/// pass-fatal sync failures.
pub async fn run_one(integration_id: i32) -> Result<(), CliSyncError> {
    let service = build_service().await?;

    let integration_id = IntegrationId::new(integration_id);
    let integration = service
        .store()
        .get_integration(integration_id)
        .await?
        .ok_or(CliSyncError::UnknownIntegration(integration_id))?;

    let stats = service.run_sync(&integration).await?;

    tracing::info!(
        integration_id = %integration_id,
        stats = %serde_json::to_string_pretty(&stats)?,
        "Sync finished"
    );
    Ok(())
}

/// Run a batch pass over every auto-sync integration and log the report.
///
/// # Errors
///
/// Returns [`CliSyncError`] for configuration, connection, or listing
/// failures; per-integration outcomes live inside the report.
pub async fn run_all() -> Result<(), CliSyncError> {
    let service = build_service().await?;

    let integrations = service.store().list_auto_sync_integrations().await?;
    let report = service.run_all(&integrations).await;

    tracing::info!(
        report = %serde_json::to_string_pretty(&report)?,
        "Batch sync finished"
    );
    Ok(())
}

/// Wire a sync service from the environment.
async fn build_service() -> Result<SyncService<SheetsClient, PgOrderStore>, CliSyncError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CliSyncError::MissingEnvVar("DATABASE_URL"))?;
    let config = SyncConfig::from_env()?;

    let pool = db::create_pool(&database_url).await?;
    let reader = SheetsClient::new(&config);
    let store = PgOrderStore::new(pool);

    Ok(SyncService::new(reader, store, &config))
}
