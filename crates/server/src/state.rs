//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use cedar_sync::db::PgOrderStore;
use cedar_sync::sheets::SheetsClient;
use cedar_sync::SyncService;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; the inner data is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    service: SyncService<SheetsClient, PgOrderStore>,
}

impl AppState {
    /// Build state from loaded configuration and a connected pool.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let reader = SheetsClient::new(&config.sync);
        let store = PgOrderStore::new(pool.clone());
        let service = SyncService::new(reader, store, &config.sync);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                service,
            }),
        }
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Database pool (for readiness checks).
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The sync engine.
    #[must_use]
    pub fn service(&self) -> &SyncService<SheetsClient, PgOrderStore> {
        &self.inner.service
    }
}
