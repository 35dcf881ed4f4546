//! Unified error handling for the trigger surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use cedar_sync::db::RepositoryError;
use cedar_sync::error::{SyncError, SyncErrorKind};
use cedar_sync::sheets::SheetError;

/// Application-level error type for the sync server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// A sync pass aborted.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller did not present the shared sync secret.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::Sync(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Sync request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Sync(e) => sync_status(e),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Pass-fatal sync errors map onto the upstream cause: the spreadsheet
/// export is an external dependency, the store is ours.
fn sync_status(error: &SyncError) -> StatusCode {
    match &error.kind {
        SyncErrorKind::Sheet(SheetError::AccessDenied) => StatusCode::BAD_GATEWAY,
        SyncErrorKind::Sheet(SheetError::EmptySource | SheetError::Format(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SyncErrorKind::Sheet(SheetError::SourceUnavailable(_)) => StatusCode::BAD_GATEWAY,
        SyncErrorKind::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cedar_core::IntegrationId;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("integration 3".to_owned());
        assert_eq!(err.to_string(), "Not found: integration 3");

        let err = AppError::Unauthorized("missing bearer token".to_owned());
        assert_eq!(err.to_string(), "Unauthorized: missing bearer token");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sync_error_status_follows_cause() {
        let denied = SyncError::new(IntegrationId::new(1), SheetError::AccessDenied);
        assert_eq!(get_status(AppError::Sync(denied)), StatusCode::BAD_GATEWAY);

        let empty = SyncError::new(IntegrationId::new(1), SheetError::EmptySource);
        assert_eq!(
            get_status(AppError::Sync(empty)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let response = AppError::Internal("connection string leaked".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
