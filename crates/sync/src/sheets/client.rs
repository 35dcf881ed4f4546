//! HTTP client for the public spreadsheet export.

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use tracing::{debug, instrument};

use super::parse::{looks_like_gviz, parse_csv, parse_gviz_json};
use super::{SheetError, SheetReader, SheetRow};
use crate::config::SyncConfig;

/// Client for the publicly shared tabular export of a spreadsheet.
///
/// Requests the CSV transport but tolerates the gviz JSON envelope the
/// endpoint serves under some routings; both parse into the same rows.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    /// HTTP client.
    http: Client,
    /// Base URL of the export endpoint (overridable for tests).
    base_url: String,
    /// Per-request timeout.
    timeout: Duration,
}

impl SheetsClient {
    /// Create a new export client from engine configuration.
    #[must_use]
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.sheets_base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(config.sheets_timeout_secs),
        }
    }

    /// Fetch the raw export body for one sheet.
    ///
    /// # Errors
    ///
    /// Maps transport failures into the reader error taxonomy:
    /// permission-style statuses become [`SheetError::AccessDenied`], all
    /// other failures [`SheetError::SourceUnavailable`].
    #[instrument(skip_all, fields(spreadsheet_id = %spreadsheet_id, sheet = %sheet_name))]
    async fn fetch(&self, spreadsheet_id: &str, sheet_name: &str) -> Result<String, SheetError> {
        let url = format!("{}/spreadsheets/d/{spreadsheet_id}/gviz/tq", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("tqx", "out:csv"), ("sheet", sheet_name)])
            .header(header::ACCEPT, "text/csv")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SheetError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SheetError::AccessDenied);
        }
        if !status.is_success() {
            return Err(SheetError::SourceUnavailable(format!(
                "export returned HTTP {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SheetError::SourceUnavailable(e.to_string()))
    }
}

impl SheetReader for SheetsClient {
    async fn read(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
    ) -> Result<Vec<SheetRow>, SheetError> {
        let body = self.fetch(spreadsheet_id, sheet_name).await?;

        let rows = if looks_like_gviz(&body) {
            parse_gviz_json(&body)?
        } else {
            parse_csv(&body)?
        };

        if rows.is_empty() {
            return Err(SheetError::EmptySource);
        }

        debug!(rows = rows.len(), "Fetched sheet snapshot");

        Ok(rows)
    }
}
