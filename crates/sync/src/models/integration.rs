//! Integration model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cedar_core::{IntegrationId, UserId};

/// A configured binding between a user and one external spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    /// Integration ID.
    pub id: IntegrationId,
    /// Owning user; scopes order history and product lookups.
    pub user_id: UserId,
    /// Identifier of the publicly shared spreadsheet.
    pub spreadsheet_id: String,
    /// Named sheet/tab within the spreadsheet.
    pub sheet_name: String,
    /// Whether this integration participates in batch runs.
    pub auto_sync: bool,
    /// When the last sync pass completed, if ever.
    pub last_sync_at: Option<DateTime<Utc>>,
}
