//! Cedar Sync - the spreadsheet order-intake engine.
//!
//! One sync pass for one integration runs read → normalize → classify →
//! persist over every row currently present in the configured spreadsheet:
//!
//! 1. [`sheets`] fetches the public tabular export and maps it into raw
//!    [`sheets::SheetRow`]s (header-synonym matching, both CSV and JSON
//!    transports).
//! 2. [`normalize`] turns each raw row into a typed
//!    [`normalize::NormalizedOrder`] (digit folding, phone
//!    canonicalization, recomputed totals) or a per-row failure.
//! 3. [`classify`] decides NEW / exact duplicate / likely duplicate against
//!    a read-only history snapshot.
//! 4. [`engine::SyncService`] persists the results through an
//!    [`store::OrderStore`], updates the integration's bookkeeping, and
//!    returns a [`stats::SyncStats`] report.
//!
//! The engine owns no scheduler state: callers (HTTP endpoint, CLI, cron)
//! invoke [`engine::SyncService::run_sync`] as a plain, repeatedly-callable
//! async function.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod classify;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod normalize;
pub mod sheets;
pub mod stats;
pub mod store;

pub use classify::{Classification, DuplicateDetector, DuplicatePolicy};
pub use config::SyncConfig;
pub use engine::SyncService;
pub use error::{SyncError, SyncErrorKind};
pub use normalize::{NormalizationError, NormalizedOrder};
pub use sheets::{SheetError, SheetReader, SheetRow, SheetsClient};
pub use stats::{IntegrationOutcome, InvalidRow, PassResult, RowDigest, SyncReport, SyncStats};
pub use store::OrderStore;
