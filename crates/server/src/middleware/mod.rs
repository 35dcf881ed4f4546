//! Request middleware for the trigger surface.

pub mod auth;

pub use auth::require_sync_token;
