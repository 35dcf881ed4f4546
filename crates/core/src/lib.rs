//! Cedar Core - Shared types library.
//!
//! This crate provides common types used across all Cedar components:
//! - `sync` - The spreadsheet order-intake engine
//! - `server` - HTTP trigger surface for sync passes
//! - `cli` - Command-line tools for migrations and manual syncs
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, phone numbers, digits,
//!   and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
