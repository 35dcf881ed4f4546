//! Core types for Cedar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod digits;
pub mod id;
pub mod phone;
pub mod status;

pub use digits::fold_digits;
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use status::OrderStatus;
