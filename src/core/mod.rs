//! Core types and error handling.
//!
//! This module hosts the crate-wide error enum ([`WorkbenchError`]) and the
//! user-facing error presentation layer ([`ErrorContext`],
//! [`user_friendly_error`]). Domain modules return `anyhow::Result` with
//! typed errors underneath; the CLI entry point converts whatever bubbles up
//! into a colored message with actionable suggestions.

pub mod error;

pub use error::{ErrorContext, WorkbenchError, user_friendly_error};
