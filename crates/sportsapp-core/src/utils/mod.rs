//! Utils module - Shared utilities and helpers

/// Conversions from transport errors into `ApiError`
pub mod error_helpers;

/// Logger setup and verbose output
pub mod logging;

/// Display text helpers
pub mod text;

/// Input validation
pub mod validation;
