//! Error kind labels for structured logging.
//!
//! These constants provide consistent error classification across all crates.

/// Subject id already has an account.
pub const ERROR_CONFLICT: &str = "conflict";
/// Target account does not exist.
pub const ERROR_NOT_FOUND: &str = "not_found";
/// Store connection or transport failure.
pub const ERROR_STORE: &str = "store_unavailable";
/// Overdraft rejected by policy.
pub const ERROR_INSUFFICIENT_CREDITS: &str = "insufficient_credits";
/// Input rejected at the boundary.
pub const ERROR_VALIDATION: &str = "validation";
