//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Account Defaults
// ============================================================================

/// Credits granted to a freshly created account.
pub const DEFAULT_CREDIT_BALANCE: i64 = 10;
/// Plan assigned to a freshly created account.
pub const DEFAULT_PLAN_ID: i64 = 1;
/// Number of trailing subject-id characters used for placeholder profiles.
pub const PLACEHOLDER_SUFFIX_LEN: usize = 8;
/// Domain of synthesized placeholder email addresses.
pub const PLACEHOLDER_EMAIL_DOMAIN: &str = "imaginify.com";
/// Photo assigned to auto-provisioned accounts.
pub const PLACEHOLDER_PHOTO_URL: &str = "https://img.clerk.com/preview.png";
/// Credits charged per image transformation.
pub const DEFAULT_TRANSFORMATION_FEE: i64 = 1;
/// Overdraft policy name ("allow" or "reject").
pub const DEFAULT_OVERDRAFT: &str = "allow";
/// Capacity of the ledger event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

// ============================================================================
// Database Defaults
// ============================================================================

/// Default database URL (SQLite file, created on first use).
pub const DEFAULT_DATABASE_URL: &str = "sqlite:imaginify.db?mode=rwc";
/// Default maximum pooled connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
/// Default minimum pooled connections.
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;
/// Default connection acquire timeout in seconds.
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;
/// Default maximum connection lifetime in seconds (30 minutes).
pub const DEFAULT_DB_MAX_LIFETIME_SECS: u64 = 1800;
/// Default idle connection timeout in seconds (10 minutes).
pub const DEFAULT_DB_IDLE_TIMEOUT_SECS: u64 = 600;

// ============================================================================
// Retry Defaults
// ============================================================================

/// Default attempts for rate-limited upload calls.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
/// Default delay before the first retry in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;
/// Default upper bound for a single retry delay in milliseconds.
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 30_000;
/// Default backoff multiplier.
pub const DEFAULT_RETRY_MULTIPLIER: f64 = 2.0;
/// Default jitter factor (0 = deterministic delays).
pub const DEFAULT_RETRY_JITTER: f64 = 0.0;
/// HTTP status the media CDN uses for rate limiting ("Enhance Your Calm").
pub const RATE_LIMIT_HTTP_STATUS: u16 = 420;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default log format.
pub const DEFAULT_LOG_FORMAT: &str = "pretty";
/// Default log output.
pub const DEFAULT_LOG_OUTPUT: &str = "stderr";

// ============================================================================
// Placeholder Defaults
// ============================================================================

/// Fallback image dimension when nothing better is known.
pub const DEFAULT_IMAGE_DIMENSION: u32 = 1000;
