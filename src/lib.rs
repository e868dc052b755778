//! # imaginify
//!
//! Account and credit ledger for the Imaginify image editor.
//!
//! ## Crates
//!
//! - [`imaginify_core`] - Shared constants and defaults
//! - [`imaginify_config`] - Configuration loading and validation
//! - [`imaginify_ledger`] - Accounts, credits and account stores
//! - [`imaginify_util`] - Retry, URL query and placeholder helpers

pub use imaginify_config as config;
pub use imaginify_core as core;
pub use imaginify_ledger as ledger;
pub use imaginify_util as util;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use imaginify_config::{Config, load_config, validate_config};
    pub use imaginify_ledger::{
        AccountLedger, AccountStore, LedgerConfig, LedgerError, MemoryStore, OverdraftPolicy,
        TransformationType, UserAccount,
    };
    pub use imaginify_util::{RetryPolicy, is_rate_limited, retry_with_backoff};
}
