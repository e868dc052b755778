//! Generic store-based account ledger.
//!
//! This module provides:
//!
//! - [`UserAccount`] / [`NewAccount`] / [`AccountPatch`] - account data shared by every store
//! - [`AccountStore`] - data-access trait (implement this for new backends)
//! - [`AccountLedger`] - generic wrapper that adds validation, get-or-create and credit policy
//! - [`LedgerConfig`] / [`OverdraftPolicy`] - configuration types
//! - [`LedgerEvent`] - change notifications
//!
//! # Adding a new backend
//!
//! ```ignore
//! use imaginify_ledger::store::{AccountStore, AccountLedger, LedgerConfig};
//!
//! struct MyStore { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl AccountStore for MyStore {
//!     // insert / find_by_subject / find_by_id / update_by_subject /
//!     // delete_by_id / increment_credits / list
//! }
//!
//! // Then construct: AccountLedger::new(MyStore { .. }, LedgerConfig::default())
//! ```

mod config;
mod events;
mod ledger;
mod record;
mod traits;

pub use config::{LedgerConfig, OverdraftPolicy};
pub use events::LedgerEvent;
pub use ledger::AccountLedger;
pub use record::{AccountId, AccountPatch, NewAccount, UserAccount};
pub use traits::{AccountStore, CreditOutcome};
