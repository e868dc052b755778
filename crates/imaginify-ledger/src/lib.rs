//! User account and credit ledger for Imaginify.
//!
//! Accounts are keyed by the identity provider's subject id and created on
//! first access. Credits are adjusted with a single atomic increment so that
//! concurrent spends never lose an update.
//!
//! # Example
//!
//! ```
//! use imaginify_ledger::{AccountLedger, LedgerConfig, MemoryStore};
//!
//! # async fn example() -> Result<(), imaginify_ledger::LedgerError> {
//! let ledger = AccountLedger::new(MemoryStore::new(), LedgerConfig::default());
//!
//! let account = ledger.get_or_create_account("user_2abcDEF987").await?;
//! assert_eq!(account.credit_balance, 10);
//!
//! let account = ledger.adjust_credits(account.id, -1).await?;
//! assert_eq!(account.credit_balance, 9);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
pub mod store;
pub mod transformation;

#[cfg(feature = "sql")]
pub mod sql;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{LedgerError, StoreError};
pub use memory::MemoryStore;
pub use store::{
    AccountId, AccountLedger, AccountPatch, AccountStore, CreditOutcome, LedgerConfig,
    LedgerEvent, NewAccount, OverdraftPolicy, UserAccount,
};
pub use transformation::{AspectRatio, Dimension, TransformationType, image_dimension};

#[cfg(feature = "cli")]
pub use cli::LedgerArgs;
