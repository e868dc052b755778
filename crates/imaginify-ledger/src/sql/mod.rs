//! SQL account store.
//!
//! Persists accounts in PostgreSQL, MySQL or SQLite through SQLx's `Any`
//! driver. The database is chosen by the URL scheme.
//!
//! # Example
//!
//! ```ignore
//! use imaginify_ledger::sql::{SqlStore, SqlStoreConfig};
//! use imaginify_ledger::store::{AccountLedger, LedgerConfig};
//!
//! let store = SqlStore::connect(SqlStoreConfig::new("sqlite:imaginify.db?mode=rwc")).await?;
//! store.init_schema().await?;
//!
//! let ledger = AccountLedger::new(store, LedgerConfig::default());
//! let account = ledger.get_or_create_account("user_2abc").await?;
//! ```
//!
//! # Database Schema
//!
//! [`SqlStore::init_schema`] creates the table; the PostgreSQL form is:
//!
//! ```sql
//! CREATE TABLE imaginify_users (
//!     id BIGSERIAL PRIMARY KEY,
//!     subject_id VARCHAR(255) NOT NULL UNIQUE,   -- identity-provider id
//!     email VARCHAR(320) NOT NULL,
//!     username VARCHAR(255) NOT NULL,
//!     photo VARCHAR(2048) NOT NULL DEFAULT '',
//!     first_name VARCHAR(255) NOT NULL DEFAULT '',
//!     last_name VARCHAR(255) NOT NULL DEFAULT '',
//!     plan_id BIGINT NOT NULL DEFAULT 1,
//!     credit_balance BIGINT NOT NULL DEFAULT 10, -- may go negative
//!     created_at BIGINT NOT NULL,                -- unix seconds
//!     updated_at BIGINT NOT NULL
//! );
//! ```
//!
//! Email and username are intentionally not unique: placeholder profiles are
//! derived from a subject-id suffix and may collide.

mod backend;
mod config;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::{DatabaseType, SqlStore};
pub use config::SqlStoreConfig;
