//! Change notifications emitted by the ledger.
//!
//! Presentation layers subscribe to these to revalidate cached pages. Sending
//! never blocks and never fails the operation that produced the event.

use serde::Serialize;

use super::{AccountId, UserAccount};

/// A committed change to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Explicitly created or auto-provisioned.
    Created { account: UserAccount, provisioned: bool },
    /// Profile fields changed.
    Updated { account: UserAccount },
    /// Account removed.
    Deleted { id: AccountId, subject_id: String },
    /// Balance changed by `delta`.
    CreditsAdjusted {
        id: AccountId,
        delta: i64,
        balance: i64,
    },
}

impl LedgerEvent {
    /// Id of the account the event is about.
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::Created { account, .. } | Self::Updated { account } => account.id,
            Self::Deleted { id, .. } | Self::CreditsAdjusted { id, .. } => *id,
        }
    }
}
