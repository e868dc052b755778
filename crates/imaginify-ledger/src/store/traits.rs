//! Data-access trait for account stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;

use super::{AccountId, AccountPatch, NewAccount, UserAccount};

/// Result of an atomic credit increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditOutcome {
    /// The delta was applied; carries the post-increment record.
    Applied(UserAccount),
    /// No account has the given id.
    NotFound,
    /// The floor check failed; nothing was written.
    Rejected { balance: i64 },
}

/// Data-access layer for user accounts.
///
/// Implementations provide only persistence. Get-or-create, overdraft policy
/// and event fan-out are handled by [`AccountLedger`](super::AccountLedger),
/// which wraps an `AccountStore`.
///
/// Implementations must:
/// - reject a second account with the same `subject_id` with
///   [`StoreError::DuplicateKey`];
/// - apply [`increment_credits`](Self::increment_credits) as a single atomic
///   operation (no read-modify-write visible to other callers).
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn insert(
        &self,
        profile: &NewAccount,
        plan_id: i64,
        credit_balance: i64,
    ) -> Result<UserAccount, StoreError>;

    /// Look up an account by identity-provider subject id.
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Look up an account by internal id.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError>;

    /// Apply a partial update. Returns `None` if nothing matched.
    async fn update_by_subject(
        &self,
        subject_id: &str,
        patch: &AccountPatch,
    ) -> Result<Option<UserAccount>, StoreError>;

    /// Delete by internal id. Returns the removed record, or `None` if it was
    /// already gone.
    async fn delete_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError>;

    /// Atomically add `delta` to the balance.
    ///
    /// With `floor = Some(f)` the write only happens if the resulting balance
    /// is `>= f`.
    async fn increment_credits(
        &self,
        id: AccountId,
        delta: i64,
        floor: Option<i64>,
    ) -> Result<CreditOutcome, StoreError>;

    /// All accounts ordered by id.
    async fn list(&self) -> Result<Vec<UserAccount>, StoreError>;
}

macro_rules! forward_account_store {
    ($wrapper:ident) => {
        #[async_trait]
        impl<S: AccountStore + ?Sized> AccountStore for $wrapper<S> {
            #[inline]
            async fn insert(
                &self,
                profile: &NewAccount,
                plan_id: i64,
                credit_balance: i64,
            ) -> Result<UserAccount, StoreError> {
                (**self).insert(profile, plan_id, credit_balance).await
            }

            #[inline]
            async fn find_by_subject(
                &self,
                subject_id: &str,
            ) -> Result<Option<UserAccount>, StoreError> {
                (**self).find_by_subject(subject_id).await
            }

            #[inline]
            async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError> {
                (**self).find_by_id(id).await
            }

            #[inline]
            async fn update_by_subject(
                &self,
                subject_id: &str,
                patch: &AccountPatch,
            ) -> Result<Option<UserAccount>, StoreError> {
                (**self).update_by_subject(subject_id, patch).await
            }

            #[inline]
            async fn delete_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError> {
                (**self).delete_by_id(id).await
            }

            #[inline]
            async fn increment_credits(
                &self,
                id: AccountId,
                delta: i64,
                floor: Option<i64>,
            ) -> Result<CreditOutcome, StoreError> {
                (**self).increment_credits(id, delta, floor).await
            }

            #[inline]
            async fn list(&self) -> Result<Vec<UserAccount>, StoreError> {
                (**self).list().await
            }
        }
    };
}

forward_account_store!(Arc);
forward_account_store!(Box);
