//! In-memory account store.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::store::{
    AccountId, AccountPatch, AccountStore, CreditOutcome, NewAccount, UserAccount,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    accounts: HashMap<AccountId, UserAccount>,
    by_subject: HashMap<String, AccountId>,
}

/// In-memory [`AccountStore`] guarded by a single lock.
///
/// Suitable for tests and single-process deployments. Every write takes the
/// write lock, so the subject uniqueness check and the credit increment are
/// atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.read().accounts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.read().accounts.is_empty()
    }
}

#[inline]
fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(
        &self,
        profile: &NewAccount,
        plan_id: i64,
        credit_balance: i64,
    ) -> Result<UserAccount, StoreError> {
        let mut inner = self.inner.write();
        if inner.by_subject.contains_key(&profile.subject_id) {
            return Err(StoreError::DuplicateKey(format!(
                "subject_id {}",
                profile.subject_id
            )));
        }

        inner.next_id += 1;
        let id = AccountId::new(inner.next_id);
        let now = now_unix();
        let account = UserAccount {
            id,
            subject_id: profile.subject_id.clone(),
            email: profile.email.clone(),
            username: profile.username.clone(),
            photo: profile.photo.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            plan_id,
            credit_balance,
            created_at: now,
            updated_at: now,
        };
        inner.by_subject.insert(account.subject_id.clone(), id);
        inner.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<UserAccount>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .by_subject
            .get(subject_id)
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.inner.read().accounts.get(&id).cloned())
    }

    async fn update_by_subject(
        &self,
        subject_id: &str,
        patch: &AccountPatch,
    ) -> Result<Option<UserAccount>, StoreError> {
        let mut inner = self.inner.write();
        let Some(id) = inner.by_subject.get(subject_id).copied() else {
            return Ok(None);
        };
        let Some(account) = inner.accounts.get_mut(&id) else {
            return Ok(None);
        };
        if !patch.is_empty() {
            patch.apply_to(account);
            account.updated_at = now_unix();
        }
        Ok(Some(account.clone()))
    }

    async fn delete_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError> {
        let mut inner = self.inner.write();
        let removed = inner.accounts.remove(&id);
        if let Some(ref account) = removed {
            inner.by_subject.remove(&account.subject_id);
        }
        Ok(removed)
    }

    async fn increment_credits(
        &self,
        id: AccountId,
        delta: i64,
        floor: Option<i64>,
    ) -> Result<CreditOutcome, StoreError> {
        let mut inner = self.inner.write();
        let Some(account) = inner.accounts.get_mut(&id) else {
            return Ok(CreditOutcome::NotFound);
        };

        let next = account
            .credit_balance
            .checked_add(delta)
            .ok_or_else(|| StoreError::Unavailable(format!("credit balance overflow on {id}")))?;
        if let Some(floor) = floor
            && next < floor
        {
            return Ok(CreditOutcome::Rejected {
                balance: account.credit_balance,
            });
        }

        account.credit_balance = next;
        account.updated_at = now_unix();
        Ok(CreditOutcome::Applied(account.clone()))
    }

    async fn list(&self) -> Result<Vec<UserAccount>, StoreError> {
        let mut all: Vec<_> = self.inner.read().accounts.values().cloned().collect();
        all.sort_by_key(|a| a.id);
        Ok(all)
    }
}
