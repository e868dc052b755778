//! Store-backed account ledger.
//!
//! [`AccountLedger<S>`] wraps any [`AccountStore`] implementation and provides:
//! - Boundary validation of profile data
//! - Lock-free get-or-create with duplicate-key race recovery
//! - Overdraft policy on top of the store's atomic increment
//! - Fire-and-forget [`LedgerEvent`] notifications

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, StoreError};
use crate::transformation::TransformationType;

use super::config::LedgerConfig;
use super::events::LedgerEvent;
use super::record::{AccountId, AccountPatch, NewAccount, UserAccount, validate_subject_id};
use super::traits::{AccountStore, CreditOutcome};

/// Account and credit ledger over a [`AccountStore`].
///
/// The ledger takes no locks of its own. Concurrency correctness comes from
/// the store's uniqueness constraint on `subject_id` and its atomic increment.
///
/// # Type parameter
///
/// - `S` - the underlying data store (e.g. `MemoryStore`, `SqlStore`)
pub struct AccountLedger<S: AccountStore> {
    store: S,
    config: LedgerConfig,
    events: broadcast::Sender<LedgerEvent>,
}

impl<S: AccountStore> AccountLedger<S> {
    /// Create a new ledger wrapping the given store.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            store,
            config,
            events,
        }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: LedgerEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Insert a new account from an explicit profile.
    ///
    /// Fails with [`LedgerError::Conflict`] if the subject id already has an
    /// account.
    pub async fn create_account(&self, profile: NewAccount) -> Result<UserAccount, LedgerError> {
        profile.validate()?;

        let account = self
            .store
            .insert(
                &profile,
                self.config.default_plan_id,
                self.config.default_credit_balance,
            )
            .await
            .map_err(|e| {
                let err = LedgerError::from(e);
                warn!(subject_id = %profile.subject_id, kind = err.kind(), error = %err, "create account failed");
                err
            })?;

        info!(subject_id = %account.subject_id, account_id = %account.id, "account created");
        self.emit(LedgerEvent::Created {
            account: account.clone(),
            provisioned: false,
        });
        Ok(account)
    }

    /// Look up an account by subject id.
    ///
    /// Absence is `Ok(None)`, never an error: the caller decides whether the
    /// account needs provisioning.
    pub async fn get_account_by_subject_id(
        &self,
        subject_id: &str,
    ) -> Result<Option<UserAccount>, LedgerError> {
        let found = self
            .store
            .find_by_subject(subject_id)
            .await
            .map_err(|e| self.store_failure("lookup", subject_id, e))?;

        if found.is_none() {
            warn!(subject_id, "account not found, may need provisioning");
        }
        Ok(found)
    }

    /// Look up an account by internal id.
    pub async fn get_account_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, LedgerError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| self.store_failure("lookup", &id.to_string(), e))
    }

    /// Return the account for `subject_id`, provisioning a placeholder one if
    /// none exists.
    ///
    /// Safe to call concurrently for the same subject: if another caller wins
    /// the insert, the duplicate-key rejection triggers a re-query and the
    /// winner's record is returned. At most one account is ever persisted.
    pub async fn get_or_create_account(&self, subject_id: &str) -> Result<UserAccount, LedgerError> {
        validate_subject_id(subject_id)?;

        if let Some(existing) = self
            .store
            .find_by_subject(subject_id)
            .await
            .map_err(|e| self.store_failure("lookup", subject_id, e))?
        {
            return Ok(existing);
        }

        let profile = NewAccount::placeholder(subject_id);
        match self
            .store
            .insert(
                &profile,
                self.config.default_plan_id,
                self.config.default_credit_balance,
            )
            .await
        {
            Ok(account) => {
                info!(subject_id, account_id = %account.id, "provisioned account");
                self.emit(LedgerEvent::Created {
                    account: account.clone(),
                    provisioned: true,
                });
                Ok(account)
            }
            Err(StoreError::DuplicateKey(detail)) => {
                debug!(subject_id, %detail, "lost provisioning race, re-reading");
                match self
                    .store
                    .find_by_subject(subject_id)
                    .await
                    .map_err(|e| self.store_failure("lookup", subject_id, e))?
                {
                    Some(account) => Ok(account),
                    None => {
                        let err = LedgerError::StoreUnavailable(format!(
                            "duplicate key on insert but no account found for {subject_id}: {detail}"
                        ));
                        warn!(subject_id, error = %err, "provisioning race recovery failed");
                        Err(err)
                    }
                }
            }
            Err(e) => Err(self.store_failure("insert", subject_id, e)),
        }
    }

    /// Apply a partial profile update and return the updated account.
    pub async fn update_account(
        &self,
        subject_id: &str,
        patch: AccountPatch,
    ) -> Result<UserAccount, LedgerError> {
        patch.validate()?;

        let updated = self
            .store
            .update_by_subject(subject_id, &patch)
            .await
            .map_err(|e| self.store_failure("update", subject_id, e))?;

        match updated {
            Some(account) => {
                debug!(subject_id, account_id = %account.id, "account updated");
                self.emit(LedgerEvent::Updated {
                    account: account.clone(),
                });
                Ok(account)
            }
            None => {
                warn!(subject_id, "update failed: account not found");
                Err(LedgerError::NotFound(subject_id.to_string()))
            }
        }
    }

    /// Delete the account for `subject_id`.
    ///
    /// Returns `Ok(None)` when a concurrent delete removed the record between
    /// the lookup and the delete.
    pub async fn delete_account(&self, subject_id: &str) -> Result<Option<UserAccount>, LedgerError> {
        let Some(target) = self
            .store
            .find_by_subject(subject_id)
            .await
            .map_err(|e| self.store_failure("lookup", subject_id, e))?
        else {
            warn!(subject_id, "delete failed: account not found");
            return Err(LedgerError::NotFound(subject_id.to_string()));
        };

        let deleted = self
            .store
            .delete_by_id(target.id)
            .await
            .map_err(|e| self.store_failure("delete", subject_id, e))?;

        match deleted {
            Some(ref account) => {
                info!(subject_id, account_id = %account.id, "account deleted");
                self.emit(LedgerEvent::Deleted {
                    id: account.id,
                    subject_id: account.subject_id.clone(),
                });
            }
            None => debug!(subject_id, "account already deleted by a concurrent caller"),
        }
        Ok(deleted)
    }

    /// Atomically add `delta` to the account's balance and return the
    /// updated record.
    ///
    /// Negative deltas spend, positive ones grant or refund. Whether the
    /// balance may end up below zero is decided by
    /// [`LedgerConfig::overdraft`].
    pub async fn adjust_credits(&self, id: AccountId, delta: i64) -> Result<UserAccount, LedgerError> {
        // A non-negative delta can never break the floor.
        let floor = if delta < 0 {
            self.config.overdraft.floor()
        } else {
            None
        };

        let outcome = self
            .store
            .increment_credits(id, delta, floor)
            .await
            .map_err(|e| self.store_failure("increment", &id.to_string(), e))?;

        match outcome {
            CreditOutcome::Applied(account) => {
                debug!(account_id = %id, delta, balance = account.credit_balance, "credits adjusted");
                self.emit(LedgerEvent::CreditsAdjusted {
                    id,
                    delta,
                    balance: account.credit_balance,
                });
                Ok(account)
            }
            CreditOutcome::NotFound => {
                warn!(account_id = %id, delta, "credit update failed: account not found");
                Err(LedgerError::NotFound(id.to_string()))
            }
            CreditOutcome::Rejected { balance } => {
                warn!(account_id = %id, delta, balance, "credit update rejected by overdraft policy");
                Err(LedgerError::InsufficientCredits { balance, delta })
            }
        }
    }

    /// Charge the catalogue fee for one transformation.
    pub async fn charge_transformation(
        &self,
        id: AccountId,
        kind: TransformationType,
    ) -> Result<UserAccount, LedgerError> {
        debug!(account_id = %id, transformation = kind.slug(), fee = kind.credit_fee(), "charging transformation");
        self.adjust_credits(id, -kind.credit_fee()).await
    }

    /// All accounts, ordered by id.
    pub async fn list_accounts(&self) -> Result<Vec<UserAccount>, LedgerError> {
        self.store
            .list()
            .await
            .map_err(|e| self.store_failure("list", "*", e))
    }

    fn store_failure(&self, op: &'static str, target: &str, err: StoreError) -> LedgerError {
        let err = LedgerError::from(err);
        warn!(op, target, kind = err.kind(), error = %err, "store operation failed");
        err
    }
}

impl<S: AccountStore + std::fmt::Debug> std::fmt::Debug for AccountLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLedger")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
