//! Configuration for [`AccountLedger`](super::AccountLedger).

use std::fmt;
use std::str::FromStr;

use imaginify_core::defaults;
use serde::{Deserialize, Serialize};

/// What happens when an adjustment would leave a negative balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverdraftPolicy {
    /// Apply the delta regardless; the balance may go negative.
    #[default]
    Allow,
    /// Refuse the delta with `InsufficientCredits`; nothing is written.
    Reject,
}

impl OverdraftPolicy {
    /// Floor handed to the store's atomic increment.
    #[inline]
    pub(crate) fn floor(self) -> Option<i64> {
        match self {
            Self::Allow => None,
            Self::Reject => Some(0),
        }
    }
}

impl fmt::Display for OverdraftPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allow => "allow",
            Self::Reject => "reject",
        })
    }
}

impl FromStr for OverdraftPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown overdraft policy: {other}")),
        }
    }
}

/// Ledger behaviour settings.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Opening balance for new accounts.
    pub default_credit_balance: i64,
    /// Plan assigned to new accounts.
    pub default_plan_id: i64,
    /// Negative-balance policy for `adjust_credits`.
    pub overdraft: OverdraftPolicy,
    /// Buffered events per subscriber before the slowest one lags.
    pub event_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_credit_balance: defaults::DEFAULT_CREDIT_BALANCE,
            default_plan_id: defaults::DEFAULT_PLAN_ID,
            overdraft: OverdraftPolicy::default(),
            event_capacity: defaults::DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the opening balance.
    pub fn default_credit_balance(mut self, balance: i64) -> Self {
        self.default_credit_balance = balance;
        self
    }

    /// Builder: set the default plan.
    pub fn default_plan_id(mut self, plan: i64) -> Self {
        self.default_plan_id = plan;
        self
    }

    /// Builder: set the overdraft policy.
    pub fn overdraft(mut self, policy: OverdraftPolicy) -> Self {
        self.overdraft = policy;
        self
    }

    /// Builder: set the event channel capacity (minimum 1).
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}
