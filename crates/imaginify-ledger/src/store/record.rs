//! Account records shared by every store.

use std::fmt;
use std::str::FromStr;

use imaginify_core::defaults;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Store-assigned account identifier.
///
/// Opaque to callers; stable for the lifetime of the record and used as the
/// key for credit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: AccountId,
    /// Identity-provider subject id. Unique and immutable.
    pub subject_id: String,
    pub email: String,
    pub username: String,
    pub photo: String,
    pub first_name: String,
    pub last_name: String,
    pub plan_id: i64,
    /// Signed; only ever changed through an atomic increment.
    pub credit_balance: i64,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
}

/// Profile fields for a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub subject_id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl NewAccount {
    pub fn new(
        subject_id: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            username: username.into(),
            photo: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Builder: set the display photo URL.
    pub fn photo(mut self, url: impl Into<String>) -> Self {
        self.photo = url.into();
        self
    }

    /// Builder: set first and last name.
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Placeholder profile for an auto-provisioned account.
    ///
    /// Derived only from the subject id: the last
    /// [`PLACEHOLDER_SUFFIX_LEN`](defaults::PLACEHOLDER_SUFFIX_LEN) characters
    /// (or the whole id when shorter) build a temporary email and username.
    pub fn placeholder(subject_id: &str) -> Self {
        let suffix = subject_suffix(subject_id);
        Self {
            subject_id: subject_id.to_string(),
            email: format!("temp_{suffix}@{}", defaults::PLACEHOLDER_EMAIL_DOMAIN),
            username: format!("user_{suffix}"),
            photo: defaults::PLACEHOLDER_PHOTO_URL.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Boundary validation, run before anything reaches the store.
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_subject_id(&self.subject_id)?;
        validate_email(&self.email)?;
        validate_username(&self.username)
    }
}

/// Partial update of profile fields.
///
/// There is deliberately no field for the id, the subject id or the balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
}

impl AccountPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn photo(mut self, url: impl Into<String>) -> Self {
        self.photo = Some(url.into());
        self
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    pub fn plan_id(mut self, plan: i64) -> Self {
        self.plan_id = Some(plan);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.photo.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.plan_id.is_none()
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        if let Some(ref username) = self.username {
            validate_username(username)?;
        }
        Ok(())
    }

    /// Apply the patch in place. Used by stores without a query language.
    pub fn apply_to(&self, account: &mut UserAccount) {
        if let Some(ref v) = self.email {
            account.email.clone_from(v);
        }
        if let Some(ref v) = self.username {
            account.username.clone_from(v);
        }
        if let Some(ref v) = self.photo {
            account.photo.clone_from(v);
        }
        if let Some(ref v) = self.first_name {
            account.first_name.clone_from(v);
        }
        if let Some(ref v) = self.last_name {
            account.last_name.clone_from(v);
        }
        if let Some(v) = self.plan_id {
            account.plan_id = v;
        }
    }
}

/// Trailing characters of a subject id, counted in chars not bytes.
fn subject_suffix(subject_id: &str) -> &str {
    let len = subject_id.chars().count();
    let skip = len.saturating_sub(defaults::PLACEHOLDER_SUFFIX_LEN);
    match subject_id.char_indices().nth(skip) {
        Some((idx, _)) => &subject_id[idx..],
        None => subject_id,
    }
}

pub(crate) fn validate_subject_id(subject_id: &str) -> Result<(), LedgerError> {
    if subject_id.trim().is_empty() {
        return Err(LedgerError::Validation("subject id is empty".into()));
    }
    if subject_id.trim() != subject_id {
        return Err(LedgerError::Validation(
            "subject id has surrounding whitespace".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), LedgerError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(LedgerError::Validation(format!("invalid email: {email:?}"))),
    }
}

fn validate_username(username: &str) -> Result<(), LedgerError> {
    if username.trim().is_empty() {
        return Err(LedgerError::Validation("username is empty".into()));
    }
    Ok(())
}
