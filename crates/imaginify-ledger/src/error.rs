//! Ledger and store error types.

use imaginify_core::errors;

/// Error returned by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An account already exists for the subject id.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The target account does not exist.
    #[error("account not found: {0}")]
    NotFound(String),

    /// The adjustment would take the balance below zero and the
    /// overdraft policy rejects it.
    #[error("insufficient credits: balance {balance}, delta {delta}")]
    InsufficientCredits { balance: i64, delta: i64 },

    /// Input rejected before reaching the store.
    #[error("invalid account data: {0}")]
    Validation(String),

    /// Transformation slug is not in the catalogue.
    #[error("unknown transformation type: {0}")]
    UnknownTransformation(String),

    /// Connection or transport failure in the underlying store.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// Short machine-readable label, used as a `tracing` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conflict(_) => errors::ERROR_CONFLICT,
            Self::NotFound(_) => errors::ERROR_NOT_FOUND,
            Self::InsufficientCredits { .. } => errors::ERROR_INSUFFICIENT_CREDITS,
            Self::Validation(_) | Self::UnknownTransformation(_) => errors::ERROR_VALIDATION,
            Self::StoreUnavailable(_) => errors::ERROR_STORE,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(msg) => Self::Conflict(msg),
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

/// Error returned by [`AccountStore`](crate::store::AccountStore) implementations.
///
/// `DuplicateKey` is the uniqueness-violation signal. The ledger consumes it
/// and never hands it to its own callers as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert or update rejected by a uniqueness constraint.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Backend error (database, network, etc.).
    #[error("backend error: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a backend error from any error type.
    #[inline]
    pub fn unavailable<E: std::fmt::Display>(err: E) -> Self {
        Self::Unavailable(err.to_string())
    }

    /// Whether this is a uniqueness violation.
    #[inline]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }
}

#[cfg(feature = "sql")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::DuplicateKey(db.message().to_string())
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}
