use thiserror::Error;
use uuid::Uuid;

/// Store-level failures
///
/// Uniqueness and balance-guard violations are reported as their own variants
/// so the engines can map them to domain errors; everything else is an opaque
/// backend failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unique constraint violated on {field}")]
    Duplicate { field: &'static str },

    #[error("Transaction code already recorded: {0}")]
    DuplicateReference(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Insufficient balance")]
    InsufficientFunds,

    #[error("Reset code missing, changed or expired")]
    ResetCodeRejected,

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Map a PostgreSQL unique violation onto the logical field it guards.
    pub(crate) fn from_unique_violation(constraint: Option<&str>, code: &str) -> Self {
        let constraint = constraint.unwrap_or_default();
        if constraint.contains("transaction_code") {
            StoreError::DuplicateReference(code.to_string())
        } else if constraint.contains("email") {
            StoreError::Duplicate { field: "email" }
        } else if constraint.contains("phone") {
            StoreError::Duplicate { field: "phone" }
        } else if constraint.contains("account_number") {
            StoreError::Duplicate {
                field: "account_number",
            }
        } else {
            StoreError::Duplicate { field: "unknown" }
        }
    }
}
