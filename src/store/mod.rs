//! Account and ledger storage
//!
//! [`WalletStore`] is the contract the engines are written against. Each
//! balance-affecting method (`apply_transfer`, `apply_funding`) is a single
//! atomic unit: the balance changes and the ledger append are either all
//! visible or none are.
//!
//! Two backends:
//! - [`PgWalletStore`]: PostgreSQL via sqlx, one SQL transaction per unit with
//!   row locks on the touched accounts.
//! - [`MemoryWalletStore`]: in-process, one mutex over the whole state. Used
//!   when no database is configured and by the test suite.

pub mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::account::{Account, Identifier, NewAccount, ResetCode};
use crate::ledger::{LedgerRecord, NewLedgerRecord};

pub use error::StoreError;
pub use memory::MemoryWalletStore;
pub use postgres::PgWalletStore;

/// Result of an applied transfer
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub record: LedgerRecord,
    pub sender_balance: Decimal,
    pub recipient_balance: Decimal,
}

/// Result of an applied funding
#[derive(Debug, Clone)]
pub struct FundingOutcome {
    pub record: LedgerRecord,
    pub balance: Decimal,
}

/// Sums of completed ledger records touching one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub received: Decimal,
    pub sent: Decimal,
}

impl LedgerTotals {
    pub fn net(&self) -> Decimal {
        self.received - self.sent
    }
}

#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Insert a new account with zero balance.
    ///
    /// Fails with `Duplicate` when email, phone or account number is taken.
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError>;

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn get_accounts(&self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError>;

    async fn find_by_identifier(&self, ident: &Identifier)
    -> Result<Option<Account>, StoreError>;

    async fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, StoreError>;

    /// Replace any pending reset code.
    async fn set_reset_code(&self, id: Uuid, reset: ResetCode) -> Result<(), StoreError>;

    /// Consume the pending reset code and store a new password hash in one
    /// write.
    ///
    /// Applies only while the account's pending code equals `expected_code`
    /// and has not expired at `now`; otherwise fails with
    /// `ResetCodeRejected` and changes nothing.
    async fn complete_password_reset(
        &self,
        id: Uuid,
        expected_code: &str,
        now: DateTime<Utc>,
        password_hash: String,
    ) -> Result<(), StoreError>;

    /// Debit `record.sender`, credit `record.recipient`, append `record`.
    ///
    /// Fails with `InsufficientFunds` (and changes nothing) when the sender's
    /// balance at apply time is below `record.amount`.
    async fn apply_transfer(&self, record: NewLedgerRecord)
    -> Result<TransferOutcome, StoreError>;

    /// Credit `record.recipient` and append `record`.
    ///
    /// Fails with `DuplicateReference` (and changes nothing) when
    /// `record.transaction_code` is already in the ledger.
    async fn apply_funding(&self, record: NewLedgerRecord) -> Result<FundingOutcome, StoreError>;

    async fn find_by_transaction_code(
        &self,
        code: &str,
    ) -> Result<Option<LedgerRecord>, StoreError>;

    /// All records where the account is sender or recipient, newest first.
    async fn history(&self, account_id: Uuid) -> Result<Vec<LedgerRecord>, StoreError>;

    /// Completed received / sent sums for one account.
    async fn ledger_totals(&self, account_id: Uuid) -> Result<LedgerTotals, StoreError>;
}
