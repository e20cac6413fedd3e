//! In-process wallet store
//!
//! One `Mutex` guards accounts, indexes and ledger together, so every
//! operation observes and mutates a consistent snapshot. The lock is taken
//! and released inside each method and is never held across an `.await`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{FundingOutcome, LedgerTotals, StoreError, TransferOutcome, WalletStore};
use crate::account::{Account, Identifier, NewAccount, ResetCode, Role};
use crate::ledger::{LedgerRecord, NewLedgerRecord, TxStatus};

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
    by_phone: HashMap<String, Uuid>,
    by_number: HashMap<String, Uuid>,
    ledger: Vec<LedgerRecord>,
    codes: HashSet<String>,
}

impl State {
    fn account_mut(&mut self, id: Uuid) -> Result<&mut Account, StoreError> {
        self.accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))
    }

    fn append(&mut self, new: NewLedgerRecord) -> LedgerRecord {
        let record = LedgerRecord {
            id: Uuid::new_v4(),
            sender: new.sender,
            recipient: new.recipient,
            amount: new.amount,
            tx_type: new.tx_type,
            status: TxStatus::Completed,
            transaction_code: new.transaction_code,
            payment_method: new.payment_method,
            description: new.description,
            created_at: Utc::now(),
        };
        self.codes.insert(record.transaction_code.clone());
        self.ledger.push(record.clone());
        record
    }
}

#[derive(Default)]
pub struct MemoryWalletStore {
    state: Mutex<State>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.lock()?;

        if state.by_email.contains_key(&new.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }
        if state.by_phone.contains_key(&new.phone) {
            return Err(StoreError::Duplicate { field: "phone" });
        }
        if state.by_number.contains_key(&new.account_number) {
            return Err(StoreError::Duplicate {
                field: "account_number",
            });
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            firstname: new.firstname,
            lastname: new.lastname,
            email: new.email,
            phone: new.phone,
            password_hash: new.password_hash,
            dob: new.dob,
            gender: new.gender,
            account_number: new.account_number,
            balance: Decimal::ZERO,
            reset: None,
            role: Role::User,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        state.by_email.insert(account.email.clone(), account.id);
        state.by_phone.insert(account.phone.clone(), account.id);
        state
            .by_number
            .insert(account.account_number.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.lock()?.accounts.get(&id).cloned())
    }

    async fn get_accounts(&self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError> {
        let state = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.accounts.get(id).cloned())
            .collect())
    }

    async fn find_by_identifier(
        &self,
        ident: &Identifier,
    ) -> Result<Option<Account>, StoreError> {
        let state = self.lock()?;
        let id = match ident {
            Identifier::ByEmail(email) => state.by_email.get(email),
            Identifier::ByPhone(phone) => state.by_phone.get(phone),
        };
        Ok(id.and_then(|id| state.accounts.get(id)).cloned())
    }

    async fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .by_number
            .get(number)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn set_reset_code(&self, id: Uuid, reset: ResetCode) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let account = state.account_mut(id)?;
        account.reset = Some(reset);
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        id: Uuid,
        expected_code: &str,
        now: DateTime<Utc>,
        password_hash: String,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let account = state.account_mut(id)?;
        match &account.reset {
            Some(pending) if pending.code == expected_code && now <= pending.expires_at => {}
            _ => return Err(StoreError::ResetCodeRejected),
        }
        account.password_hash = password_hash;
        account.reset = None;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn apply_transfer(
        &self,
        record: NewLedgerRecord,
    ) -> Result<TransferOutcome, StoreError> {
        let sender_id = record
            .sender
            .ok_or_else(|| StoreError::Corrupt("transfer without sender".into()))?;
        let recipient_id = record.recipient;
        let amount = record.amount;

        let mut state = self.lock()?;

        if state.codes.contains(&record.transaction_code) {
            return Err(StoreError::DuplicateReference(record.transaction_code));
        }
        if !state.accounts.contains_key(&recipient_id) {
            return Err(StoreError::AccountNotFound(recipient_id));
        }

        // Check before touching anything so a failure leaves no trace.
        let sender = state.account_mut(sender_id)?;
        if sender.balance < amount {
            return Err(StoreError::InsufficientFunds);
        }

        let now = Utc::now();
        sender.balance -= amount;
        sender.updated_at = now;
        let sender_balance = sender.balance;

        let recipient = state.account_mut(recipient_id)?;
        recipient.balance += amount;
        recipient.updated_at = now;
        let recipient_balance = recipient.balance;

        let record = state.append(record);
        Ok(TransferOutcome {
            record,
            sender_balance,
            recipient_balance,
        })
    }

    async fn apply_funding(&self, record: NewLedgerRecord) -> Result<FundingOutcome, StoreError> {
        let mut state = self.lock()?;

        if state.codes.contains(&record.transaction_code) {
            return Err(StoreError::DuplicateReference(record.transaction_code));
        }

        let account = state.account_mut(record.recipient)?;
        account.balance += record.amount;
        account.updated_at = Utc::now();
        let balance = account.balance;

        let record = state.append(record);
        Ok(FundingOutcome { record, balance })
    }

    async fn find_by_transaction_code(
        &self,
        code: &str,
    ) -> Result<Option<LedgerRecord>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .ledger
            .iter()
            .find(|r| r.transaction_code == code)
            .cloned())
    }

    async fn history(&self, account_id: Uuid) -> Result<Vec<LedgerRecord>, StoreError> {
        let state = self.lock()?;
        // Ledger is append-ordered; reverse for newest first.
        Ok(state
            .ledger
            .iter()
            .rev()
            .filter(|r| r.recipient == account_id || r.sender == Some(account_id))
            .cloned()
            .collect())
    }

    async fn ledger_totals(&self, account_id: Uuid) -> Result<LedgerTotals, StoreError> {
        let state = self.lock()?;
        let mut totals = LedgerTotals::default();
        for r in state
            .ledger
            .iter()
            .filter(|r| r.status == TxStatus::Completed)
        {
            if r.recipient == account_id {
                totals.received += r.amount;
            }
            if r.sender == Some(account_id) {
                totals.sent += r.amount;
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::validation::generate_account_number;

    fn new_account(email: &str, phone: &str) -> NewAccount {
        NewAccount {
            firstname: "Test".into(),
            lastname: "User".into(),
            email: email.into(),
            phone: phone.into(),
            password_hash: "hash".into(),
            dob: None,
            gender: None,
            account_number: generate_account_number(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryWalletStore::new();
        let acc = store
            .create_account(new_account("a@x.com", "0801"))
            .await
            .unwrap();
        assert_eq!(acc.balance, Decimal::ZERO);

        let by_email = store
            .find_by_identifier(&Identifier::ByEmail("a@x.com".into()))
            .await
            .unwrap();
        assert_eq!(by_email.unwrap().id, acc.id);

        let by_phone = store
            .find_by_identifier(&Identifier::ByPhone("0801".into()))
            .await
            .unwrap();
        assert_eq!(by_phone.unwrap().id, acc.id);

        let by_number = store
            .find_by_account_number(&acc.account_number)
            .await
            .unwrap();
        assert_eq!(by_number.unwrap().id, acc.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_and_phone() {
        let store = MemoryWalletStore::new();
        store
            .create_account(new_account("a@x.com", "0801"))
            .await
            .unwrap();

        let err = store
            .create_account(new_account("a@x.com", "0802"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "email" }));

        let err = store
            .create_account(new_account("b@x.com", "0801"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "phone" }));
    }

    #[tokio::test]
    async fn test_funding_rejects_reused_code() {
        let store = MemoryWalletStore::new();
        let acc = store
            .create_account(new_account("a@x.com", "0801"))
            .await
            .unwrap();

        let rec = NewLedgerRecord::fund(acc.id, Decimal::new(100, 0), "ref1".into(), "x".into());
        store.apply_funding(rec.clone()).await.unwrap();
        let err = store.apply_funding(rec).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateReference(_)));

        let acc = store.get_account(acc.id).await.unwrap().unwrap();
        assert_eq!(acc.balance, Decimal::new(100, 0));
        assert_eq!(store.history(acc.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_guard_leaves_no_trace() {
        let store = MemoryWalletStore::new();
        let a = store
            .create_account(new_account("a@x.com", "0801"))
            .await
            .unwrap();
        let b = store
            .create_account(new_account("b@x.com", "0802"))
            .await
            .unwrap();

        let rec = NewLedgerRecord::transfer(a.id, b.id, Decimal::ONE, String::new());
        let err = store.apply_transfer(rec).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientFunds));
        assert!(store.history(a.id).await.unwrap().is_empty());
        assert!(store.history(b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_code_set_and_clear() {
        let store = MemoryWalletStore::new();
        let acc = store
            .create_account(new_account("a@x.com", "0801"))
            .await
            .unwrap();

        let reset = ResetCode {
            code: "123456".into(),
            expires_at: Utc::now(),
        };
        store.set_reset_code(acc.id, reset.clone()).await.unwrap();
        let loaded = store.get_account(acc.id).await.unwrap().unwrap();
        assert_eq!(loaded.reset, Some(reset.clone()));

        let now = reset.expires_at;
        let err = store
            .complete_password_reset(acc.id, "654321", now, "wrong-hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ResetCodeRejected));
        let err = store
            .complete_password_reset(
                acc.id,
                "123456",
                now + chrono::Duration::seconds(1),
                "late-hash".into(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ResetCodeRejected));
        assert_eq!(
            store.get_account(acc.id).await.unwrap().unwrap().password_hash,
            "hash"
        );

        store
            .complete_password_reset(acc.id, "123456", now, "new-hash".into())
            .await
            .unwrap();
        let loaded = store.get_account(acc.id).await.unwrap().unwrap();
        assert!(loaded.reset.is_none());
        assert_eq!(loaded.password_hash, "new-hash");

        // Consumed
        let err = store
            .complete_password_reset(acc.id, "123456", now, "again-hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ResetCodeRejected));
    }
}
