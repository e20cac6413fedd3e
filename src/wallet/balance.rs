//! Balance reporting
//!
//! The stored `balance` column is the single source of truth. The derived
//! balance (sum of completed ledger records) exists only for reconciliation.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{WalletError, resolve_views};
use crate::ledger::LedgerEntryView;
use crate::store::WalletStore;

/// Stored vs derived balance for one account
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    #[schema(value_type = String, example = "700.00")]
    pub stored: Decimal,
    #[schema(value_type = String, example = "700.00")]
    pub derived: Decimal,
    pub consistent: bool,
}

#[derive(Clone)]
pub struct BalanceReporter {
    store: Arc<dyn WalletStore>,
}

impl BalanceReporter {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    pub async fn stored_balance(&self, account_id: Uuid) -> Result<Decimal, WalletError> {
        self.store
            .get_account(account_id)
            .await?
            .map(|a| a.balance)
            .ok_or(WalletError::NotFound("Account"))
    }

    /// Received minus sent over completed ledger records.
    pub async fn derived_balance(&self, account_id: Uuid) -> Result<Decimal, WalletError> {
        Ok(self.store.ledger_totals(account_id).await?.net())
    }

    pub async fn reconcile(&self, account_id: Uuid) -> Result<Reconciliation, WalletError> {
        let stored = self.stored_balance(account_id).await?;
        let derived = self.derived_balance(account_id).await?;
        let consistent = stored == derived;
        if !consistent {
            tracing::error!(
                %account_id,
                %stored,
                %derived,
                "Stored balance disagrees with ledger"
            );
        }
        Ok(Reconciliation {
            stored,
            derived,
            consistent,
        })
    }

    /// Ledger records touching the account, newest first.
    pub async fn history(&self, account_id: Uuid) -> Result<Vec<LedgerEntryView>, WalletError> {
        let records = self.store.history(account_id).await?;
        resolve_views(self.store.as_ref(), &records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::AmountLimits;
    use crate::payment::mock::MockGateway;
    use crate::store::MemoryWalletStore;
    use crate::wallet::testutil::open_account;
    use crate::wallet::{FundingEngine, TransferEngine};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_derived_equals_stored_after_mixed_sequence() {
        let store = Arc::new(MemoryWalletStore::new());
        let limits = AmountLimits::default();
        let transfers = TransferEngine::new(store.clone(), limits);
        let funding = FundingEngine::new(store.clone(), Arc::new(MockGateway::new()), limits);
        let reporter = BalanceReporter::new(store.clone());

        let a = open_account(store.as_ref(), "a@x.com", "0801", Decimal::ZERO).await;
        let b = open_account(store.as_ref(), "b@x.com", "0802", Decimal::ZERO).await;
        let c = open_account(store.as_ref(), "c@x.com", "0803", Decimal::ZERO).await;

        funding.fund_direct(a.id, dec("1000"), None).await.unwrap();
        funding.fund_direct(b.id, dec("45.55"), None).await.unwrap();
        transfers
            .transfer(a.id, &b.account_number, dec("300"), "lunch")
            .await
            .unwrap();
        transfers
            .transfer(b.id, &c.account_number, dec("345.55"), "")
            .await
            .unwrap();
        // Rejected transfer leaves no ledger trace.
        transfers
            .transfer(c.id, &a.account_number, dec("1000"), "")
            .await
            .unwrap_err();
        transfers
            .transfer(c.id, &a.account_number, dec("0.55"), "")
            .await
            .unwrap();

        for id in [a.id, b.id, c.id] {
            let r = reporter.reconcile(id).await.unwrap();
            assert!(r.consistent, "{:?}", r);
        }
        assert_eq!(reporter.stored_balance(a.id).await.unwrap(), dec("700.55"));
        assert_eq!(reporter.stored_balance(b.id).await.unwrap(), Decimal::ZERO);
        assert_eq!(reporter.stored_balance(c.id).await.unwrap(), dec("345.00"));
    }

    #[tokio::test]
    async fn test_fresh_account_is_zero() {
        let store = Arc::new(MemoryWalletStore::new());
        let reporter = BalanceReporter::new(store.clone());
        let a = open_account(store.as_ref(), "a@x.com", "0801", Decimal::ZERO).await;

        let r = reporter.reconcile(a.id).await.unwrap();
        assert_eq!(r.stored, Decimal::ZERO);
        assert_eq!(r.derived, Decimal::ZERO);
        assert!(r.consistent);
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let reporter = BalanceReporter::new(Arc::new(MemoryWalletStore::new()));
        let err = reporter.stored_balance(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err, WalletError::NotFound("Account"));
    }

    #[tokio::test]
    async fn test_history_resolves_parties_newest_first() {
        let store = Arc::new(MemoryWalletStore::new());
        let transfers = TransferEngine::new(store.clone(), AmountLimits::default());
        let reporter = BalanceReporter::new(store.clone());

        let a = open_account(store.as_ref(), "a@x.com", "0801", dec("100")).await;
        let b = open_account(store.as_ref(), "b@x.com", "0802", Decimal::ZERO).await;
        transfers
            .transfer(a.id, &b.account_number, dec("40"), "rent")
            .await
            .unwrap();

        let history = reporter.history(a.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].description, "rent");
        assert_eq!(history[0].sender.as_ref().unwrap().account_number, a.account_number);
        assert_eq!(history[0].recipient.account_number, b.account_number);
        assert!(history[1].sender.is_none());
    }
}
