//! Wallet core: transfers, fundings and balance reporting
//!
//! The engines validate input, resolve accounts and hand exactly one atomic
//! unit to the [`WalletStore`](crate::store::WalletStore). They never mutate a
//! balance themselves.

pub mod balance;
pub mod error;
pub mod funding;
pub mod transfer;

use std::collections::HashMap;
use uuid::Uuid;

use crate::ledger::{LedgerEntryView, LedgerRecord};
use crate::store::WalletStore;

pub use balance::{BalanceReporter, Reconciliation};
pub use error::WalletError;
pub use funding::{FundResult, FundingEngine};
pub use transfer::{TransferEngine, TransferResult};

/// Resolve sender/recipient ids of `records` to display summaries.
pub(crate) async fn resolve_views(
    store: &dyn WalletStore,
    records: &[LedgerRecord],
) -> Result<Vec<LedgerEntryView>, WalletError> {
    let mut ids: Vec<Uuid> = records
        .iter()
        .flat_map(|r| r.sender.into_iter().chain(std::iter::once(r.recipient)))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let parties: HashMap<Uuid, _> = store
        .get_accounts(&ids)
        .await?
        .into_iter()
        .map(|a| (a.id, a.summary()))
        .collect();

    records
        .iter()
        .map(|r| {
            let recipient = parties.get(&r.recipient).cloned().ok_or_else(|| {
                tracing::error!(transaction_code = %r.transaction_code, "Ledger recipient missing");
                WalletError::Internal
            })?;
            let sender = match r.sender {
                Some(id) => Some(parties.get(&id).cloned().ok_or_else(|| {
                    tracing::error!(transaction_code = %r.transaction_code, "Ledger sender missing");
                    WalletError::Internal
                })?),
                None => None,
            };
            Ok(LedgerEntryView::new(r, sender, recipient))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testutil {
    use rust_decimal::Decimal;

    use crate::account::validation::generate_account_number;
    use crate::account::{Account, NewAccount};
    use crate::ledger::{NewLedgerRecord, direct_fund_code};
    use crate::store::WalletStore;

    /// Create an account and seed it with `balance` through a fund record.
    pub async fn open_account(
        store: &dyn WalletStore,
        email: &str,
        phone: &str,
        balance: Decimal,
    ) -> Account {
        let account = store
            .create_account(NewAccount {
                firstname: "Test".into(),
                lastname: email.split('@').next().unwrap_or("user").into(),
                email: email.into(),
                phone: phone.into(),
                password_hash: "hash".into(),
                dob: None,
                gender: None,
                account_number: generate_account_number(),
            })
            .await
            .unwrap();
        if balance > Decimal::ZERO {
            store
                .apply_funding(NewLedgerRecord::fund(
                    account.id,
                    balance,
                    direct_fund_code(),
                    "seed".into(),
                ))
                .await
                .unwrap();
        }
        store.get_account(account.id).await.unwrap().unwrap()
    }
}
