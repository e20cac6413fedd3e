//! Peer-to-peer transfer engine

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::WalletError;
use crate::ledger::{LedgerEntryView, NewLedgerRecord};
use crate::money::AmountLimits;
use crate::store::WalletStore;

/// Completed transfer with both post-transfer balances
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub transaction: LedgerEntryView,
    #[schema(value_type = String, example = "700.00")]
    pub sender_balance: Decimal,
    #[schema(value_type = String, example = "300.00")]
    pub recipient_balance: Decimal,
}

#[derive(Clone)]
pub struct TransferEngine {
    store: Arc<dyn WalletStore>,
    limits: AmountLimits,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn WalletStore>, limits: AmountLimits) -> Self {
        Self { store, limits }
    }

    /// Move `amount` from `sender_id` to the account numbered
    /// `recipient_account_number`.
    ///
    /// Checks run in order: amount, sender, recipient, self-transfer, account
    /// state. The balance check happens inside the store's atomic unit, so
    /// two concurrent debits cannot both pass on a stale balance.
    pub async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_account_number: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<TransferResult, WalletError> {
        let amount = self.limits.check(amount)?;

        let sender = self
            .store
            .get_account(sender_id)
            .await?
            .ok_or(WalletError::NotFound("Sender"))?;

        let recipient = self
            .store
            .find_by_account_number(recipient_account_number.trim())
            .await?
            .ok_or(WalletError::NotFound("Recipient"))?;

        if sender.id == recipient.id {
            return Err(WalletError::InvalidOperation(
                "Cannot transfer to your own account",
            ));
        }
        if !sender.is_active || !recipient.is_active {
            return Err(WalletError::InvalidOperation("Account is inactive"));
        }

        let record =
            NewLedgerRecord::transfer(sender.id, recipient.id, amount, note.trim().to_string());
        let outcome = match self.store.apply_transfer(record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = WalletError::from(e);
                tracing::warn!(
                    sender_id = %sender.id,
                    recipient_id = %recipient.id,
                    %amount,
                    error = %err,
                    "Transfer rejected"
                );
                return Err(err);
            }
        };

        tracing::info!(
            transaction_code = %outcome.record.transaction_code,
            sender_id = %sender.id,
            recipient_id = %recipient.id,
            %amount,
            "Transfer completed"
        );

        Ok(TransferResult {
            transaction: LedgerEntryView::new(
                &outcome.record,
                Some(sender.summary()),
                recipient.summary(),
            ),
            sender_balance: outcome.sender_balance,
            recipient_balance: outcome.recipient_balance,
        })
    }
}
