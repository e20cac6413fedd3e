//! Funding engine
//!
//! Two entry points credit an account:
//! - [`FundingEngine::fund_direct`]: internal path, caller-supplied amount.
//! - [`FundingEngine::fund_verified`]: gateway path. The amount and outcome
//!   come from the gateway's verification response only, and a reference is
//!   credited at most once.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::WalletError;
use crate::account::Account;
use crate::ledger::{LedgerEntryView, LedgerRecord, NewLedgerRecord, TxType, direct_fund_code};
use crate::money::{self, AmountLimits};
use crate::payment::{InitializedPayment, PaymentGateway, PaymentStatus};
use crate::store::WalletStore;

const MAX_REFERENCE_LEN: usize = 100;

/// Credited funding with the account's new balance
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundResult {
    pub transaction: LedgerEntryView,
    #[schema(value_type = String, example = "500.00")]
    pub balance: Decimal,
    /// True when the reference had already been credited and nothing changed
    pub already_processed: bool,
}

/// Gateway references end up in a URL path; keep them to a safe alphabet.
fn validate_reference(reference: &str) -> Result<&str, WalletError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(WalletError::Validation("reference is required".into()));
    }
    if reference.len() > MAX_REFERENCE_LEN
        || !reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '='))
    {
        return Err(WalletError::Validation("Invalid payment reference".into()));
    }
    Ok(reference)
}

#[derive(Clone)]
pub struct FundingEngine {
    store: Arc<dyn WalletStore>,
    gateway: Arc<dyn PaymentGateway>,
    limits: AmountLimits,
}

impl FundingEngine {
    pub fn new(
        store: Arc<dyn WalletStore>,
        gateway: Arc<dyn PaymentGateway>,
        limits: AmountLimits,
    ) -> Self {
        Self {
            store,
            gateway,
            limits,
        }
    }

    async fn account(&self, account_id: Uuid) -> Result<Account, WalletError> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(WalletError::NotFound("Account"))
    }

    /// Credit `amount` to `account_id` under `source_reference`.
    pub async fn fund(
        &self,
        account_id: Uuid,
        amount: Decimal,
        source_reference: &str,
        payment_method: &str,
    ) -> Result<FundResult, WalletError> {
        let amount = self.limits.check(amount)?;
        let account = self.account(account_id).await?;
        self.credit(&account, amount, source_reference, payment_method)
            .await
    }

    /// Internal funding path with a generated reference.
    pub async fn fund_direct(
        &self,
        account_id: Uuid,
        amount: Decimal,
        payment_method: Option<&str>,
    ) -> Result<FundResult, WalletError> {
        let method = payment_method
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("internal");
        self.fund(account_id, amount, &direct_fund_code(), method)
            .await
    }

    /// Credit the account with whatever the gateway reports for `reference`.
    ///
    /// Fails closed: a timeout, transport failure or unreadable response
    /// credits nothing. Re-delivering an already credited reference returns
    /// the original record with `already_processed = true`. A reported
    /// amount outside the accepted range is rejected like a failed payment.
    pub async fn fund_verified(
        &self,
        account_id: Uuid,
        reference: &str,
    ) -> Result<FundResult, WalletError> {
        let reference = validate_reference(reference)?;
        let account = self.account(account_id).await?;

        if let Some(existing) = self.store.find_by_transaction_code(reference).await? {
            return self.already_processed(&account, existing);
        }

        let verified = self.gateway.verify(reference).await?;
        if verified.reference != reference {
            tracing::error!(
                requested = reference,
                returned = %verified.reference,
                "Gateway returned a different reference"
            );
            return Err(WalletError::GatewayError);
        }
        if verified.status != PaymentStatus::Success {
            tracing::warn!(reference, status = ?verified.status, "Payment not successful");
            return Err(WalletError::GatewayRejected);
        }

        let amount = self
            .limits
            .check(money::from_minor(verified.amount_minor))
            .map_err(|e| {
                tracing::warn!(
                    reference,
                    amount_minor = verified.amount_minor,
                    error = %e,
                    "Verified amount outside accepted range"
                );
                WalletError::GatewayRejected
            })?;

        match self
            .credit(&account, amount, reference, self.gateway.name())
            .await
        {
            // Lost a race with a concurrent verification of the same reference.
            Err(WalletError::DuplicateReference(_)) => {
                let existing = self
                    .store
                    .find_by_transaction_code(reference)
                    .await?
                    .ok_or(WalletError::Internal)?;
                self.already_processed(&account, existing)
            }
            other => other,
        }
    }

    /// Start a gateway payment of `amount` (major units) for `email`.
    pub async fn initialize(
        &self,
        email: &str,
        amount: Decimal,
    ) -> Result<InitializedPayment, WalletError> {
        let amount = self.limits.check(amount)?;
        let minor = money::to_minor(amount)?;
        let payment = self.gateway.initialize(email, minor).await?;
        tracing::info!(reference = %payment.reference, amount_minor = minor, "Payment initialized");
        Ok(payment)
    }

    async fn credit(
        &self,
        account: &Account,
        amount: Decimal,
        reference: &str,
        payment_method: &str,
    ) -> Result<FundResult, WalletError> {
        let record = NewLedgerRecord::fund(
            account.id,
            amount,
            reference.to_string(),
            payment_method.to_string(),
        );
        let outcome = self.store.apply_funding(record).await?;

        tracing::info!(
            account_id = %account.id,
            transaction_code = %outcome.record.transaction_code,
            %amount,
            payment_method,
            "Account funded"
        );

        Ok(FundResult {
            transaction: LedgerEntryView::new(&outcome.record, None, account.summary()),
            balance: outcome.balance,
            already_processed: false,
        })
    }

    fn already_processed(
        &self,
        account: &Account,
        existing: LedgerRecord,
    ) -> Result<FundResult, WalletError> {
        if existing.recipient != account.id || existing.tx_type != TxType::Fund {
            tracing::warn!(
                account_id = %account.id,
                transaction_code = %existing.transaction_code,
                "Reference belongs to another ledger entry"
            );
            return Err(WalletError::DuplicateReference(existing.transaction_code));
        }
        tracing::info!(
            account_id = %account.id,
            transaction_code = %existing.transaction_code,
            "Reference already credited"
        );
        Ok(FundResult {
            transaction: LedgerEntryView::new(&existing, None, account.summary()),
            balance: account.balance,
            already_processed: true,
        })
    }
}
