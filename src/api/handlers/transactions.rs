//! Wallet handlers: fund, send, balance, history, reconcile

use axum::{Extension, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::account::validation::validate_account_number;
use crate::api::state::AppState;
use crate::api::types::{ApiJson, ApiResponse, ApiResult, ok, ok_with};
use crate::auth::AuthUser;
use crate::ledger::LedgerEntryView;
use crate::wallet::{FundResult, Reconciliation, TransferResult, WalletError};

/// Direct funding request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundRequest {
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
    #[serde(default)]
    #[schema(example = "card")]
    pub payment_method: Option<String>,
}

/// Peer-to-peer transfer request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMoneyRequest {
    #[schema(example = "2034567891")]
    pub recipient_account: String,
    #[schema(value_type = String, example = "300.00")]
    pub amount: Decimal,
    #[serde(default)]
    #[schema(example = "lunch")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceData {
    #[schema(value_type = String, example = "700.00")]
    pub balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryData {
    pub transactions: Vec<LedgerEntryView>,
}

/// Fund own wallet (internal path, no gateway)
///
/// POST /transactions/fund
#[utoipa::path(
    post,
    path = "/transactions/fund",
    request_body = FundRequest,
    responses(
        (status = 200, description = "Wallet funded", body = ApiResponse<FundResult>),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn fund(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
    ApiJson(req): ApiJson<FundRequest>,
) -> ApiResult<FundResult> {
    let result = state
        .funding
        .fund_direct(account_id, req.amount, req.payment_method.as_deref())
        .await?;
    ok_with("Wallet funded successfully", result)
}

/// Send money to another account
///
/// POST /transactions/send
#[utoipa::path(
    post,
    path = "/transactions/send",
    request_body = SendMoneyRequest,
    responses(
        (status = 200, description = "Transfer completed", body = ApiResponse<TransferResult>),
        (status = 400, description = "Invalid amount, self-transfer or insufficient funds"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Recipient not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn send_money(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
    ApiJson(req): ApiJson<SendMoneyRequest>,
) -> ApiResult<TransferResult> {
    let recipient = validate_account_number(&req.recipient_account).map_err(WalletError::from)?;
    let result = state
        .transfers
        .transfer(
            account_id,
            recipient,
            req.amount,
            req.note.as_deref().unwrap_or_default(),
        )
        .await?;
    ok_with("Transfer successful", result)
}

/// Current wallet balance
///
/// GET /transactions/balance
#[utoipa::path(
    get,
    path = "/transactions/balance",
    responses(
        (status = 200, description = "Stored balance", body = ApiResponse<BalanceData>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
) -> ApiResult<BalanceData> {
    let balance = state.balances.stored_balance(account_id).await?;
    ok(BalanceData { balance })
}

/// Transactions where the caller is sender or recipient, newest first
///
/// GET /transactions/history
#[utoipa::path(
    get,
    path = "/transactions/history",
    responses(
        (status = 200, description = "Transaction history", body = ApiResponse<HistoryData>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
) -> ApiResult<HistoryData> {
    let transactions = state.balances.history(account_id).await?;
    ok(HistoryData { transactions })
}

/// Compare the stored balance with the ledger-derived one
///
/// GET /transactions/reconcile
#[utoipa::path(
    get,
    path = "/transactions/reconcile",
    responses(
        (status = 200, description = "Reconciliation result", body = ApiResponse<Reconciliation>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn reconcile(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
) -> ApiResult<Reconciliation> {
    let result = state.balances.reconcile(account_id).await?;
    ok(result)
}
