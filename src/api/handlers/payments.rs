//! Gateway payment handlers

use axum::{Extension, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::state::AppState;
use crate::api::types::{ApiJson, ApiResponse, ApiResult, ok, ok_with};
use crate::auth::AuthUser;
use crate::wallet::{FundResult, WalletError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitializePaymentRequest {
    /// Amount in major units
    #[schema(value_type = String, example = "500.00")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitData {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct VerifyPaymentRequest {
    #[schema(example = "ref123")]
    pub reference: String,
}

/// Start a gateway payment for the caller's email
///
/// POST /payments/initialize
#[utoipa::path(
    post,
    path = "/payments/initialize",
    request_body = InitializePaymentRequest,
    responses(
        (status = 200, description = "Checkout created", body = ApiResponse<PaymentInitData>),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Missing or invalid token"),
        (status = 502, description = "Gateway unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn initialize_payment(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
    ApiJson(req): ApiJson<InitializePaymentRequest>,
) -> ApiResult<PaymentInitData> {
    let account = state
        .store
        .get_account(account_id)
        .await
        .map_err(WalletError::from)?
        .ok_or(WalletError::NotFound("Account"))?;

    let payment = state.funding.initialize(&account.email, req.amount).await?;
    ok(PaymentInitData {
        authorization_url: payment.authorization_url,
        access_code: payment.access_code,
        reference: payment.reference,
    })
}

/// Verify a gateway reference and credit the caller
///
/// POST /payments/verify
///
/// The credited amount is the one the gateway reports; nothing from the
/// request body other than the reference is used.
#[utoipa::path(
    post,
    path = "/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified and credited", body = ApiResponse<FundResult>),
        (status = 400, description = "Payment not successful or reference invalid"),
        (status = 401, description = "Missing or invalid token"),
        (status = 502, description = "Gateway unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(account_id)): Extension<AuthUser>,
    ApiJson(req): ApiJson<VerifyPaymentRequest>,
) -> ApiResult<FundResult> {
    let result = state
        .funding
        .fund_verified(account_id, &req.reference)
        .await?;
    let message = if result.already_processed {
        "Payment already processed"
    } else {
        "Payment verified and wallet funded"
    };
    ok_with(message, result)
}
