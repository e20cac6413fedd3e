//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::{AccountProfile, Gender, PartySummary, Role};
use crate::api::handlers::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyCodeRequest,
};
use crate::api::handlers::payments::{
    InitializePaymentRequest, PaymentInitData, VerifyPaymentRequest,
};
use crate::api::handlers::transactions::{BalanceData, FundRequest, HistoryData, SendMoneyRequest};
use crate::api::handlers::HealthResponse;
use crate::auth::AuthSession;
use crate::ledger::{LedgerEntryView, TxStatus, TxType};
use crate::wallet::{FundResult, Reconciliation, TransferResult};

/// JWT bearer authentication security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token returned by /auth/register or /auth/login: Authorization: Bearer <jwt>",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Paylink Wallet API",
        version = "1.0.0",
        description = "Wallet accounts, peer-to-peer transfers and gateway-verified funding.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::forgot_password,
        crate::api::handlers::auth::verify_code,
        crate::api::handlers::auth::reset_password,
        crate::api::handlers::transactions::fund,
        crate::api::handlers::transactions::send_money,
        crate::api::handlers::transactions::get_balance,
        crate::api::handlers::transactions::get_history,
        crate::api::handlers::transactions::reconcile,
        crate::api::handlers::payments::initialize_payment,
        crate::api::handlers::payments::verify_payment,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ForgotPasswordRequest,
            VerifyCodeRequest,
            ResetPasswordRequest,
            AuthSession,
            AccountProfile,
            PartySummary,
            Role,
            Gender,
            FundRequest,
            SendMoneyRequest,
            BalanceData,
            HistoryData,
            LedgerEntryView,
            TxType,
            TxStatus,
            TransferResult,
            FundResult,
            Reconciliation,
            InitializePaymentRequest,
            PaymentInitData,
            VerifyPaymentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and password reset"),
        (name = "Transactions", description = "Wallet funding, transfers and balance queries (auth required)"),
        (name = "Payments", description = "Payment gateway checkout and verification (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
