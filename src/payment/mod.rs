//! Payment gateway client
//!
//! The gateway is the only way real money enters the system. Verification,
//! not initialization, is the trust boundary: an account is credited only
//! with the amount the gateway itself reports for a successful reference.

pub mod paystack;

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub use paystack::PaystackClient;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway returned HTTP {status}")]
    Http { status: u16 },

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

/// Result of starting a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializedPayment {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// Gateway-side outcome of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Failed,
    /// Abandoned, ongoing, reversed or anything else that is not a settled
    /// success.
    Other,
}

/// Verified payment as reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    pub reference: String,
    pub status: PaymentStatus,
    /// Amount in minor units (kobo)
    pub amount_minor: i64,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + Debug {
    /// Gateway name, recorded as the ledger payment method
    fn name(&self) -> &'static str;

    /// Start a payment of `amount_minor` for `email`.
    async fn initialize(
        &self,
        email: &str,
        amount_minor: i64,
    ) -> Result<InitializedPayment, GatewayError>;

    /// Look up the settled state of `reference`.
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, GatewayError>;
}
