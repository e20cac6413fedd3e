//! Wallet error taxonomy
//!
//! Every failure a request can hit ends up as one of these variants, each with
//! a stable kind string and an HTTP status. Backend details (SQL errors,
//! gateway bodies) are logged where they are converted and never reach the
//! client message.

use thiserror::Error;

use crate::account::ValidationError;
use crate::money::MoneyError;
use crate::payment::GatewayError;
use crate::store::StoreError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0}")]
    InvalidOperation(&'static str),

    #[error("Invalid code")]
    InvalidCode,

    #[error("Code expired")]
    Expired,

    #[error("Reference already processed: {0}")]
    DuplicateReference(String),

    #[error("Payment not successful")]
    GatewayRejected,

    #[error("Payment gateway unavailable")]
    GatewayError,

    #[error("Internal server error")]
    Internal,
}

impl WalletError {
    /// Stable error kind for API responses
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Validation(_) => "VALIDATION_ERROR",
            WalletError::NotFound(_) => "NOT_FOUND",
            WalletError::Unauthorized => "UNAUTHORIZED",
            WalletError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            WalletError::InvalidAmount(_) => "INVALID_AMOUNT",
            WalletError::InvalidOperation(_) => "INVALID_OPERATION",
            WalletError::InvalidCode => "INVALID_CODE",
            WalletError::Expired => "CODE_EXPIRED",
            WalletError::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            WalletError::GatewayRejected => "GATEWAY_REJECTED",
            WalletError::GatewayError => "GATEWAY_ERROR",
            WalletError::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            WalletError::Unauthorized => 401,
            WalletError::NotFound(_) => 404,
            WalletError::Validation(_)
            | WalletError::InsufficientFunds
            | WalletError::InvalidAmount(_)
            | WalletError::InvalidOperation(_)
            | WalletError::InvalidCode
            | WalletError::Expired
            | WalletError::DuplicateReference(_)
            | WalletError::GatewayRejected => 400,
            WalletError::GatewayError => 502,
            WalletError::Internal => 500,
        }
    }
}

impl From<StoreError> for WalletError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate { field: "email" } => {
                WalletError::Validation("Email already registered".into())
            }
            StoreError::Duplicate { field: "phone" } => {
                WalletError::Validation("Phone number already registered".into())
            }
            StoreError::Duplicate { field } => {
                WalletError::Validation(format!("Duplicate {}", field))
            }
            StoreError::DuplicateReference(code) => WalletError::DuplicateReference(code),
            StoreError::AccountNotFound(_) => WalletError::NotFound("Account"),
            StoreError::InsufficientFunds => WalletError::InsufficientFunds,
            StoreError::ResetCodeRejected => WalletError::InvalidCode,
            other => {
                tracing::error!(error = %other, "Store failure");
                WalletError::Internal
            }
        }
    }
}

impl From<MoneyError> for WalletError {
    fn from(e: MoneyError) -> Self {
        WalletError::InvalidAmount(e.to_string())
    }
}

impl From<GatewayError> for WalletError {
    fn from(e: GatewayError) -> Self {
        tracing::error!(error = %e, "Payment gateway failure");
        WalletError::GatewayError
    }
}

impl From<ValidationError> for WalletError {
    fn from(e: ValidationError) -> Self {
        WalletError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(WalletError::InsufficientFunds.code(), "INSUFFICIENT_FUNDS");
        assert_eq!(WalletError::Expired.code(), "CODE_EXPIRED");
        assert_eq!(WalletError::Unauthorized.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(WalletError::Unauthorized.http_status(), 401);
        assert_eq!(WalletError::NotFound("Recipient").http_status(), 404);
        assert_eq!(WalletError::InsufficientFunds.http_status(), 400);
        assert_eq!(WalletError::GatewayRejected.http_status(), 400);
        assert_eq!(WalletError::GatewayError.http_status(), 502);
        assert_eq!(WalletError::Internal.http_status(), 500);
    }

    #[test]
    fn test_store_errors_do_not_leak_detail() {
        let err: WalletError = StoreError::Unavailable("pg at 10.0.0.3 refused".into()).into();
        assert_eq!(err, WalletError::Internal);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_gateway_errors_do_not_leak_detail() {
        let err: WalletError = GatewayError::InvalidResponse("secret body".into()).into();
        assert_eq!(err, WalletError::GatewayError);
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_duplicate_email_maps_to_validation() {
        let err: WalletError = StoreError::Duplicate { field: "email" }.into();
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_display() {
        assert_eq!(WalletError::NotFound("Recipient").to_string(), "Recipient not found");
        assert_eq!(WalletError::InsufficientFunds.to_string(), "Insufficient funds");
    }
}
