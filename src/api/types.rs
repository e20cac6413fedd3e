//! API response envelope, error mapping and JSON extraction
//!
//! Every response body has the same shape:
//!
//! ```json
//! {"code": 0, "message": "ok", "data": {...}}
//! {"code": 1002, "message": "Insufficient funds", "kind": "INSUFFICIENT_FUNDS"}
//! ```

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

use crate::wallet::WalletError;

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - message: human-readable description
/// - kind: stable error kind (errors only)
/// - data: operation result (success only)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with("ok", data)
    }

    pub fn success_with(message: impl Into<String>, data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            message: message.into(),
            kind: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: error_codes::SUCCESS,
            message: message.into(),
            kind: None,
            data: None,
        }
    }

    pub fn error(code: i32, kind: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            kind: Some(kind.to_string()),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;
    pub const INVALID_AMOUNT: i32 = 1003;
    pub const INVALID_OPERATION: i32 = 1004;
    pub const INVALID_CODE: i32 = 1005;
    pub const CODE_EXPIRED: i32 = 1006;
    pub const DUPLICATE_REFERENCE: i32 = 1007;
    pub const GATEWAY_REJECTED: i32 = 1008;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4004;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const GATEWAY_ERROR: i32 = 5002;
}

/// Error half of every handler result
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error_codes::INVALID_PARAMETER,
            kind: "VALIDATION_ERROR",
            message: message.into(),
        }
    }

    pub fn unauthorized(code: i32, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code,
            kind: "UNAUTHORIZED",
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: error_codes::SERVICE_UNAVAILABLE,
            kind: "SERVICE_UNAVAILABLE",
            message: message.into(),
        }
    }

    pub fn into_err<T>(self) -> Result<T, Self> {
        Err(self)
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        let code = match &e {
            WalletError::Validation(_) => error_codes::INVALID_PARAMETER,
            WalletError::NotFound(_) => error_codes::NOT_FOUND,
            WalletError::Unauthorized => error_codes::AUTH_FAILED,
            WalletError::InsufficientFunds => error_codes::INSUFFICIENT_FUNDS,
            WalletError::InvalidAmount(_) => error_codes::INVALID_AMOUNT,
            WalletError::InvalidOperation(_) => error_codes::INVALID_OPERATION,
            WalletError::InvalidCode => error_codes::INVALID_CODE,
            WalletError::Expired => error_codes::CODE_EXPIRED,
            WalletError::DuplicateReference(_) => error_codes::DUPLICATE_REFERENCE,
            WalletError::GatewayRejected => error_codes::GATEWAY_REJECTED,
            WalletError::GatewayError => error_codes::GATEWAY_ERROR,
            WalletError::Internal => error_codes::INTERNAL_ERROR,
        };
        Self {
            status: StatusCode::from_u16(e.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            kind: e.code(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::error(self.code, self.kind, self.message));
        (self.status, body).into_response()
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub fn ok_with<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success_with(message, data))))
}

pub fn ok_message(message: impl Into<String>) -> ApiResult<()> {
    Ok((StatusCode::OK, Json(ApiResponse::message(message))))
}

pub fn created<T>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with(message, data)),
    ))
}

/// `Json<T>` whose rejection uses the API envelope instead of plain text.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = match &rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        "Expected Content-Type: application/json".to_string()
                    }
                    other => format!("Invalid JSON: {}", other.body_text()),
                };
                Err(ApiError::bad_request(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::success(42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "ok");
        assert_eq!(json["data"], 42);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let resp = ApiResponse::error(error_codes::NOT_FOUND, "NOT_FOUND", "Recipient not found");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 4004);
        assert_eq!(json["kind"], "NOT_FOUND");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_wallet_error_mapping() {
        let e = ApiError::from(WalletError::InsufficientFunds);
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, error_codes::INSUFFICIENT_FUNDS);
        assert_eq!(e.kind, "INSUFFICIENT_FUNDS");

        let e = ApiError::from(WalletError::NotFound("Recipient"));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "Recipient not found");

        let e = ApiError::from(WalletError::Unauthorized);
        assert_eq!(e.status, StatusCode::UNAUTHORIZED);

        let e = ApiError::from(WalletError::GatewayError);
        assert_eq!(e.status, StatusCode::BAD_GATEWAY);

        let e = ApiError::from(WalletError::Internal);
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "Internal server error");
    }

    #[test]
    fn test_into_response_status() {
        let resp = ApiError::from(WalletError::Expired).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
